// src/models/mod.rs

//! Domain models for the indexer application.

mod config;
mod show;

// Re-export all public types
pub use config::{Config, FetcherConfig};
pub use show::{Pictures, ProcessedShow, RawShow};
