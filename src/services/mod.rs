// src/services/mod.rs

//! Core services: catalog fetching, categorization, show processing.

mod catalog;
mod categorize;
mod processor;

pub use catalog::{CatalogFetcher, FetchStats};
pub use categorize::{Categorizer, CompiledRule, DEFAULT_CATEGORY};
pub use processor::ShowProcessor;
