// src/lib.rs

//! Mixcloud show indexer library.
//!
//! Fetches shows from a Mixcloud-style catalog API, categorizes them with
//! configured regex rules, and maintains a local JSON index with incremental
//! updates.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
