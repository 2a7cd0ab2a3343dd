// src/storage/mod.rs

//! Index persistence.
//!
//! The index is a single JSON array of processed shows, read once at run
//! start and written at most once at run end. There is no inter-process
//! locking; concurrent runs against the same file are undefined behavior.

pub mod local;

use crate::models::ProcessedShow;

// Re-export for convenience
pub use local::IndexStore;

/// Outcome of loading the index file.
///
/// Absent and malformed files both collapse to an empty index at the call
/// site, but the distinction stays visible for logging and tests.
#[derive(Debug)]
pub enum IndexLoad {
    /// No index file exists yet
    Absent,
    /// The file exists but is not a valid show array
    Malformed,
    /// Successfully loaded shows
    Loaded(Vec<ProcessedShow>),
}
