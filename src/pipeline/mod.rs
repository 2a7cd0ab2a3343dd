//! Pipeline entry points for indexer operations.
//!
//! - `run_fetch`: Fetch new shows and merge them into the index
//! - `run_recategorize`: Re-derive categories/tags locally, no fetching

pub mod fetch;
pub mod recategorize;

pub use fetch::run_fetch;
pub use recategorize::run_recategorize;
