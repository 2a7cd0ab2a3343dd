// src/pipeline/fetch.rs

//! Fetch-and-index pipeline.

use std::collections::HashSet;

use chrono::Utc;

use crate::error::Result;
use crate::models::Config;
use crate::services::{CatalogFetcher, Categorizer, ShowProcessor};
use crate::storage::IndexStore;

/// Fetch new shows from the catalog and merge them into the index.
///
/// Derives the known-key set from the stored index, walks the catalog
/// incrementally, processes each raw record (per-item failures are logged
/// and skipped), and persists new records ahead of the existing ones. No
/// write happens when nothing new was fetched.
///
/// Returns the number of newly indexed shows.
pub async fn run_fetch(
    config: &Config,
    fetcher: &CatalogFetcher,
    store: &IndexStore,
    limit: Option<usize>,
) -> Result<usize> {
    let start = Utc::now();
    log::info!("Starting fetch and index mode");

    let existing = store.load_or_empty().await;
    let known_keys: HashSet<String> = existing
        .iter()
        .map(|show| show.key.clone())
        .filter(|key| !key.is_empty())
        .collect();

    // Rule compilation failures abort here, before any request goes out.
    let processor = ShowProcessor::new(Categorizer::from_config(config)?);

    let mut new_shows = Vec::new();
    let mut process_failures = 0usize;

    let stats = fetcher
        .fetch_shows(limit, &known_keys, |raw| {
            match processor.process(&raw) {
                Ok(show) => {
                    log::info!("Indexed: {}", show.name);
                    new_shows.push(show);
                }
                Err(e) => {
                    process_failures += 1;
                    log::error!("{e}");
                }
            }
        })
        .await?;

    if new_shows.is_empty() {
        log::info!("No new shows found");
        return Ok(0);
    }

    let new_count = new_shows.len();
    log::info!("Found {new_count} new shows");

    let mut all_shows = new_shows;
    all_shows.extend(existing);
    store.save(&all_shows).await?;

    let elapsed = Utc::now() - start;
    log::info!(
        "Fetch complete: {} pages, {} fetched, {} detail fallbacks, {} skipped, {}s",
        stats.pages,
        stats.fetched,
        stats.detail_failures,
        process_failures,
        elapsed.num_seconds()
    );

    Ok(new_count)
}
