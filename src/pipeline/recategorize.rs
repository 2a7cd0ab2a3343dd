// src/pipeline/recategorize.rs

//! Local recategorization pipeline.

use std::collections::BTreeSet;

use chrono::Utc;

use crate::error::Result;
use crate::models::Config;
use crate::services::Categorizer;
use crate::storage::IndexStore;

/// Re-derive category and tags for every stored show without fetching.
///
/// A show counts as updated when its category changes or its normalized
/// tag set differs from the stored (deduplicated, sorted) tags. The index
/// is written only when at least one show changed.
///
/// Returns the number of applied updates.
pub async fn run_recategorize(config: &Config, store: &IndexStore) -> Result<usize> {
    let start = Utc::now();
    log::info!("Starting local update mode");

    let categorizer = Categorizer::from_config(config)?;

    let mut shows = store.load_or_empty().await;
    if shows.is_empty() {
        log::warn!("No existing data to update");
        return Ok(0);
    }

    let mut updated = 0usize;

    for show in &mut shows {
        let (category, extra_tags) = categorizer.categorize(&show.name);
        if show.category != category {
            log::info!("Updated category: {} -> {category}", show.name);
            show.category = category.to_string();
            updated += 1;
        }

        let normalized = categorizer.normalize_tags(
            show.tags
                .iter()
                .map(String::as_str)
                .chain(extra_tags.iter().map(String::as_str)),
        );
        let current_sorted: Vec<String> = show
            .tags
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        if normalized != current_sorted {
            log::info!("Updated tags: {} -> {} tags", show.name, normalized.len());
            show.tags = normalized;
            updated += 1;
        }
    }

    if updated > 0 {
        log::info!("Updated {updated} shows");
        store.save(&shows).await?;
    } else {
        log::info!("No updates needed");
    }

    let elapsed = Utc::now() - start;
    log::info!(
        "Local update complete: {} shows checked, {updated} updates, {}s",
        shows.len(),
        elapsed.num_seconds()
    );

    Ok(updated)
}
