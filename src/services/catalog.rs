// src/services/catalog.rs

//! Catalog fetcher service.
//!
//! Walks the paginated catalog listing, resolves each summary item to its
//! detail record, and stops early for incremental updates. Items are
//! delivered to the caller in exactly the remote catalog's order.

use std::collections::HashSet;
use std::time::Duration;

use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{FetcherConfig, RawShow};
use crate::utils::{CatalogApi, HttpCatalogApi};

/// Summary of a fetch run.
#[derive(Debug, Clone, Default)]
pub struct FetchStats {
    /// Shows delivered to the sink
    pub fetched: usize,
    /// Listing pages requested
    pub pages: usize,
    /// Detail lookups that fell back to summary fields
    pub detail_failures: usize,
}

/// Service for fetching shows from the catalog API.
pub struct CatalogFetcher {
    api: Box<dyn CatalogApi>,
    base_url: String,
    user: String,
    page_size: u32,
    delay: Duration,
}

impl CatalogFetcher {
    /// Create a fetcher backed by the real HTTP client.
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        Ok(Self::with_api(Box::new(HttpCatalogApi::new(config)?), config))
    }

    /// Create a fetcher on top of an arbitrary API capability.
    pub fn with_api(api: Box<dyn CatalogApi>, config: &FetcherConfig) -> Self {
        Self {
            api,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user: config.user.clone(),
            page_size: config.page_size,
            delay: Duration::from_millis(config.rate_limit_delay_ms),
        }
    }

    /// Walk the catalog, passing each resolved show to `sink` in server
    /// order.
    ///
    /// Stops the whole walk when `limit` shows have been delivered, or
    /// immediately upon the first item whose key is in `known_keys` — the
    /// catalog is sorted newest-first, so everything after it is already
    /// indexed. Page-level failures are fatal; a failed detail lookup
    /// degrades to the summary item instead of dropping it.
    pub async fn fetch_shows<F>(
        &self,
        limit: Option<usize>,
        known_keys: &HashSet<String>,
        mut sink: F,
    ) -> Result<FetchStats>
    where
        F: FnMut(RawShow),
    {
        let mut url = format!(
            "{}/{}/cloudcasts/?limit={}",
            self.base_url, self.user, self.page_size
        );
        let mut stats = FetchStats::default();
        let mut count = 0usize;

        log::info!(
            "Starting to fetch shows (limit: {})",
            limit.map_or("unlimited".to_string(), |l| l.to_string())
        );

        loop {
            stats.pages += 1;
            log::debug!("Fetching page {}: {}", stats.pages, url);

            let body = self.api.get_json(&url).await?;
            let Some(page) = body.as_object() else {
                return Err(AppError::fetch(format!(
                    "Expected object response on page {}",
                    stats.pages
                )));
            };

            let empty = Vec::new();
            let items = match page.get("data") {
                None => &empty,
                Some(Value::Array(items)) => items,
                Some(_) => {
                    return Err(AppError::fetch(format!(
                        "Expected array in 'data' field on page {}",
                        stats.pages
                    )));
                }
            };

            log::info!("Page {}: retrieved {} shows", stats.pages, items.len());

            for item in items {
                if let Some(limit) = limit {
                    if count >= limit {
                        log::info!("Reached limit of {limit} shows");
                        return Ok(stats);
                    }
                }

                let summary: RawShow = match serde_json::from_value(item.clone()) {
                    Ok(summary) => summary,
                    Err(e) => {
                        log::warn!(
                            "Skipping unparsable listing item on page {}: {e}",
                            stats.pages
                        );
                        continue;
                    }
                };

                match summary.key.clone() {
                    Some(key) if known_keys.contains(&key) => {
                        log::info!("Found existing show '{key}', stopping incremental fetch");
                        return Ok(stats);
                    }
                    Some(key) => match self.fetch_detail(&key).await {
                        Ok(full) => sink(full),
                        Err(e) => {
                            stats.detail_failures += 1;
                            log::error!("Failed to fetch details for {key}: {e}");
                            // Summary fields lack a description but are
                            // better than dropping the show.
                            sink(summary);
                        }
                    },
                    None => {
                        log::warn!(
                            "Listing item without a key on page {}, keeping summary fields",
                            stats.pages
                        );
                        sink(summary);
                    }
                }

                count += 1;
                stats.fetched = count;
                self.pause().await;
            }

            match page
                .get("paging")
                .and_then(|p| p.get("next"))
                .and_then(|n| n.as_str())
            {
                Some(next) => {
                    let next = next.to_string();
                    self.pause().await;
                    url = next;
                }
                None => break,
            }
        }

        log::info!("Completed fetching. Total shows retrieved: {count}");
        Ok(stats)
    }

    async fn fetch_detail(&self, key: &str) -> Result<RawShow> {
        let detail_url = format!("{}{}", self.base_url, key);
        log::debug!("Fetching details for {key}");
        let body = self.api.get_json(&detail_url).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
