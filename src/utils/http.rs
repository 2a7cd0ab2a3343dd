// src/utils/http.rs

//! Retryable HTTP capability for the catalog API.
//!
//! Transient failures (429, 5xx, timeouts, connection errors) are retried
//! with exponential backoff up to a bounded count; everything else is
//! surfaced immediately. The fetcher consumes this as a capability and
//! never retries on its own.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::FetcherConfig;

/// GET-JSON capability the catalog fetcher is built on.
///
/// Object-safe so tests can substitute an in-memory fake.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetch a URL and parse the response body as JSON.
    async fn get_json(&self, url: &str) -> Result<Value>;
}

/// Real HTTP implementation backed by reqwest.
pub struct HttpCatalogApi {
    client: reqwest::Client,
    max_retries: u32,
    backoff_factor: f64,
}

impl HttpCatalogApi {
    /// Create a configured HTTP client.
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            max_retries: config.max_retries,
            backoff_factor: config.retry_backoff_factor,
        })
    }

    /// Backoff delay before retry `attempt` (0-based).
    fn retry_delay(backoff_factor: f64, attempt: u32) -> Duration {
        Duration::from_secs_f64(backoff_factor * 2f64.powi(attempt as i32))
    }

    fn retryable_status(status: reqwest::StatusCode) -> bool {
        status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn get_json(&self, url: &str) -> Result<Value> {
        let mut attempt = 0u32;
        loop {
            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response.json::<Value>().await.map_err(|e| {
                            AppError::fetch(format!("Invalid JSON response from {url}: {e}"))
                        });
                    }
                    if Self::retryable_status(status) && attempt < self.max_retries {
                        let delay = Self::retry_delay(self.backoff_factor, attempt);
                        log::warn!(
                            "HTTP {status} from {url}, retrying in {:.1}s",
                            delay.as_secs_f64()
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(AppError::fetch(format!("HTTP {status} from {url}")));
                }
                Err(e) if (e.is_timeout() || e.is_connect()) && attempt < self.max_retries => {
                    let delay = Self::retry_delay(self.backoff_factor, attempt);
                    log::warn!(
                        "Request to {url} failed ({e}), retrying in {:.1}s",
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) if e.is_timeout() => {
                    return Err(AppError::fetch(format!("Request timeout for {url}: {e}")));
                }
                Err(e) => return Err(AppError::Http(e)),
            }
        }
    }
}
