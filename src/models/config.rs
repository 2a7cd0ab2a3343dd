//! Application configuration structures.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration, loaded from a JSON file.
///
/// Structural problems (unreadable file, malformed JSON, missing or
/// non-array `shows`) are fatal configuration errors.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Ordered categorization rules; entries are validated individually
    /// when the rule set is compiled, so one bad entry does not reject
    /// the whole file
    pub shows: Vec<serde_json::Value>,

    /// Tag alias table: alias (case-insensitive) to canonical tag
    #[serde(default)]
    pub tag_mappings: HashMap<String, String>,

    /// Fetch behavior settings
    #[serde(default)]
    pub fetcher: FetcherConfig,
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        let config: Config = serde_json::from_str(&content).map_err(|e| {
            AppError::config(format!("Invalid config file {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        self.fetcher.validate()
    }
}

/// Catalog API and rate-limit settings.
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Base URL of the catalog API
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Catalog user whose shows are indexed
    #[serde(default = "defaults::user")]
    pub user: String,

    /// Page size for listing requests
    #[serde(default = "defaults::page_size")]
    pub page_size: u32,

    /// Fixed delay between requests in milliseconds
    #[serde(default = "defaults::rate_limit_delay_ms")]
    pub rate_limit_delay_ms: u64,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout_secs")]
    pub timeout_secs: u64,

    /// Retry count for transient HTTP failures
    #[serde(default = "defaults::max_retries")]
    pub max_retries: u32,

    /// Exponential backoff factor between retries, in seconds
    #[serde(default = "defaults::retry_backoff_factor")]
    pub retry_backoff_factor: f64,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl FetcherConfig {
    fn validate(&self) -> Result<()> {
        Url::parse(&self.base_url)
            .map_err(|e| AppError::config(format!("fetcher.base_url is invalid: {e}")))?;
        if self.user.trim().is_empty() {
            return Err(AppError::config("fetcher.user is empty"));
        }
        if self.page_size == 0 {
            return Err(AppError::config("fetcher.page_size must be > 0"));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::config("fetcher.timeout_secs must be > 0"));
        }
        Ok(())
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user: defaults::user(),
            page_size: defaults::page_size(),
            rate_limit_delay_ms: defaults::rate_limit_delay_ms(),
            timeout_secs: defaults::timeout_secs(),
            max_retries: defaults::max_retries(),
            retry_backoff_factor: defaults::retry_backoff_factor(),
            user_agent: defaults::user_agent(),
        }
    }
}

mod defaults {
    pub fn base_url() -> String {
        "https://api.mixcloud.com".into()
    }
    pub fn user() -> String {
        "punkrockradio".into()
    }
    pub fn page_size() -> u32 {
        100
    }
    pub fn rate_limit_delay_ms() -> u64 {
        1000
    }
    pub fn timeout_secs() -> u64 {
        30
    }
    pub fn max_retries() -> u32 {
        3
    }
    pub fn retry_backoff_factor() -> f64 {
        2.0
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; show-indexer/1.0)".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_minimal_config() {
        let config: Config = serde_json::from_str(r#"{"shows": []}"#).unwrap();
        assert!(config.shows.is_empty());
        assert!(config.tag_mappings.is_empty());
        assert_eq!(config.fetcher.page_size, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_missing_shows() {
        let result = serde_json::from_str::<Config>(r#"{"tag_mappings": {}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_non_array_shows() {
        let result = serde_json::from_str::<Config>(r#"{"shows": {"a": 1}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn load_rejects_missing_file() {
        let err = Config::load("/nonexistent/config.json").unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn load_rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        let err = Config::load(file.path()).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn validate_rejects_bad_base_url() {
        let mut config: Config = serde_json::from_str(r#"{"shows": []}"#).unwrap();
        config.fetcher.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }
}
