// src/error.rs

//! Unified error handling for the indexer application.

use std::fmt;

use thiserror::Error;

/// Result type alias for indexer operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error (bad config structure, unparsable rule)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog fetch failed at the page/transport level
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Raw record failed structural validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Per-item processing failed
    #[error("Processing error: {0}")]
    Processing(String),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a fetch error.
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a processing error wrapping an underlying cause.
    pub fn processing(message: impl fmt::Display) -> Self {
        Self::Processing(message.to_string())
    }

    /// Stable process exit code for this failure class.
    ///
    /// Calling scripts branch on these: 1 configuration, 2 fetch,
    /// 3 processing, 4 I/O.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 1,
            Self::Fetch(_) | Self::Http(_) => 2,
            Self::Validation(_) | Self::Processing(_) | Self::Json(_) => 3,
            Self::Io(_) => 4,
        }
    }
}
