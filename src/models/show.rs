//! Show data structures.

use serde::{Deserialize, Serialize};

/// Named image URLs of different sizes sharing a common path suffix.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pictures {
    pub small: Option<String>,
    pub medium: Option<String>,
    pub large: Option<String>,
    pub extra_large: Option<String>,
    pub thumbnail: Option<String>,
    pub medium_mobile: Option<String>,
}

/// A show as returned by the catalog API.
///
/// Every field is optional at the wire level; required fields are enforced
/// by the processor. Summary items from listing pages lack `description`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawShow {
    /// Unique opaque catalog key (e.g. "/punkrockradio/some-show/")
    pub key: Option<String>,

    /// Display name
    pub name: Option<String>,

    /// URL slug
    pub slug: Option<String>,

    /// Public page URL
    pub url: Option<String>,

    /// Creation timestamp (ISO 8601 string)
    pub created_time: Option<String>,

    /// Image URLs by size
    #[serde(default)]
    pub pictures: Pictures,

    /// Tag objects; kept loosely typed, entries without a string `name`
    /// are skipped during processing
    #[serde(default)]
    pub tags: Vec<serde_json::Value>,

    /// Duration in seconds
    pub audio_length: Option<u64>,

    /// Free-text description (detail records only)
    pub description: Option<String>,
}

/// A processed show as persisted in the index file.
///
/// All fields are defaulted so that index files written by older versions
/// still load.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProcessedShow {
    /// Display name (trimmed title)
    #[serde(default)]
    pub name: String,

    /// URL slug
    #[serde(default)]
    pub slug: String,

    /// Original catalog key, retained for incremental matching
    #[serde(default)]
    pub key: String,

    /// Creation timestamp; empty string when the catalog omitted it
    #[serde(default)]
    pub created_time: String,

    /// Size-independent image path suffix; empty when not extractable
    #[serde(default)]
    pub picture_key: String,

    /// Deduplicated, lexicographically sorted tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Derived category; always present
    #[serde(default)]
    pub category: String,

    /// Duration in seconds
    #[serde(default)]
    pub audio_length: u64,

    /// Description, omitted when it merely repeats the title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
