// src/services/processor.rs

//! Show processor.
//!
//! Turns a raw catalog record into the persisted index shape: validates
//! required fields, derives the category, merges and normalizes tags,
//! extracts the size-independent picture key, and drops descriptions that
//! merely repeat the title.

use crate::error::{AppError, Result};
use crate::models::{Pictures, ProcessedShow, RawShow};
use crate::services::Categorizer;

/// Picture URLs embed the key after this marker segment, e.g.
/// `https://thumbnailer.mixcloud.com/unsafe/300x300/extaudio/abc/uuid.jpg`.
const PICTURE_KEY_MARKER: &str = "unsafe/";

/// Fields a raw record must carry to be indexable.
const REQUIRED_FIELDS: [&str; 4] = ["key", "name", "slug", "url"];

/// Processes raw shows into persisted records.
pub struct ShowProcessor {
    categorizer: Categorizer,
}

impl ShowProcessor {
    pub fn new(categorizer: Categorizer) -> Self {
        Self { categorizer }
    }

    /// Process and categorize a single show.
    ///
    /// Fails with a processing error (wrapping the validation failure)
    /// when any of key, name, slug or url is absent.
    pub fn process(&self, raw: &RawShow) -> Result<ProcessedShow> {
        self.validate(raw)
            .map_err(|e| AppError::processing(format!("Failed to process show: {e}")))?;

        let title = raw.name.as_deref().unwrap_or("").trim();
        let (category, extra_tags) = self.categorizer.categorize(title);

        // Tag names from the loosely typed API objects; entries without a
        // string `name` are skipped.
        let existing_tags = raw
            .tags
            .iter()
            .filter_map(|tag| tag.get("name").and_then(|n| n.as_str()));
        let tags = self
            .categorizer
            .normalize_tags(existing_tags.chain(extra_tags.iter().map(String::as_str)));

        let mut processed = ProcessedShow {
            name: title.to_string(),
            slug: raw.slug.clone().unwrap_or_default(),
            key: raw.key.clone().unwrap_or_default(),
            created_time: raw.created_time.clone().unwrap_or_default(),
            picture_key: extract_picture_key(&raw.pictures),
            tags,
            category: category.to_string(),
            audio_length: raw.audio_length.unwrap_or(0),
            description: None,
        };

        // Keep the description only when it says more than the title.
        if let Some(description) = raw.description.as_deref() {
            if !description.is_empty() && normalize_text(description) != normalize_text(title) {
                processed.description = Some(description.to_string());
            }
        }

        log::debug!(
            "Processed show '{}' -> category '{}' with {} tags",
            processed.name,
            processed.category,
            processed.tags.len()
        );

        Ok(processed)
    }

    fn validate(&self, raw: &RawShow) -> Result<()> {
        let present = [&raw.key, &raw.name, &raw.slug, &raw.url];
        let missing: Vec<&str> = REQUIRED_FIELDS
            .iter()
            .zip(present)
            .filter(|(_, value)| value.is_none())
            .map(|(field, _)| *field)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )))
        }
    }
}

/// Extract the size-independent picture key from image URLs.
///
/// Scans sizes in preference order and, for the first URL found with the
/// marker, returns everything after the leading dimensions segment. An
/// empty result is not an error.
fn extract_picture_key(pictures: &Pictures) -> String {
    let by_preference = [
        &pictures.large,
        &pictures.medium,
        &pictures.small,
        &pictures.thumbnail,
    ];

    for url in by_preference.into_iter().flatten() {
        if let Some((_, suffix)) = url.split_once(PICTURE_KEY_MARKER) {
            // suffix starts with the dimensions segment, e.g. "300x300/..."
            if let Some((_, key)) = suffix.split_once('/') {
                return key.to_string();
            }
        }
    }

    String::new()
}

/// Reduce text to lowercased word characters for redundancy comparison.
fn normalize_text(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Config;

    fn processor(config_json: serde_json::Value) -> ShowProcessor {
        let config: Config = serde_json::from_value(config_json).unwrap();
        ShowProcessor::new(Categorizer::from_config(&config).unwrap())
    }

    fn raw_show() -> RawShow {
        serde_json::from_value(serde_json::json!({
            "key": "/punkrockradio/live-punk-session/",
            "name": "  Live Punk Session  ",
            "slug": "live-punk-session",
            "url": "https://www.mixcloud.com/punkrockradio/live-punk-session/",
            "created_time": "2024-05-01T12:00:00Z",
            "pictures": {
                "large": "https://thumbnailer.mixcloud.com/unsafe/300x300/extaudio/abc/uuid.jpg"
            },
            "tags": [{"name": "HipHop"}, {"name": "Jazz"}, {"url": "no-name"}],
            "audio_length": 3600,
            "description": "Two hours of raw punk energy."
        }))
        .unwrap()
    }

    fn punk_config() -> serde_json::Value {
        serde_json::json!({
            "shows": [
                {"name": "Punk", "regex": "punk", "extra_tags": ["genre:punk"]}
            ],
            "tag_mappings": {"hiphop": "Hip-Hop"}
        })
    }

    #[test]
    fn processes_full_record() {
        let p = processor(punk_config());
        let show = p.process(&raw_show()).unwrap();

        assert_eq!(show.name, "Live Punk Session");
        assert_eq!(show.slug, "live-punk-session");
        assert_eq!(show.key, "/punkrockradio/live-punk-session/");
        assert_eq!(show.category, "Punk");
        assert_eq!(show.tags, ["Hip-Hop", "Jazz", "genre:punk"]);
        assert_eq!(show.picture_key, "extaudio/abc/uuid.jpg");
        assert_eq!(show.audio_length, 3600);
        assert_eq!(
            show.description.as_deref(),
            Some("Two hours of raw punk energy.")
        );
    }

    #[test]
    fn missing_slug_fails_validation() {
        let p = processor(punk_config());
        let mut raw = raw_show();
        raw.slug = None;
        let err = p.process(&raw).unwrap_err();
        assert!(matches!(err, AppError::Processing(_)));
        assert!(err.to_string().contains("slug"));
    }

    #[test]
    fn redundant_description_is_dropped() {
        let p = processor(punk_config());
        let mut raw = raw_show();
        raw.description = Some("live PUNK session!!".to_string());
        let show = p.process(&raw).unwrap();
        assert!(show.description.is_none());
    }

    #[test]
    fn empty_description_is_dropped() {
        let p = processor(punk_config());
        let mut raw = raw_show();
        raw.description = Some(String::new());
        let show = p.process(&raw).unwrap();
        assert!(show.description.is_none());
    }

    #[test]
    fn picture_key_falls_back_through_sizes() {
        let pictures: Pictures = serde_json::from_value(serde_json::json!({
            "large": "https://example.com/no-marker.jpg",
            "medium": "https://thumbnailer.mixcloud.com/unsafe/60x60/extaudio/def/pic.jpg"
        }))
        .unwrap();
        assert_eq!(extract_picture_key(&pictures), "extaudio/def/pic.jpg");
    }

    #[test]
    fn no_extractable_picture_key_yields_empty() {
        assert_eq!(extract_picture_key(&Pictures::default()), "");

        let pictures: Pictures = serde_json::from_value(serde_json::json!({
            "small": "https://example.com/plain.jpg"
        }))
        .unwrap();
        assert_eq!(extract_picture_key(&pictures), "");
    }

    #[test]
    fn normalize_text_strips_non_word_characters() {
        assert_eq!(normalize_text("Live Punk Session!"), "livepunksession");
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("a_b-c"), "a_bc");
    }

    #[test]
    fn unmatched_title_gets_default_category() {
        let p = processor(serde_json::json!({"shows": []}));
        let mut raw = raw_show();
        raw.tags = Vec::new();
        let show = p.process(&raw).unwrap();
        assert_eq!(show.category, crate::services::DEFAULT_CATEGORY);
        assert!(show.tags.is_empty());
    }
}
