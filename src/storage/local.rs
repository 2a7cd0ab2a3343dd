//! Local filesystem index storage.
//!
//! Reads are tolerant: an absent or malformed index file yields an empty
//! index, never an error. Writes are all-or-nothing: the full sorted array
//! is written to a temp file and renamed over the destination, so a
//! consistent prior index survives any failed run.

use std::path::PathBuf;

use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::ProcessedShow;
use crate::storage::IndexLoad;

/// JSON index file backend.
#[derive(Clone)]
pub struct IndexStore {
    path: PathBuf,
}

impl IndexStore {
    /// Create a store for the given index file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Load the index, distinguishing absent, malformed and valid files.
    pub async fn load(&self) -> IndexLoad {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return IndexLoad::Absent,
            Err(e) => {
                log::warn!("Failed to read index {}: {e}", self.path.display());
                return IndexLoad::Malformed;
            }
        };

        match serde_json::from_slice::<Vec<ProcessedShow>>(&bytes) {
            Ok(shows) => IndexLoad::Loaded(shows),
            Err(e) => {
                log::warn!("Failed to parse index {}: {e}", self.path.display());
                IndexLoad::Malformed
            }
        }
    }

    /// Load the index, collapsing absent/malformed files to empty.
    pub async fn load_or_empty(&self) -> Vec<ProcessedShow> {
        match self.load().await {
            IndexLoad::Loaded(shows) => {
                log::info!(
                    "Loaded {} existing shows from {}",
                    shows.len(),
                    self.path.display()
                );
                shows
            }
            IndexLoad::Absent => {
                log::info!("No existing index found at {}", self.path.display());
                Vec::new()
            }
            IndexLoad::Malformed => {
                log::warn!(
                    "Invalid index file at {}. Starting with empty index.",
                    self.path.display()
                );
                Vec::new()
            }
        }
    }

    /// Persist the index sorted by creation timestamp descending.
    ///
    /// Shows without a timestamp (empty string) sort last. The parent
    /// directory is created if needed and the write is atomic.
    pub async fn save(&self, shows: &[ProcessedShow]) -> Result<()> {
        let mut sorted = shows.to_vec();
        sorted.sort_by(|a, b| b.created_time.cmp(&a.created_time));

        let bytes = serde_json::to_vec_pretty(&sorted)?;
        self.write_bytes(&bytes).await?;

        log::info!("Saved {} shows to {}", sorted.len(), self.path.display());
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn show(name: &str, created_time: &str) -> ProcessedShow {
        ProcessedShow {
            name: name.to_string(),
            slug: name.to_lowercase(),
            key: format!("/punkrockradio/{}/", name.to_lowercase()),
            created_time: created_time.to_string(),
            category: "Punk".to_string(),
            ..ProcessedShow::default()
        }
    }

    #[tokio::test]
    async fn absent_file_loads_as_absent() {
        let tmp = TempDir::new().unwrap();
        let store = IndexStore::new(tmp.path().join("shows.json"));
        assert!(matches!(store.load().await, IndexLoad::Absent));
        assert!(store.load_or_empty().await.is_empty());
    }

    #[tokio::test]
    async fn malformed_file_loads_as_malformed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("shows.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();

        let store = IndexStore::new(&path);
        assert!(matches!(store.load().await, IndexLoad::Malformed));
        assert!(store.load_or_empty().await.is_empty());
    }

    #[tokio::test]
    async fn non_array_file_loads_as_malformed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("shows.json");
        tokio::fs::write(&path, br#"{"name": "not an array"}"#)
            .await
            .unwrap();

        let store = IndexStore::new(&path);
        assert!(matches!(store.load().await, IndexLoad::Malformed));
    }

    #[tokio::test]
    async fn save_sorts_by_created_time_descending() {
        let tmp = TempDir::new().unwrap();
        let store = IndexStore::new(tmp.path().join("shows.json"));

        let shows = vec![
            show("Old", "2023-01-01T00:00:00Z"),
            show("Undated", ""),
            show("New", "2024-06-01T00:00:00Z"),
        ];
        store.save(&shows).await.unwrap();

        let loaded = store.load_or_empty().await;
        let names: Vec<_> = loaded.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["New", "Old", "Undated"]);
    }

    #[tokio::test]
    async fn save_creates_parent_directory() {
        let tmp = TempDir::new().unwrap();
        let store = IndexStore::new(tmp.path().join("nested/dir/shows.json"));
        store.save(&[show("A", "2024-01-01T00:00:00Z")]).await.unwrap();
        assert_eq!(store.load_or_empty().await.len(), 1);
    }

    #[tokio::test]
    async fn save_leaves_no_temp_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("shows.json");
        let store = IndexStore::new(&path);
        store.save(&[show("A", "2024-01-01T00:00:00Z")]).await.unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn save_writes_pretty_utf8_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("shows.json");
        let store = IndexStore::new(&path);

        let mut record = show("Été Punk", "2024-01-01T00:00:00Z");
        record.category = "Sans catégorie".to_string();
        store.save(&[record]).await.unwrap();

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        // 2-space indentation, non-ASCII unescaped.
        assert!(content.contains("  \"name\": \"Été Punk\""));
        assert!(content.contains("Sans catégorie"));
        assert!(!content.contains("\\u"));
    }

    #[tokio::test]
    async fn round_trips_through_tolerant_load() {
        let tmp = TempDir::new().unwrap();
        let store = IndexStore::new(tmp.path().join("shows.json"));

        let mut record = show("A", "2024-01-01T00:00:00Z");
        record.tags = vec!["Punk".to_string(), "Rock".to_string()];
        record.description = Some("More than the title".to_string());
        store.save(std::slice::from_ref(&record)).await.unwrap();

        let loaded = store.load_or_empty().await;
        assert_eq!(loaded, vec![record]);
    }
}
