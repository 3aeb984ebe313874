//! Session-scoped media cache.

use std::fs;
use std::path::Path;

use crate::dedup::SeenKeys;
use crate::error::{Error, Result};
use crate::media::MediaItem;

/// Ordered set of extracted media items for one browsing session.
///
/// Items are unique by `(record_id, source_url)`. The cache is created empty,
/// grows through [`merge`](Self::merge) and is emptied by
/// [`reset`](Self::reset) on a navigation boundary.
#[derive(Debug, Default, Clone)]
pub struct MediaCache {
    items: Vec<MediaItem>,
    seen: SeenKeys,
}

impl MediaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append items whose key is not cached yet. Returns how many were added.
    pub fn merge(&mut self, new_items: impl IntoIterator<Item = MediaItem>) -> usize {
        let before = self.items.len();
        for item in new_items {
            if self.seen.insert(&item) {
                self.items.push(item);
            }
        }
        let added = self.items.len() - before;
        tracing::debug!("Merged {} new media items ({} cached)", added, self.items.len());
        added
    }

    /// Items of `record_id` plus items of records it quotes.
    pub fn query_by_record(&self, record_id: &str) -> Vec<MediaItem> {
        self.items
            .iter()
            .filter(|item| item.belongs_to(record_id))
            .cloned()
            .collect()
    }

    /// Number of items directly contained in `record_id`.
    pub fn count_for_record(&self, record_id: &str) -> usize {
        self.items
            .iter()
            .filter(|item| item.record_id == record_id)
            .count()
    }

    /// Drop everything; called when the session navigates.
    pub fn reset(&mut self) {
        self.items.clear();
        self.seen.clear();
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Load a persisted cache.
    ///
    /// A missing file is an empty cache, and so is an unreadable one: a
    /// corrupt session store must not block extraction.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(Error::Io(e)),
        };

        let items: Vec<MediaItem> = match serde_json::from_str(&content) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Ignoring unreadable session cache {}: {}", path.display(), e);
                Vec::new()
            }
        };

        let mut cache = Self::new();
        cache.merge(items);
        Ok(cache)
    }

    /// Persist the cache as JSON, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.items)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaKind;

    fn item(record: &str, url: &str, referenced_by: Option<&str>) -> MediaItem {
        MediaItem {
            kind: MediaKind::Video,
            source_url: url.to_string(),
            display_name: format!("user-{}", record),
            record_id: record.to_string(),
            referenced_by: referenced_by.map(str::to_string),
        }
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut cache = MediaCache::new();
        let batch = vec![item("T1", "https://a", None), item("T1", "https://b", None)];

        assert_eq!(cache.merge(batch.clone()), 2);
        assert_eq!(cache.merge(batch), 0);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_merge_preserves_order() {
        let mut cache = MediaCache::new();
        cache.merge(vec![item("1", "https://a", None)]);
        cache.merge(vec![item("2", "https://b", None), item("1", "https://a", None)]);

        let records: Vec<&str> = cache.items().iter().map(|i| i.record_id.as_str()).collect();
        assert_eq!(records, vec!["1", "2"]);
    }

    #[test]
    fn test_query_includes_quoted_records() {
        let mut cache = MediaCache::new();
        cache.merge(vec![
            item("T1", "https://own", None),
            item("Q", "https://quoted", Some("T1")),
            item("T2", "https://other", None),
        ]);

        let urls: Vec<String> = cache
            .query_by_record("T1")
            .into_iter()
            .map(|i| i.source_url)
            .collect();
        assert_eq!(urls, vec!["https://own", "https://quoted"]);
        assert_eq!(cache.count_for_record("T1"), 1);
        assert!(cache.query_by_record("missing").is_empty());
    }

    #[test]
    fn test_reset_clears_keys() {
        let mut cache = MediaCache::new();
        cache.merge(vec![item("1", "https://a", None)]);
        cache.reset();
        assert!(cache.is_empty());
        assert_eq!(cache.merge(vec![item("1", "https://a", None)]), 1);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.json");

        let mut cache = MediaCache::new();
        cache.merge(vec![item("1", "https://a", Some("0")), item("2", "https://b", None)]);
        cache.save(&path).unwrap();

        let loaded = MediaCache::load(&path).unwrap();
        assert_eq!(loaded.items(), cache.items());
    }

    #[test]
    fn test_load_missing_or_corrupt_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(MediaCache::load(&dir.path().join("none.json")).unwrap().is_empty());

        let corrupt = dir.path().join("corrupt.json");
        std::fs::write(&corrupt, "{not json").unwrap();
        assert!(MediaCache::load(&corrupt).unwrap().is_empty());
    }
}
