//! Deduplication of extracted media items.

use std::collections::HashSet;

use crate::media::MediaItem;

/// Identity of a media item: the record containing it and its source URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub record_id: String,
    pub source_url: String,
}

impl DedupKey {
    pub fn of(item: &MediaItem) -> Self {
        Self {
            record_id: item.record_id.clone(),
            source_url: item.source_url.clone(),
        }
    }
}

/// Set of keys already seen, shared by [`dedupe`] and the media cache.
#[derive(Debug, Default, Clone)]
pub struct SeenKeys {
    keys: HashSet<DedupKey>,
}

impl SeenKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the item's key. Returns `true` the first time a key is seen.
    pub fn insert(&mut self, item: &MediaItem) -> bool {
        self.keys.insert(DedupKey::of(item))
    }

    pub fn contains(&self, item: &MediaItem) -> bool {
        self.keys.contains(&DedupKey::of(item))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

/// Drop repeated items, keeping the first occurrence of each key in order.
pub fn dedupe(items: impl IntoIterator<Item = MediaItem>) -> Vec<MediaItem> {
    let mut seen = SeenKeys::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item))
        .collect()
}
