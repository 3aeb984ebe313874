//! Feeding intercepted response bodies into the cache.

use serde_json::Value;

use crate::cache::store::MediaCache;
use crate::dedup::dedupe;
use crate::media::{extract_with, ExtractOptions, MediaItem};

/// Extract and dedupe the media of one fully buffered response body.
///
/// Bodies that are not JSON yield nothing.
pub fn extract_response(body: &[u8], options: &ExtractOptions) -> Vec<MediaItem> {
    match serde_json::from_slice::<Value>(body) {
        Ok(document) => dedupe(extract_with(&document, options)),
        Err(e) => {
            tracing::debug!("Skipping non-JSON response body: {}", e);
            Vec::new()
        }
    }
}

/// Extract one response body and merge it into `cache`.
///
/// Returns the number of items that were new to the cache.
pub fn ingest_response(body: &[u8], cache: &mut MediaCache, options: &ExtractOptions) -> usize {
    let items = extract_response(body, options);
    if items.is_empty() {
        return 0;
    }
    cache.merge(items)
}
