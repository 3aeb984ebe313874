//! Deduplication module.
//!
//! Media items are keyed by `(record_id, source_url)`; the first occurrence
//! of a key wins.

pub mod tracker;

pub use tracker::{dedupe, DedupKey, SeenKeys};
