//! tweet-media-dl - media extraction and download for tweet GraphQL responses
//!
//! This library finds downloadable media inside the JSON documents returned by
//! the platform's internal GraphQL API and downloads them.
//!
//! # Features
//!
//! - Schema-tolerant extraction of photos, videos and animated GIFs
//! - Quote back-references on media of quoted records
//! - Deduplication and a persisted session cache
//! - Fallback to the TweetDetail endpoint for uncached records
//! - Multiple images bundled into one ZIP, with per-file fallback
//!
//! # Example
//!
//! ```no_run
//! use tweet_media_dl::{cache::ingest_response, Config, MediaCache};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let mut cache = MediaCache::new();
//!
//!     let body = std::fs::read("TweetDetail.json")?;
//!     let added = ingest_response(&body, &mut cache, &config.extract_options());
//!     println!("{} new items", added);
//!
//!     for item in cache.query_by_record("1712345678901234567") {
//!         println!("{} <- {}", item.filename(), item.source_url);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod dedup;
pub mod download;
pub mod error;
pub mod fs;
pub mod media;
pub mod output;

// Re-exports for convenience
pub use api::TweetDetailApi;
pub use cache::MediaCache;
pub use config::Config;
pub use download::{download_record, resolve_record, DispatchReport, Dispatcher, RecordLookup};
pub use error::{Error, Result};
pub use media::{extract, extract_with, ExtractOptions, MediaItem, MediaKind};
