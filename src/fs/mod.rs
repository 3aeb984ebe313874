//! Filesystem module.
//!
//! Provides:
//! - Filename derivation for extracted media
//! - Download and session cache locations

pub mod naming;
pub mod paths;

pub use naming::{
    archive_base_name, derive_stem, numbered_filename, sanitize_filename, timestamp_suffix,
    TimestampZone, MAX_UNIQUE_ATTEMPTS,
};
pub use paths::{default_cache_file, default_download_dir, ensure_dir};
