//! Download module.
//!
//! This module provides:
//! - Record lookup (session cache, then network)
//! - The dispatcher with archive and individual image strategies
//! - In-memory archive assembly and transient blob handles
//! - The download sink writing into the download directory

pub mod archive;
pub mod blob;
pub mod dispatcher;
pub mod fetch;
pub mod lookup;
pub mod sink;
pub mod state;

pub use archive::{build_archive, ArchiveEntry};
pub use blob::{BlobHandle, BlobStore};
pub use dispatcher::{Dispatcher, DEFAULT_RELEASE_DELAY};
pub use fetch::{HttpFetcher, MediaFetcher};
pub use lookup::{download_record, resolve_record, RecordLookup};
pub use sink::{media_client, DownloadRequest, DownloadSink, DownloadSource, FsDownloadSink};
pub use state::{DispatchReport, FailedDownload, ImageStrategy};
