//! Session media cache and response ingestion.

pub mod ingest;
pub mod store;

pub use ingest::{extract_response, ingest_response};
pub use store::MediaCache;
