//! Resolving a record to its media: session cache first, then the network.

use async_trait::async_trait;

use crate::cache::MediaCache;
use crate::download::dispatcher::Dispatcher;
use crate::download::state::DispatchReport;
use crate::error::{Error, Result};
use crate::media::MediaItem;

/// One place media for a record can be found.
#[async_trait]
pub trait RecordLookup: Send + Sync {
    /// Short label used in log lines.
    fn name(&self) -> &'static str;

    async fn lookup(&self, record_id: &str) -> Result<Vec<MediaItem>>;
}

#[async_trait]
impl RecordLookup for MediaCache {
    fn name(&self) -> &'static str {
        "cache"
    }

    async fn lookup(&self, record_id: &str) -> Result<Vec<MediaItem>> {
        Ok(self.query_by_record(record_id))
    }
}

/// Try each lookup in order; the first non-empty answer wins.
pub async fn resolve_record(
    record_id: &str,
    lookups: &[&dyn RecordLookup],
) -> Result<Vec<MediaItem>> {
    for lookup in lookups {
        match lookup.lookup(record_id).await {
            Ok(items) if !items.is_empty() => {
                tracing::info!(
                    "Found {} media items for {} via {}",
                    items.len(),
                    record_id,
                    lookup.name()
                );
                return Ok(items);
            }
            Ok(_) => {
                tracing::info!("{} empty for {}, falling back", lookup.name(), record_id);
            }
            Err(e) => {
                tracing::warn!("{} lookup failed for {}: {}", lookup.name(), record_id, e);
            }
        }
    }

    tracing::error!("No media found for record {}", record_id);
    Err(Error::NoMediaFound(record_id.to_string()))
}

/// Resolve a record and hand its media to the dispatcher.
pub async fn download_record(
    record_id: &str,
    lookups: &[&dyn RecordLookup],
    dispatcher: &Dispatcher,
) -> Result<DispatchReport> {
    let items = resolve_record(record_id, lookups).await?;
    Ok(dispatcher.dispatch(&items).await)
}
