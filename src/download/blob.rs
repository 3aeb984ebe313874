//! Transient in-memory download handles.
//!
//! An archive assembled in memory is registered here and submitted to the
//! sink by handle. The handle must be revoked once the download has started,
//! or immediately when submission fails.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::error::{Error, Result};

/// Opaque reference to bytes held by a [`BlobStore`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobHandle(String);

impl BlobHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BlobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registry of live blobs. Cloning shares the registry.
#[derive(Debug, Clone, Default)]
pub struct BlobStore {
    blobs: Arc<RwLock<HashMap<BlobHandle, Arc<Vec<u8>>>>>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register bytes and return a fresh `blob:<uuid>` handle.
    pub async fn create(&self, bytes: Vec<u8>) -> BlobHandle {
        let handle = BlobHandle(format!("blob:{}", uuid::Uuid::new_v4()));
        tracing::debug!("Created {} ({} bytes)", handle, bytes.len());
        self.blobs
            .write()
            .await
            .insert(handle.clone(), Arc::new(bytes));
        handle
    }

    pub async fn read(&self, handle: &BlobHandle) -> Result<Arc<Vec<u8>>> {
        self.blobs
            .read()
            .await
            .get(handle)
            .cloned()
            .ok_or_else(|| Error::BlobRevoked(handle.to_string()))
    }

    /// Release a blob. Returns `false` when it was already released.
    pub async fn revoke(&self, handle: &BlobHandle) -> bool {
        let removed = self.blobs.write().await.remove(handle).is_some();
        if removed {
            tracing::debug!("Revoked {}", handle);
        }
        removed
    }

    /// Release a blob after `delay`, giving the sink time to start reading it.
    pub fn revoke_after(&self, handle: BlobHandle, delay: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            store.revoke(&handle).await;
        })
    }

    /// Number of live blobs.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_read_revoke() {
        let store = BlobStore::new();
        let handle = store.create(vec![1, 2, 3]).await;

        assert!(handle.as_str().starts_with("blob:"));
        assert_eq!(*store.read(&handle).await.unwrap(), vec![1u8, 2, 3]);

        assert!(store.revoke(&handle).await);
        assert!(!store.revoke(&handle).await);
        assert!(matches!(store.read(&handle).await, Err(Error::BlobRevoked(_))));
    }

    #[tokio::test]
    async fn test_handles_are_unique() {
        let store = BlobStore::new();
        let a = store.create(Vec::new()).await;
        let b = store.create(Vec::new()).await;
        assert_ne!(a, b);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_revoke_after_delay() {
        let store = BlobStore::new();
        let handle = store.create(vec![0]).await;

        store
            .revoke_after(handle.clone(), Duration::from_millis(10))
            .await
            .unwrap();
        assert!(store.is_empty().await);
    }
}
