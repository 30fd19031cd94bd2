//! In-memory storage backend.

use crate::error::{StorageError, StorageResult};
use crate::traits::{ByteStream, ObjectStore};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Non-persistent object store holding blobs in a sorted map.
///
/// Used by the test suites and suitable for throwaway deployments. Listing
/// order is lexicographic by key.
#[derive(Default)]
pub struct MemoryBackend {
    blobs: RwLock<BTreeMap<String, Bytes>>,
}

impl MemoryBackend {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Whether `key` sits beneath the directory-style `prefix`.
fn in_prefix(key: &str, prefix: &str) -> bool {
    if prefix.is_empty() {
        return true;
    }
    match key.strip_prefix(prefix) {
        Some(rest) => rest.starts_with('/'),
        None => false,
    }
}

#[async_trait]
impl ObjectStore for MemoryBackend {
    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let blobs = self.blobs.read().await;
        Ok(blobs
            .keys()
            .filter(|key| in_prefix(key, prefix))
            .cloned()
            .collect())
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.blobs.read().await.contains_key(key))
    }

    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        self.blobs
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn get_stream(&self, key: &str) -> StorageResult<ByteStream> {
        let data = self.get(key).await?;
        Ok(Box::pin(futures::stream::once(async move { Ok(data) })))
    }

    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()> {
        self.blobs.write().await.insert(key.to_string(), data);
        Ok(())
    }

    async fn delete(&self, key: &str) -> StorageResult<bool> {
        Ok(self.blobs.write().await.remove(key).is_some())
    }

    async fn rename(&self, src: &str, dst: &str) -> StorageResult<()> {
        let mut blobs = self.blobs.write().await;
        let data = blobs
            .remove(src)
            .ok_or_else(|| StorageError::NotFound(src.to_string()))?;
        blobs.insert(dst.to_string(), data);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
