//! Storage trait definitions.

use crate::error::StorageResult;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;

/// A boxed stream of bytes for streaming reads.
pub type ByteStream = Pin<Box<dyn Stream<Item = StorageResult<Bytes>> + Send>>;

/// Byte-addressable key/value store the repository is built on.
///
/// Keys are slash-separated UTF-8 paths. A prefix denotes a directory: it
/// matches keys that continue with `/`, and the empty prefix matches the
/// whole store. Every operation is a suspension point; implementations must
/// be safe for concurrent use across distinct keys.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// List all keys beneath a prefix. A missing prefix yields an empty
    /// list, not an error.
    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>>;

    /// Check whether a key exists.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Fetch a blob's full content.
    async fn get(&self, key: &str) -> StorageResult<Bytes>;

    /// Fetch a blob as a byte stream.
    async fn get_stream(&self, key: &str) -> StorageResult<ByteStream>;

    /// Store a blob atomically: concurrent readers observe either the old
    /// content or the full new content, never a partial write.
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()>;

    /// Delete a blob. Returns whether it existed.
    async fn delete(&self, key: &str) -> StorageResult<bool>;

    /// Move a blob to a new key.
    async fn rename(&self, src: &str, dst: &str) -> StorageResult<()>;

    /// Static identifier of the backend type, for logging.
    fn backend_name(&self) -> &'static str;
}
