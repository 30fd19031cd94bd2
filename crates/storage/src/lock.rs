//! TTL-bounded advisory locks layered on object storage.
//!
//! A lock on `key` is a uniquely tagged sentinel blob under `<key>/.lock/`
//! whose content is its expiry timestamp. Acquisition writes a sentinel and
//! succeeds iff no other live sentinel exists; expired sentinels are
//! deleted by the next acquirer, so a crashed holder's lock is reclaimable
//! after the TTL. The lock is advisory and serializes nothing outside its
//! own key.

use crate::error::{StorageError, StorageResult};
use crate::traits::ObjectStore;
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;
use uuid::Uuid;

/// Default lock lifetime.
pub const DEFAULT_LOCK_TTL: Duration = Duration::from_secs(60 * 60);

/// Base polling interval while another holder keeps the lock alive.
const RETRY_INTERVAL: Duration = Duration::from_millis(50);

/// Named advisory lock over an object store key.
pub struct StorageLock {
    store: Arc<dyn ObjectStore>,
    key: String,
    ttl: Duration,
}

impl StorageLock {
    /// Create a lock on `key` with the default TTL.
    pub fn new(store: Arc<dyn ObjectStore>, key: impl Into<String>) -> Self {
        Self::with_ttl(store, key, DEFAULT_LOCK_TTL)
    }

    /// Create a lock on `key` with an explicit TTL.
    pub fn with_ttl(store: Arc<dyn ObjectStore>, key: impl Into<String>, ttl: Duration) -> Self {
        Self {
            store,
            key: key.into(),
            ttl,
        }
    }

    /// Acquire the lock, waiting for a live holder to release or expire.
    pub async fn acquire(&self) -> StorageResult<LockGuard> {
        loop {
            if let Some(guard) = self.try_acquire().await? {
                return Ok(guard);
            }
            tokio::time::sleep(retry_interval()).await;
        }
    }

    /// Acquire the lock, giving up after `wait`.
    pub async fn acquire_within(&self, wait: Duration) -> StorageResult<LockGuard> {
        let deadline = tokio::time::Instant::now() + wait;
        loop {
            if let Some(guard) = self.try_acquire().await? {
                return Ok(guard);
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(StorageError::LockContended(self.key.clone()));
            }
            tokio::time::sleep(retry_interval()).await;
        }
    }

    /// One acquisition attempt. Expired sentinels are stolen; a live
    /// competitor makes the attempt back off with `Ok(None)`.
    pub async fn try_acquire(&self) -> StorageResult<Option<LockGuard>> {
        let sentinel = format!("{}/{}", self.lock_dir(), Uuid::new_v4());
        let expiry = OffsetDateTime::now_utc().unix_timestamp() + self.ttl.as_secs() as i64;
        self.store
            .put(&sentinel, Bytes::from(expiry.to_string()))
            .await?;

        let now = OffsetDateTime::now_utc().unix_timestamp();
        let mut contended = false;
        for competitor in self.store.list(&self.lock_dir()).await? {
            if competitor == sentinel {
                continue;
            }
            match self.sentinel_expiry(&competitor).await? {
                Some(at) if at > now => contended = true,
                // expired, unreadable, or already vanished: clear it out
                _ => {
                    self.store.delete(&competitor).await?;
                }
            }
        }

        if contended {
            self.store.delete(&sentinel).await?;
            return Ok(None);
        }
        Ok(Some(LockGuard {
            store: self.store.clone(),
            sentinel,
        }))
    }

    fn lock_dir(&self) -> String {
        format!("{}/.lock", self.key)
    }

    /// Expiry seconds of a sentinel, or None when it vanished or carries
    /// unreadable content.
    async fn sentinel_expiry(&self, key: &str) -> StorageResult<Option<i64>> {
        match self.store.get(key).await {
            Ok(data) => Ok(std::str::from_utf8(&data)
                .ok()
                .and_then(|s| s.trim().parse().ok())),
            Err(StorageError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Poll interval with per-attempt jitter so two in-process acquirers do not
/// collide on every round.
fn retry_interval() -> Duration {
    let jitter = u64::from(Uuid::new_v4().as_bytes()[0] % 50);
    RETRY_INTERVAL + Duration::from_millis(jitter)
}

/// A held lock. `release` removes the sentinel; a guard dropped without
/// release leaves the sentinel behind to expire after the TTL.
#[must_use = "a lock guard that is not released holds the lock until its TTL expires"]
pub struct LockGuard {
    store: Arc<dyn ObjectStore>,
    sentinel: String,
}

impl std::fmt::Debug for LockGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockGuard")
            .field("sentinel", &self.sentinel)
            .finish()
    }
}

impl LockGuard {
    /// Release the lock.
    pub async fn release(self) -> StorageResult<()> {
        self.store.delete(&self.sentinel).await?;
        Ok(())
    }

    /// Storage key of the sentinel backing this guard.
    pub fn sentinel_key(&self) -> &str {
        &self.sentinel
    }
}
