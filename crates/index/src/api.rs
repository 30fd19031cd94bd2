//! Public facade over the revision indexer.
//!
//! One instance serves one package coordinate. Every mutating method runs
//! under the coordinate-root lock, so recipe and binary index updates for
//! the same package never interleave; distinct coordinates proceed in
//! parallel.

use crate::error::{IndexError, IndexResult};
use crate::indexer::{child_names, RevisionsIndexer};
use bodega_core::coordinate::{BinaryHash, PackagePath};
use bodega_core::package_list::{BIN_SUBDIR, PKG_BIN_LIST, PKG_SRC_LIST};
use bodega_core::revision::{RevisionEntry, RevisionList};
use bodega_storage::{LockGuard, ObjectStore, StorageLock, DEFAULT_LOCK_TTL};
use bytes::Bytes;
use std::sync::Arc;
use time::OffsetDateTime;

/// Result of one binary index rebuild within a full update.
#[derive(Debug)]
pub struct BinaryUpdate {
    pub recipe_rev: u32,
    pub hash: BinaryHash,
    pub revisions: Vec<u32>,
}

/// Outcome of a whole-package index refresh.
///
/// Failures on individual binaries do not abort the sweep; they are
/// collected here alongside the successful rebuilds.
#[derive(Debug, Default)]
pub struct FullUpdate {
    pub recipe_revisions: Vec<u32>,
    pub binaries: Vec<BinaryUpdate>,
    pub failures: Vec<(u32, BinaryHash, IndexError)>,
}

/// Revision index API for one package coordinate.
pub struct RevisionsIndexApi {
    store: Arc<dyn ObjectStore>,
    package: PackagePath,
    indexer: RevisionsIndexer,
}

impl RevisionsIndexApi {
    /// Create the API over a store for one coordinate.
    pub fn new(store: Arc<dyn ObjectStore>, package: PackagePath) -> Self {
        let indexer = RevisionsIndexer::new(store.clone());
        Self {
            store,
            package,
            indexer,
        }
    }

    /// Rebuild the recipe index by scanning storage.
    pub async fn update_recipe_index(&self) -> IndexResult<Vec<u32>> {
        let guard = self.lock().await?;
        let result = self
            .indexer
            .build_index(self.package.as_str(), PKG_SRC_LIST, |name, rev| {
                self.package.recipe_file(rev, name)
            })
            .await;
        guard.release().await?;
        result
    }

    /// Rebuild the index of one binary. Locks at the coordinate root, not
    /// the binary directory, so recipe rebuilds cannot interleave.
    pub async fn update_binary_index(
        &self,
        recipe_rev: u32,
        hash: &BinaryHash,
    ) -> IndexResult<Vec<u32>> {
        let guard = self.lock().await?;
        let result = self.rebuild_binary(recipe_rev, hash).await;
        guard.release().await?;
        result
    }

    /// Revision numbers recorded in the recipe index, in file order. An
    /// absent index reads as empty.
    pub async fn get_recipe_revisions(&self) -> IndexResult<Vec<u32>> {
        self.read_numbers(&self.package.index_key()).await
    }

    /// The highest recipe revision on record, with its timestamp. An
    /// absent index reads as `None`.
    pub async fn latest_recipe_revision(&self) -> IndexResult<Option<RevisionEntry>> {
        let list = self.read_list(&self.package.index_key()).await?;
        Ok(list.latest().cloned())
    }

    /// Revision numbers recorded in a binary index, in file order.
    pub async fn get_binary_revisions(
        &self,
        recipe_rev: u32,
        hash: &BinaryHash,
    ) -> IndexResult<Vec<u32>> {
        self.read_numbers(&self.package.binary_index_key(recipe_rev, hash))
            .await
    }

    /// Append a revision entry to the recipe index without scanning files.
    /// Used right after a successful recipe upload.
    pub async fn add_recipe_revision(&self, rev: u32) -> IndexResult<()> {
        let key = self.package.index_key();
        let guard = self.lock().await?;
        let result = self.append_revision(&key, rev).await;
        guard.release().await?;
        result
    }

    /// Remove a revision entry from the recipe index. Returns whether the
    /// entry was present.
    pub async fn remove_recipe_revision(&self, rev: u32) -> IndexResult<bool> {
        let key = self.package.index_key();
        let guard = self.lock().await?;
        let result = self.drop_revision(&key, rev).await;
        guard.release().await?;
        result
    }

    /// Append a revision entry to a binary index without scanning files.
    pub async fn add_binary_revision(
        &self,
        recipe_rev: u32,
        hash: &BinaryHash,
        rev: u32,
    ) -> IndexResult<()> {
        let key = self.package.binary_index_key(recipe_rev, hash);
        let guard = self.lock().await?;
        let result = self.append_revision(&key, rev).await;
        guard.release().await?;
        result
    }

    /// Remove a revision entry from a binary index. Returns whether the
    /// entry was present.
    pub async fn remove_binary_revision(
        &self,
        recipe_rev: u32,
        hash: &BinaryHash,
        rev: u32,
    ) -> IndexResult<bool> {
        let key = self.package.binary_index_key(recipe_rev, hash);
        let guard = self.lock().await?;
        let result = self.drop_revision(&key, rev).await;
        guard.release().await?;
        result
    }

    /// Refresh every index of the package: the recipe index first, then
    /// the binary index of each hash found under each recipe revision.
    pub async fn full_index_update(&self) -> IndexResult<FullUpdate> {
        let mut update = FullUpdate {
            recipe_revisions: self.update_recipe_index().await?,
            ..FullUpdate::default()
        };

        for recipe_rev in update.recipe_revisions.clone() {
            for hash in self.list_binary_hashes(recipe_rev).await? {
                match self.update_binary_index(recipe_rev, &hash).await {
                    Ok(revisions) => update.binaries.push(BinaryUpdate {
                        recipe_rev,
                        hash,
                        revisions,
                    }),
                    Err(err) => {
                        tracing::warn!(
                            package = %self.package,
                            recipe_rev,
                            hash = %hash,
                            error = %err,
                            "binary index update failed"
                        );
                        update.failures.push((recipe_rev, hash, err));
                    }
                }
            }
        }

        Ok(update)
    }

    /// Binary hashes present under one recipe revision.
    async fn list_binary_hashes(&self, recipe_rev: u32) -> IndexResult<Vec<BinaryHash>> {
        let dir = format!("{}/{}/{}", self.package, recipe_rev, BIN_SUBDIR);
        let keys = self.store.list(&dir).await?;
        Ok(child_names(&dir, &keys)
            .into_iter()
            .filter_map(|name| BinaryHash::parse(&name).ok())
            .collect())
    }

    async fn rebuild_binary(&self, recipe_rev: u32, hash: &BinaryHash) -> IndexResult<Vec<u32>> {
        let dir = self.package.binary_dir(recipe_rev, hash);
        self.indexer
            .build_index(&dir, PKG_BIN_LIST, |name, rev| {
                self.package.binary_file(recipe_rev, hash, rev, name)
            })
            .await
    }

    async fn lock(&self) -> IndexResult<LockGuard> {
        let lock = StorageLock::new(self.store.clone(), self.package.as_str());
        Ok(lock.acquire_within(DEFAULT_LOCK_TTL).await?)
    }

    /// Read an index document, treating an absent file as empty.
    async fn read_list(&self, key: &str) -> IndexResult<RevisionList> {
        match self.store.get(key).await {
            Ok(data) => RevisionList::parse(&data).map_err(|e| IndexError::Malformed {
                key: key.to_string(),
                reason: e.to_string(),
            }),
            Err(bodega_storage::StorageError::NotFound(_)) => Ok(RevisionList::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_list(&self, key: &str, list: &RevisionList) -> IndexResult<()> {
        let payload = list.to_json().map_err(|e| IndexError::Malformed {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.store.put(key, Bytes::from(payload)).await?;
        Ok(())
    }

    async fn read_numbers(&self, key: &str) -> IndexResult<Vec<u32>> {
        Ok(self.read_list(key).await?.numbers())
    }

    async fn append_revision(&self, key: &str, rev: u32) -> IndexResult<()> {
        let mut list = self.read_list(key).await?;
        list.revisions
            .push(RevisionEntry::new(rev, OffsetDateTime::now_utc()));
        self.write_list(key, &list).await
    }

    async fn drop_revision(&self, key: &str, rev: u32) -> IndexResult<bool> {
        let mut list = self.read_list(key).await?;
        let before = list.revisions.len();
        list.revisions.retain(|e| e.number() != Some(rev));
        if list.revisions.len() == before {
            return Ok(false);
        }
        self.write_list(key, &list).await?;
        Ok(true)
    }
}
