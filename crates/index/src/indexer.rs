//! The revision index rebuild engine.

use crate::error::{IndexError, IndexResult};
use bodega_core::package_list::INDEX_FILE;
use bodega_core::revision::{RevisionEntry, RevisionList};
use bodega_storage::ObjectStore;
use bytes::Bytes;
use std::collections::BTreeSet;
use std::sync::Arc;
use time::OffsetDateTime;

/// Rebuilds `revisions.txt` files by scanning storage.
///
/// The indexer itself takes no locks; callers serialize rebuilds for a
/// coordinate through [`crate::api::RevisionsIndexApi`].
pub struct RevisionsIndexer {
    store: Arc<dyn ObjectStore>,
}

impl RevisionsIndexer {
    /// Create an indexer over a store.
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Rebuild `<dir>/revisions.txt`.
    ///
    /// Candidate revisions are the immediate child directories of `dir`
    /// whose names parse as non-negative integers. A candidate is recorded
    /// iff every file in `canonical` exists at the key `key_of(name, rev)`
    /// yields; a missing file just excludes the revision. The index is
    /// replaced in one atomic put and the recorded revisions are returned
    /// in ascending order.
    pub async fn build_index<F>(
        &self,
        dir: &str,
        canonical: &[&str],
        key_of: F,
    ) -> IndexResult<Vec<u32>>
    where
        F: Fn(&str, u32) -> String,
    {
        let keys = self.store.list(dir).await?;

        let mut valid = Vec::new();
        for rev in child_revisions(dir, &keys) {
            if self.revision_complete(rev, canonical, &key_of).await? {
                valid.push(rev);
            }
        }

        let now = OffsetDateTime::now_utc();
        let list = RevisionList {
            revisions: valid
                .iter()
                .map(|rev| RevisionEntry::new(*rev, now))
                .collect(),
        };
        let payload = list.to_json().map_err(|e| IndexError::Malformed {
            key: format!("{dir}/{INDEX_FILE}"),
            reason: e.to_string(),
        })?;
        self.store
            .put(&format!("{dir}/{INDEX_FILE}"), Bytes::from(payload))
            .await?;

        tracing::debug!(dir, revisions = valid.len(), "rebuilt revision index");
        Ok(valid)
    }

    async fn revision_complete<F>(
        &self,
        rev: u32,
        canonical: &[&str],
        key_of: &F,
    ) -> IndexResult<bool>
    where
        F: Fn(&str, u32) -> String,
    {
        for name in canonical {
            if !self.store.exists(&key_of(name, rev)).await? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Immediate child names of `dir` among the listed keys.
pub(crate) fn child_names(dir: &str, keys: &[String]) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    for key in keys {
        // require a '/' boundary so a sibling prefix never contributes
        let rest = if dir.is_empty() {
            key.as_str()
        } else {
            match key.strip_prefix(dir).and_then(|r| r.strip_prefix('/')) {
                Some(rest) => rest,
                None => continue,
            }
        };
        // a child *directory* shows up as a key with more path below it
        if let Some((first, _)) = rest.split_once('/') {
            if !first.is_empty() {
                names.insert(first.to_string());
            }
        }
    }
    names
}

/// Child directory names of `dir` that parse as revision numbers; anything
/// non-numeric is not a revision and is ignored.
fn child_revisions(dir: &str, keys: &[String]) -> BTreeSet<u32> {
    child_names(dir, keys)
        .into_iter()
        .filter_map(|name| name.parse().ok())
        .collect()
}
