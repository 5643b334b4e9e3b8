//! In-memory post store - used for development and when no table is configured.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use bbs_core::domain::PostRecord;
use bbs_core::error::RepoError;
use bbs_core::ports::PostStore;

/// In-memory post store keyed by sort key.
///
/// Behaves like the table: same-key writes overwrite, expired records stay
/// visible until [`InMemoryPostStore::purge_expired`] removes them.
/// Note: Data is lost on process restart.
pub struct InMemoryPostStore {
    records: RwLock<BTreeMap<i64, PostRecord>>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
        }
    }

    /// Drop every record whose expiry is before `now_secs`. Returns how many went.
    pub async fn purge_expired(&self, now_secs: i64) -> usize {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, record| !record.is_expired(now_secs));
        let purged = before - records.len();
        if purged > 0 {
            tracing::debug!(purged, remaining = records.len(), "Purged expired posts");
        }
        purged
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl Default for InMemoryPostStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn put(&self, record: PostRecord) -> Result<(), RepoError> {
        let mut records = self.records.write().await;
        if records.insert(record.created_at, record).is_some() {
            tracing::debug!("Post overwrote an existing record with the same sort key");
        }
        Ok(())
    }

    async fn query_latest(&self, limit: usize) -> Result<Vec<PostRecord>, RepoError> {
        let records = self.records.read().await;
        Ok(records.values().rev().take(limit).cloned().collect())
    }
}
