//! Post log gateway - append and bounded newest-first reads over a [`PostStore`].

use std::sync::Arc;

use crate::domain::{LIST_LIMIT, PostEntry, PostRecord};
use crate::error::RepoError;
use crate::ports::{Clock, PostStore};

/// Append-only, time-ordered, self-expiring log of posts.
///
/// Stateless apart from its collaborators; cheap to clone and share between
/// requests. No retries: storage failures go straight back to the caller.
#[derive(Clone)]
pub struct PostLog {
    store: Arc<dyn PostStore>,
    clock: Arc<dyn Clock>,
}

impl PostLog {
    pub fn new(store: Arc<dyn PostStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Stamp `content` with the current time and write it.
    ///
    /// Content is stored exactly as given, including empty or absent values.
    pub async fn append(&self, content: Option<String>) -> Result<PostRecord, RepoError> {
        let record = PostRecord::new(content, self.clock.now_millis());
        self.store.put(record.clone()).await?;
        Ok(record)
    }

    /// The newest [`LIST_LIMIT`] posts, newest first.
    pub async fn list(&self) -> Result<Vec<PostEntry>, RepoError> {
        let records = self.store.query_latest(LIST_LIMIT).await?;
        Ok(records.into_iter().map(PostEntry::from).collect())
    }
}
