use async_trait::async_trait;

use crate::domain::PostRecord;
use crate::error::RepoError;

/// Post store trait - abstraction over the key-value table holding the log.
///
/// Implementations scope every operation to the single post collection.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Write a record unconditionally. An existing record with the same
    /// sort key is replaced.
    async fn put(&self, record: PostRecord) -> Result<(), RepoError>;

    /// Fetch at most `limit` records, newest first.
    async fn query_latest(&self, limit: usize) -> Result<Vec<PostRecord>, RepoError>;
}
