use serde::{Deserialize, Serialize};

/// Partition value shared by every post; the whole log lives in one partition.
pub const COLLECTION: &str = "bbs";

/// How long a post lives before it becomes eligible for removal (2 days).
pub const RETENTION_SECS: i64 = 60 * 60 * 24 * 2;

/// Maximum number of posts returned by a listing.
pub const LIST_LIMIT: usize = 100;

/// Post record - a single persisted entry of the post log.
///
/// Records are created once and never mutated. `created_at` is the sort key;
/// two records written in the same millisecond share a key and the later
/// write replaces the earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Sort key, milliseconds since the Unix epoch.
    pub created_at: i64,
    /// Caller-supplied payload, stored as given. `None` when the caller sent none.
    pub content: Option<String>,
    /// Expiry, seconds since the Unix epoch.
    pub ttl: i64,
}

impl PostRecord {
    /// Build a record for a write happening at `now_millis`.
    pub fn new(content: Option<String>, now_millis: i64) -> Self {
        Self {
            created_at: now_millis,
            content,
            ttl: now_millis.div_euclid(1000) + RETENTION_SECS,
        }
    }

    /// The partition key; always [`COLLECTION`].
    pub fn partition_key(&self) -> &'static str {
        COLLECTION
    }

    /// Whether the storage layer may drop this record at `now_secs`.
    pub fn is_expired(&self, now_secs: i64) -> bool {
        self.ttl < now_secs
    }
}

/// The projection of a record exposed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostEntry {
    pub content: Option<String>,
    pub created_at: i64,
}

impl From<PostRecord> for PostEntry {
    fn from(record: PostRecord) -> Self {
        Self {
            content: record.content,
            created_at: record.created_at,
        }
    }
}
