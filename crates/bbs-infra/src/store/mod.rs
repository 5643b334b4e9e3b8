//! Post store implementations - DynamoDB and in-memory fallback.

mod memory;

#[cfg(feature = "dynamodb")]
mod dynamo;

pub use memory::InMemoryPostStore;

#[cfg(feature = "dynamodb")]
pub use dynamo::{DEFAULT_TABLE, DynamoConfig, DynamoPostStore, ensure_table};
