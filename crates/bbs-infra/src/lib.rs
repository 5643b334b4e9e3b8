//! # BBS Infrastructure
//!
//! Concrete implementations of the ports defined in `bbs-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `dynamodb` - DynamoDB post store and table provisioning

pub mod store;

pub use store::InMemoryPostStore;

#[cfg(feature = "dynamodb")]
pub use store::{DynamoConfig, DynamoPostStore};
