//! Application state - shared across all handlers.

use std::sync::Arc;

use bbs_core::PostLog;
use bbs_core::ports::{Clock, PostStore, SystemClock};
use bbs_infra::InMemoryPostStore;

#[cfg(feature = "dynamodb")]
use bbs_infra::DynamoPostStore;

use crate::config::StoreConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostLog,
    pub clock: Arc<dyn Clock>,
    /// Set when posts live in process memory and need sweeping.
    pub memory_store: Option<Arc<InMemoryPostStore>>,
}

impl AppState {
    /// Build the application state for the configured store.
    pub async fn new(store_config: &StoreConfig) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let state = match store_config {
            StoreConfig::Memory => {
                tracing::warn!("Using in-memory post store - posts are lost on restart");
                Self::in_memory(clock)
            }
            #[cfg(feature = "dynamodb")]
            StoreConfig::DynamoDb(config) => {
                let store: Arc<dyn PostStore> = Arc::new(DynamoPostStore::new(config.clone()).await);
                Self {
                    posts: PostLog::new(store, clock.clone()),
                    clock,
                    memory_store: None,
                }
            }
        };

        tracing::info!("Application state initialized");
        state
    }

    /// State backed by a fresh in-memory store.
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        let memory = Arc::new(InMemoryPostStore::new());
        let store: Arc<dyn PostStore> = memory.clone();
        Self {
            posts: PostLog::new(store, clock.clone()),
            clock,
            memory_store: Some(memory),
        }
    }

    /// State over an arbitrary store.
    #[cfg(test)]
    pub fn with_store(store: Arc<dyn PostStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            posts: PostLog::new(store, clock.clone()),
            clock,
            memory_store: None,
        }
    }
}
