//! Expiry sweeper for the in-memory post store, driven by tokio-cron-scheduler.
//!
//! The table expires records on its own; the in-memory store needs this job
//! to give posts the same eventual removal after their `ttl`.

use std::sync::Arc;

use bbs_core::ports::Clock;
use bbs_infra::InMemoryPostStore;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Sweeper configuration.
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    /// Run background jobs at all.
    pub enabled: bool,
    /// Cron expression (with seconds) for the sweep.
    pub schedule: String,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            schedule: "0 */5 * * * *".to_string(),
        }
    }
}

impl SweeperConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: std::env::var("SCHEDULER_ENABLED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(defaults.enabled),
            schedule: std::env::var("SWEEP_SCHEDULE").unwrap_or(defaults.schedule),
        }
    }
}

/// Remove every expired post from `store` as of `clock`.
pub async fn sweep_once(store: &InMemoryPostStore, clock: &dyn Clock) -> usize {
    let now_secs = clock.now_millis().div_euclid(1000);
    store.purge_expired(now_secs).await
}

/// Cron job that periodically purges expired posts.
pub struct ExpirySweeper {
    inner: JobScheduler,
}

impl ExpirySweeper {
    /// Register the sweep job and start the scheduler.
    ///
    /// Returns `None` when background jobs are disabled.
    pub async fn start(
        config: &SweeperConfig,
        store: Arc<InMemoryPostStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Option<Self>, JobSchedulerError> {
        if !config.enabled {
            tracing::info!("Scheduler disabled");
            return Ok(None);
        }

        let inner = JobScheduler::new().await?;
        let job = Job::new_async(config.schedule.as_str(), move |_uuid, _lock| {
            let store = store.clone();
            let clock = clock.clone();
            Box::pin(async move {
                let purged = sweep_once(&store, clock.as_ref()).await;
                tracing::debug!(purged, "Expiry sweep finished");
            })
        })?;

        let id = inner.add(job).await?;
        tracing::info!(schedule = %config.schedule, job_id = %id, "Expiry sweep registered");

        inner.start().await?;
        tracing::info!("Scheduler started");
        Ok(Some(Self { inner }))
    }

    /// Stop the scheduler.
    pub async fn shutdown(&mut self) -> Result<(), JobSchedulerError> {
        self.inner.shutdown().await?;
        tracing::info!("Scheduler stopped");
        Ok(())
    }
}
