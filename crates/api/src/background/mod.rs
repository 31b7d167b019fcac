//! Background tasks and scheduled jobs.
//!
//! The hot-score and sitemap loops live in `answer-worker`; this module
//! runs them inside the API process when `RUN_BACKGROUND_JOBS` is enabled.
//! All tasks share one [`CancellationToken`] for graceful shutdown.

use std::time::Duration;

use sqlx::PgPool;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::JobsConfig;

/// Handles of the spawned job loops.
pub struct BackgroundJobs {
    cancel: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl BackgroundJobs {
    /// Spawn the configured jobs. Nothing is spawned when jobs are disabled.
    pub fn start(pool: &PgPool, config: &JobsConfig) -> Self {
        let cancel = CancellationToken::new();
        let mut handles = Vec::new();

        if config.run_background_jobs {
            handles.push(tokio::spawn(answer_worker::hot_score::run(
                pool.clone(),
                Duration::from_secs(config.hot_score_interval_secs),
                cancel.clone(),
            )));
            handles.push(tokio::spawn(answer_worker::sitemap::run(
                pool.clone(),
                Duration::from_secs(config.sitemap_interval_secs),
                cancel.clone(),
            )));
            tracing::info!(
                hot_score_interval_secs = config.hot_score_interval_secs,
                sitemap_interval_secs = config.sitemap_interval_secs,
                "Background jobs started"
            );
        } else {
            tracing::info!("Background jobs disabled");
        }

        Self { cancel, handles }
    }

    /// Cancel every job and wait up to `timeout` for each to stop.
    pub async fn shutdown(self, timeout: Duration) {
        self.cancel.cancel();
        for handle in self.handles {
            if tokio::time::timeout(timeout, handle).await.is_err() {
                tracing::warn!("Background job did not stop in time");
            }
        }
        tracing::info!("Background jobs stopped");
    }
}
