//! Hot-score refresh.
//!
//! Walks every kind's recent, listed, shown items in pages of
//! [`HOT_SCORE_BATCH_SIZE`] and stores a freshly computed score for each.
//! A failed write is logged and skipped; a failed page read ends the pass
//! for that kind.

use std::time::Duration;

use answer_core::content::ContentKind;
use answer_core::hotness::{hot_score, HotInputs, HOT_IN_DAYS, HOT_SCORE_BATCH_SIZE};
use answer_db::repositories::ContentRepo;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// Default interval between passes.
pub const DEFAULT_INTERVAL_SECS: u64 = 1800;

/// Outcome of one pass over a kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshStats {
    pub scanned: u64,
    pub updated: u64,
    pub failed: u64,
}

/// Recompute the hot score of every eligible item of `kind`.
pub async fn refresh_kind(
    pool: &PgPool,
    kind: ContentKind,
    now: DateTime<Utc>,
) -> Result<RefreshStats, sqlx::Error> {
    let mut stats = RefreshStats::default();
    let mut offset = 0;

    loop {
        let rows =
            ContentRepo::hot_candidates(pool, kind, HOT_IN_DAYS, HOT_SCORE_BATCH_SIZE, offset)
                .await?;
        let fetched = rows.len() as i64;

        for row in rows {
            stats.scanned += 1;
            let inputs = HotInputs::from_timestamps(
                i64::from(row.view_count),
                i64::from(row.comment_count),
                i64::from(row.vote_count),
                row.created_at,
                row.updated_at,
                now,
            );
            let score = hot_score(&inputs);
            match ContentRepo::set_hot_score(pool, kind, row.id, score).await {
                Ok(_) => stats.updated += 1,
                Err(e) => {
                    stats.failed += 1;
                    tracing::error!(
                        error = %e,
                        kind = %kind,
                        object_id = row.id,
                        "Hot score: failed to store score"
                    );
                }
            }
        }

        if fetched < HOT_SCORE_BATCH_SIZE {
            break;
        }
        offset += HOT_SCORE_BATCH_SIZE;
    }

    Ok(stats)
}

/// One pass over every kind. Errors are logged per kind.
pub async fn refresh_all(pool: &PgPool) {
    let now = Utc::now();
    for kind in ContentKind::ALL {
        match refresh_kind(pool, kind, now).await {
            Ok(stats) => tracing::info!(
                kind = %kind,
                scanned = stats.scanned,
                updated = stats.updated,
                failed = stats.failed,
                "Hot score: pass complete"
            ),
            Err(e) => tracing::error!(error = %e, kind = %kind, "Hot score: pass failed"),
        }
    }
}

/// Run the hot-score loop until `cancel` is triggered.
pub async fn run(pool: PgPool, every: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = every.as_secs(), "Hot score job started");

    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Hot score job stopping");
                break;
            }
            _ = interval.tick() => {
                refresh_all(&pool).await;
            }
        }
    }
}
