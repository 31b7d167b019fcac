//! Repository for the `action_records` table: per-user action counters
//! behind the captcha free quota.

use answer_core::types::DbId;
use sqlx::PgPool;

/// Provides action recording and recent-count lookups.
pub struct ActionRecordRepo;

impl ActionRecordRepo {
    pub async fn record(pool: &PgPool, user_id: DbId, action: &str) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO action_records (user_id, action) VALUES ($1, $2)")
            .bind(user_id)
            .bind(action)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// How many times `user_id` performed `action` in the last `window_secs`.
    pub async fn count_recent(
        pool: &PgPool,
        user_id: DbId,
        action: &str,
        window_secs: i64,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM action_records \
             WHERE user_id = $1 AND action = $2 \
               AND created_at > NOW() - make_interval(secs => $3)",
        )
        .bind(user_id)
        .bind(action)
        .bind(window_secs as f64)
        .fetch_one(pool)
        .await
    }
}
