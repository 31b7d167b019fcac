//! Repository for the `collections` table (user bookmarks).

use answer_core::listing::PageWindow;
use answer_core::types::DbId;
use sqlx::PgPool;

/// Provides bookmark toggling and per-user collection listing.
pub struct CollectionRepo;

impl CollectionRepo {
    /// Add a bookmark. Returns `false` if it already existed.
    pub async fn add(
        pool: &PgPool,
        user_id: DbId,
        object_type: &str,
        object_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO collections (user_id, object_type, object_id) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, object_type, object_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(object_type)
        .bind(object_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a bookmark. Returns `true` if one was removed.
    pub async fn remove(
        pool: &PgPool,
        user_id: DbId,
        object_type: &str,
        object_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM collections \
             WHERE user_id = $1 AND object_type = $2 AND object_id = $3",
        )
        .bind(user_id)
        .bind(object_type)
        .bind(object_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn exists(
        pool: &PgPool,
        user_id: DbId,
        object_type: &str,
        object_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS ( \
                 SELECT 1 FROM collections \
                 WHERE user_id = $1 AND object_type = $2 AND object_id = $3)",
        )
        .bind(user_id)
        .bind(object_type)
        .bind(object_id)
        .fetch_one(pool)
        .await
    }

    /// One page of a user's bookmarked object IDs (newest bookmark first),
    /// plus the total count.
    pub async fn page_object_ids(
        pool: &PgPool,
        user_id: DbId,
        object_type: &str,
        window: PageWindow,
    ) -> Result<(Vec<DbId>, i64), sqlx::Error> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM collections WHERE user_id = $1 AND object_type = $2",
        )
        .bind(user_id)
        .bind(object_type)
        .fetch_one(pool)
        .await?;

        let ids = sqlx::query_scalar::<_, DbId>(
            "SELECT object_id FROM collections \
             WHERE user_id = $1 AND object_type = $2 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $3 OFFSET $4",
        )
        .bind(user_id)
        .bind(object_type)
        .bind(window.page_size)
        .bind(window.offset())
        .fetch_all(pool)
        .await?;

        Ok((ids, total))
    }
}
