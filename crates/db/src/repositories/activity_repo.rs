//! Repository for the `activities` table.

use answer_core::types::DbId;
use sqlx::PgPool;

use crate::models::activity::{Activity, CreateActivity};

/// Column list for `activities` queries.
const COLUMNS: &str = "\
    id, activity_type, object_type, object_id, user_id, trigger_user_id, \
    payload, created_at, updated_at";

/// Provides activity log persistence.
pub struct ActivityRepo;

impl ActivityRepo {
    pub async fn create(pool: &PgPool, input: &CreateActivity) -> Result<Activity, sqlx::Error> {
        let query = format!(
            "INSERT INTO activities \
                (activity_type, object_type, object_id, user_id, trigger_user_id, payload) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Activity>(&query)
            .bind(&input.activity_type)
            .bind(&input.object_type)
            .bind(input.object_id)
            .bind(input.user_id)
            .bind(input.trigger_user_id)
            .bind(&input.payload)
            .fetch_one(pool)
            .await
    }

    /// Activity history of one object, oldest first.
    pub async fn list_for_object(
        pool: &PgPool,
        object_type: &str,
        object_id: DbId,
    ) -> Result<Vec<Activity>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activities \
             WHERE object_type = $1 AND object_id = $2 \
             ORDER BY id"
        );
        sqlx::query_as::<_, Activity>(&query)
            .bind(object_type)
            .bind(object_id)
            .fetch_all(pool)
            .await
    }
}
