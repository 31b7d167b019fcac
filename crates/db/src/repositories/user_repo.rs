//! Repository for the `users` table.

use answer_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, User, UserBasicInfo};

/// Column list for `users` queries.
const COLUMNS: &str = "id, username, display_name, avatar, role, rank, created_at, updated_at";

/// Provides lookups for users referenced by content.
pub struct UserRepo;

impl UserRepo {
    /// Insert a user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, display_name, role, rank) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.display_name)
            .bind(&input.role)
            .bind(input.rank)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Basic info for a batch of users, for page formatting.
    pub async fn basic_info_by_ids(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<UserBasicInfo>, sqlx::Error> {
        sqlx::query_as::<_, UserBasicInfo>(
            "SELECT id, username, display_name, avatar, rank FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }
}
