use answer_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `collections` table: one bookmark of one item by one user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Collection {
    pub id: DbId,
    pub user_id: DbId,
    pub object_type: String,
    pub object_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
