use answer_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `activities` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Activity {
    pub id: DbId,
    pub activity_type: String,
    pub object_type: String,
    pub object_id: DbId,
    pub user_id: Option<DbId>,
    pub trigger_user_id: Option<DbId>,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert DTO for `activities`.
#[derive(Debug, Clone)]
pub struct CreateActivity {
    pub activity_type: String,
    pub object_type: String,
    pub object_id: DbId,
    pub user_id: Option<DbId>,
    pub trigger_user_id: Option<DbId>,
    pub payload: serde_json::Value,
}
