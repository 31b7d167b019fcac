use answer_core::status::RevisionStatus;
use answer_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `revisions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Revision {
    pub id: DbId,
    pub object_type: String,
    pub object_id: DbId,
    pub user_id: DbId,
    pub title: String,
    /// Snapshot of the item as submitted: text, tags and attributes.
    pub content: serde_json::Value,
    pub status: i16,
    pub log: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert DTO for `revisions`.
#[derive(Debug, Clone)]
pub struct CreateRevision {
    pub object_type: &'static str,
    pub object_id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub content: serde_json::Value,
    pub status: RevisionStatus,
    pub log: String,
}
