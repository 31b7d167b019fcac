use answer_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub display_name: String,
    pub avatar: Option<String>,
    pub role: String,
    pub rank: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Public author info embedded in content responses.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserBasicInfo {
    pub id: DbId,
    pub username: String,
    pub display_name: String,
    pub avatar: Option<String>,
    pub rank: i32,
}

/// Insert DTO for `users`.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub display_name: String,
    pub role: String,
    pub rank: i32,
}
