//! Shared row model for every content table.

use answer_core::status::{ContentStatus, PinState, ShowState};
use answer_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from any of the content tables (`questions`, `articles`, `quotes`,
/// `quote_authors`, `quote_pieces`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContentRow {
    pub id: DbId,
    pub user_id: DbId,
    pub last_edit_user_id: Option<DbId>,
    pub title: String,
    pub original_text: String,
    pub parsed_text: String,
    pub content_format: i16,
    pub status: i16,
    pub pin: i16,
    pub show: i16,
    pub view_count: i32,
    pub unique_view_count: i32,
    pub vote_count: i32,
    pub comment_count: i32,
    pub answer_count: i32,
    pub collection_count: i32,
    pub follow_count: i32,
    pub hot_score: i32,
    pub revision_id: Option<DbId>,
    pub close_reason: Option<serde_json::Value>,
    pub attributes: serde_json::Value,
    pub post_update_time: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ContentRow {
    pub fn content_status(&self) -> ContentStatus {
        ContentStatus::from_id(self.status).unwrap_or(ContentStatus::Available)
    }

    pub fn pin_state(&self) -> PinState {
        PinState::from_id(self.pin).unwrap_or(PinState::Unpinned)
    }

    pub fn show_state(&self) -> ShowState {
        ShowState::from_id(self.show).unwrap_or(ShowState::Shown)
    }
}

/// Insert DTO for a new content item.
#[derive(Debug, Clone)]
pub struct CreateContent {
    pub user_id: DbId,
    pub title: String,
    pub original_text: String,
    pub parsed_text: String,
    pub content_format: i16,
    pub status: ContentStatus,
    pub attributes: serde_json::Value,
}

/// Applied edit of title, body and attributes.
#[derive(Debug, Clone)]
pub struct UpdateContent {
    pub title: String,
    pub original_text: String,
    pub parsed_text: String,
    pub content_format: i16,
    pub attributes: serde_json::Value,
    pub last_edit_user_id: DbId,
    pub revision_id: Option<DbId>,
}

/// Columns needed to build one sitemap entry.
#[derive(Debug, Clone, FromRow)]
pub struct SitemapRow {
    pub id: DbId,
    pub title: String,
    pub post_update_time: Timestamp,
    pub created_at: Timestamp,
}

/// Admin page filter.
#[derive(Debug, Clone)]
pub struct AdminContentFilter {
    pub status: ContentStatus,
    /// Exact ID match, from a `{kind}:<id>` query.
    pub id: Option<DbId>,
    /// Case-insensitive title substring.
    pub title: Option<String>,
}
