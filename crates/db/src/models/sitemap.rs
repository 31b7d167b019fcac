use answer_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `sitemap_pages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SitemapPage {
    pub id: DbId,
    pub kind: String,
    pub page: i32,
    pub entries: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
