//! Tag and tag-relation models.

use answer_core::types::{DbId, Timestamp};
use answer_core::validation::TagLike;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `tags` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub slug_name: String,
    pub display_name: String,
    pub main_tag_id: Option<DbId>,
    pub recommend: bool,
    pub reserved: bool,
    pub content_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TagLike for Tag {
    fn slug_name(&self) -> &str {
        &self.slug_name
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn is_reserved(&self) -> bool {
        self.reserved
    }
}

/// A tag attached to a specific object, as returned by batch lookups for
/// page formatting.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ObjectTag {
    #[serde(skip)]
    pub object_id: DbId,
    pub id: DbId,
    pub slug_name: String,
    pub display_name: String,
    pub main_tag_id: Option<DbId>,
    pub recommend: bool,
    pub reserved: bool,
}
