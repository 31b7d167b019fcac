//! Sitemap paging and entry formatting.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::text::url_title;
use crate::types::DbId;

/// Maximum number of entries in one sitemap page.
pub const SITEMAP_MAX_SIZE: i64 = 50_000;

/// Number of sitemap pages needed for `count` items. An empty kind still
/// gets one (empty) page.
pub fn page_count(count: i64) -> i64 {
    if count <= SITEMAP_MAX_SIZE {
        1
    } else {
        (count + SITEMAP_MAX_SIZE - 1) / SITEMAP_MAX_SIZE
    }
}

/// One `<url>` of a sitemap page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapEntry {
    pub id: DbId,
    /// URL slug of the title.
    pub title: String,
    /// RFC 3339 last-modified time.
    pub time: String,
}

impl SitemapEntry {
    /// Build an entry. `post_update_time` wins over `created_at` when set.
    pub fn new(
        id: DbId,
        title: &str,
        created_at: DateTime<Utc>,
        post_update_time: Option<DateTime<Utc>>,
    ) -> Self {
        let time = post_update_time.unwrap_or(created_at);
        Self {
            id,
            title: url_title(title),
            time: time.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}
