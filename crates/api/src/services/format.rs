//! Response shapes for content lists and detail pages.

use std::collections::HashMap;

use answer_core::content::{quote_references, ContentKind};
use answer_core::permission::MemberAction;
use answer_core::status::ContentStatus;
use answer_core::text::{excerpt, url_title, DESCRIPTION_EXCERPT_LEN};
use answer_core::types::{DbId, Timestamp};
use answer_db::models::content::ContentRow;
use answer_db::models::tag::{ObjectTag, Tag};
use answer_db::models::user::UserBasicInfo;
use answer_db::repositories::{ContentRepo, TagRepo, UserRepo};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppResult;

/// Excerpt length on list items.
const LIST_EXCERPT_LEN: usize = 120;

#[derive(Debug, Clone, Serialize)]
pub struct TagBrief {
    pub id: DbId,
    pub slug_name: String,
    pub display_name: String,
    pub main_tag_id: Option<DbId>,
    pub recommend: bool,
    pub reserved: bool,
}

impl From<&ObjectTag> for TagBrief {
    fn from(t: &ObjectTag) -> Self {
        Self {
            id: t.id,
            slug_name: t.slug_name.clone(),
            display_name: t.display_name.clone(),
            main_tag_id: t.main_tag_id,
            recommend: t.recommend,
            reserved: t.reserved,
        }
    }
}

impl From<&Tag> for TagBrief {
    fn from(t: &Tag) -> Self {
        Self {
            id: t.id,
            slug_name: t.slug_name.clone(),
            display_name: t.display_name.clone(),
            main_tag_id: t.main_tag_id,
            recommend: t.recommend,
            reserved: t.reserved,
        }
    }
}

/// One item of a page.
#[derive(Debug, Clone, Serialize)]
pub struct ContentSummary {
    pub id: DbId,
    pub object_type: &'static str,
    pub title: String,
    pub url_title: String,
    pub excerpt: String,
    pub status: &'static str,
    pub pin: i16,
    pub show: i16,
    pub view_count: i32,
    pub vote_count: i32,
    pub answer_count: i32,
    pub collection_count: i32,
    pub hot_score: i32,
    pub tags: Vec<TagBrief>,
    pub author: Option<UserBasicInfo>,
    pub attributes: serde_json::Value,
    pub created_at: Timestamp,
    pub post_update_time: Timestamp,
}

impl ContentSummary {
    fn new(
        kind: ContentKind,
        row: &ContentRow,
        tags: Vec<TagBrief>,
        author: Option<UserBasicInfo>,
    ) -> Self {
        Self {
            id: row.id,
            object_type: kind.object_type(),
            title: row.title.clone(),
            url_title: url_title(&row.title),
            excerpt: excerpt(&row.parsed_text, LIST_EXCERPT_LEN),
            status: row.content_status().as_str(),
            pin: row.pin,
            show: row.show,
            view_count: row.view_count,
            vote_count: row.vote_count,
            answer_count: row.answer_count,
            collection_count: row.collection_count,
            hot_score: row.hot_score,
            tags,
            author,
            attributes: row.attributes.clone(),
            created_at: row.created_at,
            post_update_time: row.post_update_time,
        }
    }
}

/// Format a page of rows with one tag query and one user query.
pub async fn summaries(
    pool: &PgPool,
    kind: ContentKind,
    rows: &[ContentRow],
) -> AppResult<Vec<ContentSummary>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();
    let mut tags_by_object: HashMap<DbId, Vec<TagBrief>> = HashMap::new();
    for tag in TagRepo::tags_for_objects(pool, kind.object_type(), &ids).await? {
        tags_by_object
            .entry(tag.object_id)
            .or_default()
            .push(TagBrief::from(&tag));
    }
    let authors = authors_by_id(pool, rows.iter().map(|r| r.user_id)).await?;

    Ok(rows
        .iter()
        .map(|row| {
            ContentSummary::new(
                kind,
                row,
                tags_by_object.remove(&row.id).unwrap_or_default(),
                authors.get(&row.user_id).cloned(),
            )
        })
        .collect())
}

async fn authors_by_id(
    pool: &PgPool,
    ids: impl Iterator<Item = DbId>,
) -> AppResult<HashMap<DbId, UserBasicInfo>> {
    let mut ids: Vec<DbId> = ids.collect();
    ids.sort_unstable();
    ids.dedup();
    Ok(UserRepo::basic_info_by_ids(pool, &ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect())
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

/// A link to another item, e.g. the author of a quote.
#[derive(Debug, Clone, Serialize)]
pub struct ContentRef {
    pub id: DbId,
    pub title: String,
    pub url_title: String,
    pub status: &'static str,
}

impl From<&ContentRow> for ContentRef {
    fn from(row: &ContentRow) -> Self {
        Self {
            id: row.id,
            title: row.title.clone(),
            url_title: url_title(&row.title),
            status: row.content_status().as_str(),
        }
    }
}

/// Banner explaining why an item is not in its normal state.
#[derive(Debug, Clone, Serialize)]
pub struct OperationBanner {
    pub operation_type: &'static str,
    pub operation_description: String,
    pub operation_msg: String,
    pub operation_time: Timestamp,
}

impl OperationBanner {
    fn for_row(row: &ContentRow) -> Option<Self> {
        let (operation_type, description, msg) = match row.content_status() {
            ContentStatus::Deleted => ("deleted", "This post has been deleted.", String::new()),
            ContentStatus::Pending => (
                "pending",
                "This post is awaiting review and is only visible to you and moderators.",
                String::new(),
            ),
            ContentStatus::Closed => (
                "closed",
                "This post has been closed.",
                row.close_reason
                    .as_ref()
                    .and_then(|r| r.get("close_msg"))
                    .and_then(|m| m.as_str())
                    .unwrap_or_default()
                    .to_string(),
            ),
            ContentStatus::Available => return None,
        };
        Some(Self {
            operation_type,
            operation_description: description.to_string(),
            operation_msg: msg,
            operation_time: row.updated_at,
        })
    }
}

/// Full item as returned by `/{kind}/info`.
#[derive(Debug, Clone, Serialize)]
pub struct ContentDetail {
    #[serde(flatten)]
    pub summary: ContentSummary,
    pub original_text: String,
    pub parsed_text: String,
    pub content_format: i16,
    pub description: String,
    pub unique_view_count: i32,
    pub comment_count: i32,
    pub follow_count: i32,
    pub close_reason: Option<serde_json::Value>,
    pub last_edit_user: Option<UserBasicInfo>,
    pub member_actions: Vec<MemberAction>,
    pub operation: Option<OperationBanner>,
    pub collected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_author: Option<ContentRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_piece: Option<ContentRef>,
}

pub async fn detail(
    pool: &PgPool,
    kind: ContentKind,
    row: &ContentRow,
    member_actions: Vec<MemberAction>,
    collected: bool,
) -> AppResult<ContentDetail> {
    let tags: Vec<TagBrief> = TagRepo::object_tags(pool, kind.object_type(), row.id)
        .await?
        .iter()
        .map(TagBrief::from)
        .collect();
    let authors =
        authors_by_id(pool, std::iter::once(row.user_id).chain(row.last_edit_user_id)).await?;

    let (quote_author, quote_piece) = if kind == ContentKind::Quote {
        let refs = quote_references(&row.attributes);
        (
            load_ref(pool, ContentKind::QuoteAuthor, refs.quote_author_id).await?,
            load_ref(pool, ContentKind::QuotePiece, refs.quote_piece_id).await?,
        )
    } else {
        (None, None)
    };

    Ok(ContentDetail {
        summary: ContentSummary::new(kind, row, tags, authors.get(&row.user_id).cloned()),
        original_text: row.original_text.clone(),
        parsed_text: row.parsed_text.clone(),
        content_format: row.content_format,
        description: excerpt(&row.parsed_text, DESCRIPTION_EXCERPT_LEN),
        unique_view_count: row.unique_view_count,
        comment_count: row.comment_count,
        follow_count: row.follow_count,
        close_reason: row.close_reason.clone(),
        last_edit_user: row.last_edit_user_id.and_then(|id| authors.get(&id).cloned()),
        member_actions,
        operation: OperationBanner::for_row(row),
        collected,
        quote_author,
        quote_piece,
    })
}

/// Referenced items that were deleted since are left out.
async fn load_ref(
    pool: &PgPool,
    kind: ContentKind,
    id: Option<DbId>,
) -> AppResult<Option<ContentRef>> {
    let Some(id) = id else {
        return Ok(None);
    };
    Ok(ContentRepo::find_by_id(pool, kind, id)
        .await?
        .filter(|r| r.content_status() != ContentStatus::Deleted)
        .map(|r| ContentRef::from(&r)))
}
