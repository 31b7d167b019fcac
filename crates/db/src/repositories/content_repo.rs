//! Repository for the five content tables.
//!
//! Every method takes a [`ContentKind`]; the table name is interpolated from
//! the kind's static configuration, so all kinds share one set of queries.

use answer_core::content::ContentKind;
use answer_core::listing::{ListPlan, PageWindow};
use answer_core::status::{ContentStatus, PinState, RevisionStatus, ShowState, TagRelStatus};
use answer_core::types::DbId;
use sqlx::PgPool;

use crate::models::content::{
    AdminContentFilter, ContentRow, CreateContent, SitemapRow, UpdateContent,
};
use crate::models::revision::CreateRevision;
use crate::repositories::{RevisionRepo, TagRepo};

/// Column list shared by every content table.
const COLUMNS: &str = "\
    id, user_id, last_edit_user_id, title, original_text, parsed_text, \
    content_format, status, pin, show, view_count, unique_view_count, \
    vote_count, comment_count, answer_count, collection_count, follow_count, \
    hot_score, revision_id, close_reason, attributes, post_update_time, \
    created_at, updated_at";

/// `WHERE` body for page queries. Binds:
/// `$1` statuses, `$2` tag ids, `$3` object type, `$4` user id,
/// `$5` require shown, `$6` in_days, `$7` created window days,
/// `$8` updated window days, `$9` unanswered only.
const LIST_FILTER: &str = "\
    c.status = ANY($1) \
    AND (cardinality($2::BIGINT[]) = 0 OR EXISTS ( \
        SELECT 1 FROM tag_rels tr \
        WHERE tr.object_type = $3 AND tr.object_id = c.id \
          AND tr.tag_id = ANY($2) AND tr.status = 1)) \
    AND ($4::BIGINT IS NULL OR c.user_id = $4) \
    AND (NOT $5::BOOL OR c.show = 1) \
    AND ($6::INT = 0 OR c.created_at > NOW() - make_interval(days => $6)) \
    AND ($7::INT IS NULL OR c.created_at > NOW() - make_interval(days => $7)) \
    AND ($8::INT IS NULL OR c.post_update_time > NOW() - make_interval(days => $8)) \
    AND (NOT $9::BOOL OR c.answer_count = 0)";

/// Provides CRUD, moderation and listing queries for content items.
pub struct ContentRepo;

impl ContentRepo {
    // -----------------------------------------------------------------------
    // Create / read
    // -----------------------------------------------------------------------

    /// Insert a new item together with its tag relations and its first
    /// (passed) revision, in one transaction.
    pub async fn create(
        pool: &PgPool,
        kind: ContentKind,
        input: &CreateContent,
        tag_ids: &[DbId],
        revision_log: &str,
    ) -> Result<ContentRow, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO {table} \
                (user_id, title, original_text, parsed_text, content_format, status, attributes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}",
            table = kind.table()
        );
        let row = sqlx::query_as::<_, ContentRow>(&query)
            .bind(input.user_id)
            .bind(&input.title)
            .bind(&input.original_text)
            .bind(&input.parsed_text)
            .bind(input.content_format)
            .bind(input.status.id())
            .bind(&input.attributes)
            .fetch_one(&mut *tx)
            .await?;

        TagRepo::replace_object_tags_tx(
            &mut tx,
            kind.object_type(),
            row.id,
            tag_ids,
            TagRelStatus::Available,
        )
        .await?;

        let revision = RevisionRepo::create_tx(
            &mut tx,
            &CreateRevision {
                object_type: kind.object_type(),
                object_id: row.id,
                user_id: input.user_id,
                title: input.title.clone(),
                content: revision_snapshot(&row, tag_ids),
                status: RevisionStatus::Passed,
                log: revision_log.to_string(),
            },
        )
        .await?;

        let query = format!(
            "UPDATE {table} SET revision_id = $2 WHERE id = $1 RETURNING {COLUMNS}",
            table = kind.table()
        );
        let row = sqlx::query_as::<_, ContentRow>(&query)
            .bind(row.id)
            .bind(revision.id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row)
    }

    /// Find an item by ID, in any status.
    pub async fn find_by_id(
        pool: &PgPool,
        kind: ContentKind,
        id: DbId,
    ) -> Result<Option<ContentRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {} WHERE id = $1", kind.table());
        sqlx::query_as::<_, ContentRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch several items by ID, preserving no particular order.
    pub async fn find_by_ids(
        pool: &PgPool,
        kind: ContentKind,
        ids: &[DbId],
    ) -> Result<Vec<ContentRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {} WHERE id = ANY($1)", kind.table());
        sqlx::query_as::<_, ContentRow>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Updates
    // -----------------------------------------------------------------------

    /// Apply an edit and replace the item's tag relations in one transaction.
    ///
    /// Returns `None` if no item with the given ID exists.
    pub async fn apply_update(
        pool: &PgPool,
        kind: ContentKind,
        id: DbId,
        input: &UpdateContent,
        tag_ids: &[DbId],
    ) -> Result<Option<ContentRow>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE {table} SET \
                title = $2, original_text = $3, parsed_text = $4, content_format = $5, \
                attributes = $6, last_edit_user_id = $7, \
                revision_id = COALESCE($8, revision_id), \
                post_update_time = NOW(), updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}",
            table = kind.table()
        );
        let row = sqlx::query_as::<_, ContentRow>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.original_text)
            .bind(&input.parsed_text)
            .bind(input.content_format)
            .bind(&input.attributes)
            .bind(input.last_edit_user_id)
            .bind(input.revision_id)
            .fetch_optional(&mut *tx)
            .await?;

        // A hidden item keeps its relations hidden across edits.
        if let Some(row) = &row {
            let status = TagRelStatus::live_for(row.show_state());
            TagRepo::replace_object_tags_tx(&mut tx, kind.object_type(), id, tag_ids, status)
                .await?;
        }

        tx.commit().await?;
        Ok(row)
    }

    /// Set the lifecycle status, moving the item's tag relations along when
    /// `tag_rels` is given.
    ///
    /// `touch` also bumps `updated_at`; deletion leaves it alone so the hot
    /// score of a recovered item is unaffected.
    pub async fn set_status(
        pool: &PgPool,
        kind: ContentKind,
        id: DbId,
        status: ContentStatus,
        touch: bool,
        tag_rels: Option<TagRelStatus>,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE {} SET status = $2, \
                updated_at = CASE WHEN $3 THEN NOW() ELSE updated_at END \
             WHERE id = $1",
            kind.table()
        );
        let result = sqlx::query(&query)
            .bind(id)
            .bind(status.id())
            .bind(touch)
            .execute(&mut *tx)
            .await?;

        if let Some(rel_status) = tag_rels {
            TagRepo::set_object_rel_status_tx(&mut tx, kind.object_type(), id, rel_status)
                .await?;
        }

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Close an item and record why.
    pub async fn close(
        pool: &PgPool,
        kind: ContentKind,
        id: DbId,
        reason: &serde_json::Value,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE {} SET status = $2, close_reason = $3, updated_at = NOW() WHERE id = $1",
            kind.table()
        );
        let result = sqlx::query(&query)
            .bind(id)
            .bind(ContentStatus::Closed.id())
            .bind(reason)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Write pin/show state and move the item's tag relations in one
    /// transaction.
    pub async fn set_display(
        pool: &PgPool,
        kind: ContentKind,
        id: DbId,
        pin: PinState,
        show: ShowState,
        tag_rels: Option<TagRelStatus>,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE {} SET pin = $2, show = $3 WHERE id = $1",
            kind.table()
        );
        let result = sqlx::query(&query)
            .bind(id)
            .bind(pin.id())
            .bind(show.id())
            .execute(&mut *tx)
            .await?;

        if let Some(status) = tag_rels {
            TagRepo::set_object_rel_status_tx(&mut tx, kind.object_type(), id, status).await?;
        }

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Increment the view counter. Does not touch `updated_at`.
    pub async fn increment_view(
        pool: &PgPool,
        kind: ContentKind,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE {} SET view_count = view_count + 1 WHERE id = $1",
            kind.table()
        );
        let result = sqlx::query(&query).bind(id).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Persist a recomputed hot score. Does not touch `updated_at`.
    pub async fn set_hot_score(
        pool: &PgPool,
        kind: ContentKind,
        id: DbId,
        hot_score: i32,
    ) -> Result<bool, sqlx::Error> {
        let query = format!("UPDATE {} SET hot_score = $2 WHERE id = $1", kind.table());
        let result = sqlx::query(&query)
            .bind(id)
            .bind(hot_score)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Recount `collection_count` from the `collections` table.
    pub async fn refresh_collection_count(
        pool: &PgPool,
        kind: ContentKind,
        id: DbId,
    ) -> Result<i32, sqlx::Error> {
        let query = format!(
            "UPDATE {} SET collection_count = ( \
                 SELECT COUNT(*) FROM collections \
                 WHERE object_type = $2 AND object_id = $1) \
             WHERE id = $1 \
             RETURNING collection_count",
            kind.table()
        );
        sqlx::query_scalar::<_, i32>(&query)
            .bind(id)
            .bind(kind.object_type())
            .fetch_one(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Listing
    // -----------------------------------------------------------------------

    /// One page of items matching `plan`, plus the total match count.
    pub async fn page(
        pool: &PgPool,
        kind: ContentKind,
        plan: &ListPlan,
    ) -> Result<(Vec<ContentRow>, i64), sqlx::Error> {
        let statuses = ContentStatus::listed_ids(plan.show_pending);
        let in_days = i32::try_from(plan.in_days).unwrap_or(i32::MAX);
        let created_window = plan.created_window_days.map(|d| d as i32);
        let updated_window = plan.updated_window_days.map(|d| d as i32);

        let count_query = format!(
            "SELECT COUNT(*) FROM {table} c WHERE {LIST_FILTER}",
            table = kind.table()
        );
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(&statuses)
            .bind(&plan.tag_ids)
            .bind(kind.object_type())
            .bind(plan.user_id)
            .bind(plan.requires_shown())
            .bind(in_days)
            .bind(created_window)
            .bind(updated_window)
            .bind(plan.unanswered_only)
            .fetch_one(pool)
            .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM {table} c WHERE {LIST_FILTER} \
             ORDER BY {order} \
             LIMIT $10 OFFSET $11",
            table = kind.table(),
            order = plan.order.order_by(),
        );
        let rows = sqlx::query_as::<_, ContentRow>(&query)
            .bind(&statuses)
            .bind(&plan.tag_ids)
            .bind(kind.object_type())
            .bind(plan.user_id)
            .bind(plan.requires_shown())
            .bind(in_days)
            .bind(created_window)
            .bind(updated_window)
            .bind(plan.unanswered_only)
            .bind(plan.window.page_size)
            .bind(plan.window.offset())
            .fetch_all(pool)
            .await?;

        Ok((rows, total))
    }

    /// Admin page: one status, optional ID or title search, newest first.
    pub async fn admin_page(
        pool: &PgPool,
        kind: ContentKind,
        filter: &AdminContentFilter,
        window: PageWindow,
    ) -> Result<(Vec<ContentRow>, i64), sqlx::Error> {
        let pattern = filter
            .title
            .as_deref()
            .map(|t| format!("%{}%", escape_like(t)));
        let where_clause = "status = $1 \
             AND ($2::BIGINT IS NULL OR id = $2) \
             AND ($3::TEXT IS NULL OR title ILIKE $3)";

        let count_query = format!(
            "SELECT COUNT(*) FROM {} WHERE {where_clause}",
            kind.table()
        );
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(filter.status.id())
            .bind(filter.id)
            .bind(pattern.as_deref())
            .fetch_one(pool)
            .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM {} WHERE {where_clause} \
             ORDER BY created_at DESC \
             LIMIT $4 OFFSET $5",
            kind.table()
        );
        let rows = sqlx::query_as::<_, ContentRow>(&query)
            .bind(filter.status.id())
            .bind(filter.id)
            .bind(pattern.as_deref())
            .bind(window.page_size)
            .bind(window.offset())
            .fetch_all(pool)
            .await?;

        Ok((rows, total))
    }

    /// Non-deleted items whose title contains `title`, newest first.
    pub async fn similar(
        pool: &PgPool,
        kind: ContentKind,
        title: &str,
        limit: i64,
    ) -> Result<Vec<ContentRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {} \
             WHERE status <> $1 AND show = 1 AND title ILIKE $2 \
             ORDER BY created_at DESC \
             LIMIT $3",
            kind.table()
        );
        sqlx::query_as::<_, ContentRow>(&query)
            .bind(ContentStatus::Deleted.id())
            .bind(format!("%{}%", escape_like(title)))
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Items eligible for hot-score refresh: listed, shown, created within
    /// `in_days`, newest first.
    pub async fn hot_candidates(
        pool: &PgPool,
        kind: ContentKind,
        in_days: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ContentRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {} \
             WHERE status = ANY($1) AND show = 1 \
               AND created_at > NOW() - make_interval(days => $2) \
             ORDER BY pin DESC, created_at DESC \
             LIMIT $3 OFFSET $4",
            kind.table()
        );
        sqlx::query_as::<_, ContentRow>(&query)
            .bind(ContentStatus::listed_ids(false))
            .bind(i32::try_from(in_days).unwrap_or(i32::MAX))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Sitemap
    // -----------------------------------------------------------------------

    /// Count shown available/closed items.
    pub async fn count_for_sitemap(pool: &PgPool, kind: ContentKind) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM {} WHERE show = 1 AND status = ANY($1)",
            kind.table()
        );
        sqlx::query_scalar(&query)
            .bind(ContentStatus::listed_ids(false))
            .fetch_one(pool)
            .await
    }

    /// One sitemap page of shown available/closed items, oldest first.
    pub async fn sitemap_rows(
        pool: &PgPool,
        kind: ContentKind,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SitemapRow>, sqlx::Error> {
        let query = format!(
            "SELECT id, title, post_update_time, created_at FROM {} \
             WHERE show = 1 AND status = ANY($1) \
             ORDER BY created_at ASC, id ASC \
             LIMIT $2 OFFSET $3",
            kind.table()
        );
        sqlx::query_as::<_, SitemapRow>(&query)
            .bind(ContentStatus::listed_ids(false))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Revision snapshot of an item: body, attributes and tag IDs.
pub fn revision_snapshot(row: &ContentRow, tag_ids: &[DbId]) -> serde_json::Value {
    serde_json::json!({
        "title": row.title,
        "original_text": row.original_text,
        "content_format": row.content_format,
        "attributes": row.attributes,
        "tag_ids": tag_ids,
    })
}

/// Escape `%`, `_` and `\` for use inside an `ILIKE` pattern.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
