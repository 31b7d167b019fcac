//! Repository for the `tags` and `tag_rels` tables.
//!
//! Provides get-or-create by slug, synonym expansion, object-tag
//! replacement, relation status changes that follow the owning item, and
//! `content_count` maintenance.

use answer_core::status::TagRelStatus;
use answer_core::types::DbId;
use sqlx::PgPool;

use crate::models::tag::{ObjectTag, Tag};

/// Column list for `tags` queries.
const TAG_COLUMNS: &str = "\
    id, slug_name, display_name, main_tag_id, recommend, reserved, \
    content_count, created_at, updated_at";

/// Provides tag lookups and object-tag associations.
pub struct TagRepo;

impl TagRepo {
    // -----------------------------------------------------------------------
    // Tags
    // -----------------------------------------------------------------------

    /// Create a tag or return the existing one with the same slug.
    pub async fn get_or_create(
        pool: &PgPool,
        slug_name: &str,
        display_name: &str,
    ) -> Result<Tag, sqlx::Error> {
        let query = format!(
            "INSERT INTO tags (slug_name, display_name) \
             VALUES ($1, $2) \
             ON CONFLICT (slug_name) DO UPDATE SET slug_name = EXCLUDED.slug_name \
             RETURNING {TAG_COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(slug_name)
            .bind(display_name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {TAG_COLUMNS} FROM tags WHERE id = $1");
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug_name: &str) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {TAG_COLUMNS} FROM tags WHERE slug_name = $1");
        sqlx::query_as::<_, Tag>(&query)
            .bind(slug_name)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slugs(pool: &PgPool, slugs: &[String]) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!("SELECT {TAG_COLUMNS} FROM tags WHERE slug_name = ANY($1)");
        sqlx::query_as::<_, Tag>(&query)
            .bind(slugs)
            .fetch_all(pool)
            .await
    }

    /// Mark a tag as reserved (or not).
    pub async fn set_reserved(pool: &PgPool, id: DbId, reserved: bool) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE tags SET reserved = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(reserved)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Point a synonym at its main tag.
    pub async fn set_main_tag(
        pool: &PgPool,
        id: DbId,
        main_tag_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE tags SET main_tag_id = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(main_tag_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// IDs of every synonym whose main tag is `main_tag_id`.
    pub async fn synonym_ids(pool: &PgPool, main_tag_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT id FROM tags WHERE main_tag_id = $1 ORDER BY id")
            .bind(main_tag_id)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Object tags
    // -----------------------------------------------------------------------

    /// Tags attached to one object through non-deleted relations.
    pub async fn object_tags(
        pool: &PgPool,
        object_type: &str,
        object_id: DbId,
    ) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!(
            "SELECT {cols} FROM tag_rels tr \
             JOIN tags t ON t.id = tr.tag_id \
             WHERE tr.object_type = $1 AND tr.object_id = $2 AND tr.status <> $3 \
             ORDER BY tr.id",
            cols = prefixed_columns("t")
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(object_type)
            .bind(object_id)
            .bind(TagRelStatus::Deleted.id())
            .fetch_all(pool)
            .await
    }

    /// Tags of many objects at once, for page formatting.
    pub async fn tags_for_objects(
        pool: &PgPool,
        object_type: &str,
        object_ids: &[DbId],
    ) -> Result<Vec<ObjectTag>, sqlx::Error> {
        sqlx::query_as::<_, ObjectTag>(
            "SELECT tr.object_id, t.id, t.slug_name, t.display_name, t.main_tag_id, \
                    t.recommend, t.reserved \
             FROM tag_rels tr \
             JOIN tags t ON t.id = tr.tag_id \
             WHERE tr.object_type = $1 AND tr.object_id = ANY($2) AND tr.status <> $3 \
             ORDER BY tr.object_id, tr.id",
        )
        .bind(object_type)
        .bind(object_ids)
        .bind(TagRelStatus::Deleted.id())
        .fetch_all(pool)
        .await
    }

    /// Make `tag_ids` the exact tag set of an object, every relation in
    /// `status`, and refresh the counts of every tag involved.
    pub async fn replace_object_tags_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        object_type: &str,
        object_id: DbId,
        tag_ids: &[DbId],
        status: TagRelStatus,
    ) -> Result<(), sqlx::Error> {
        let removed: Vec<DbId> = sqlx::query_scalar(
            "DELETE FROM tag_rels \
             WHERE object_type = $1 AND object_id = $2 AND tag_id <> ALL($3) \
             RETURNING tag_id",
        )
        .bind(object_type)
        .bind(object_id)
        .bind(tag_ids)
        .fetch_all(&mut **tx)
        .await?;

        for &tag_id in tag_ids {
            sqlx::query(
                "INSERT INTO tag_rels (object_type, object_id, tag_id, status) \
                 VALUES ($1, $2, $3, $4) \
                 ON CONFLICT (object_type, object_id, tag_id) \
                 DO UPDATE SET status = EXCLUDED.status, updated_at = NOW()",
            )
            .bind(object_type)
            .bind(object_id)
            .bind(tag_id)
            .bind(status.id())
            .execute(&mut **tx)
            .await?;
        }

        let mut touched = removed;
        touched.extend_from_slice(tag_ids);
        Self::refresh_counts_tx(tx, &touched).await
    }

    /// Move every relation of an object to `status` and refresh the counts
    /// of the affected tags.
    pub async fn set_object_rel_status_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        object_type: &str,
        object_id: DbId,
        status: TagRelStatus,
    ) -> Result<(), sqlx::Error> {
        let touched: Vec<DbId> = sqlx::query_scalar(
            "UPDATE tag_rels SET status = $3, updated_at = NOW() \
             WHERE object_type = $1 AND object_id = $2 \
             RETURNING tag_id",
        )
        .bind(object_type)
        .bind(object_id)
        .bind(status.id())
        .fetch_all(&mut **tx)
        .await?;

        Self::refresh_counts_tx(tx, &touched).await
    }

    /// Recount `content_count` (available relations only) for the given tags.
    pub async fn refresh_counts_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        tag_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        if tag_ids.is_empty() {
            return Ok(());
        }
        sqlx::query(
            "UPDATE tags t SET content_count = ( \
                 SELECT COUNT(*) FROM tag_rels tr \
                 WHERE tr.tag_id = t.id AND tr.status = $2), \
                 updated_at = NOW() \
             WHERE t.id = ANY($1)",
        )
        .bind(tag_ids)
        .bind(TagRelStatus::Available.id())
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn prefixed_columns(alias: &str) -> String {
    TAG_COLUMNS
        .split(',')
        .map(|c| format!("{alias}.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}
