//! Repository for the `sitemap_pages` table.

use sqlx::PgPool;

use crate::models::sitemap::SitemapPage;

/// Column list for `sitemap_pages` queries.
const COLUMNS: &str = "id, kind, page, entries, created_at, updated_at";

/// Provides storage for pre-built sitemap pages.
pub struct SitemapRepo;

impl SitemapRepo {
    /// Insert or replace one page of a kind's sitemap.
    pub async fn upsert(
        pool: &PgPool,
        kind: &str,
        page: i32,
        entries: &serde_json::Value,
    ) -> Result<SitemapPage, sqlx::Error> {
        let query = format!(
            "INSERT INTO sitemap_pages (kind, page, entries) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (kind, page) \
             DO UPDATE SET entries = EXCLUDED.entries, updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SitemapPage>(&query)
            .bind(kind)
            .bind(page)
            .bind(entries)
            .fetch_one(pool)
            .await
    }

    /// Drop pages beyond `last_page` left over from a larger previous build.
    pub async fn delete_after(pool: &PgPool, kind: &str, last_page: i32) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sitemap_pages WHERE kind = $1 AND page > $2")
            .bind(kind)
            .bind(last_page)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn find(
        pool: &PgPool,
        kind: &str,
        page: i32,
    ) -> Result<Option<SitemapPage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sitemap_pages WHERE kind = $1 AND page = $2");
        sqlx::query_as::<_, SitemapPage>(&query)
            .bind(kind)
            .bind(page)
            .fetch_optional(pool)
            .await
    }
}
