//! Sitemap build.
//!
//! For each kind, counts the shown available/closed items and stores them in
//! pages of at most [`SITEMAP_MAX_SIZE`] entries, oldest first. Pages left
//! over from an earlier, larger build are removed.

use std::time::Duration;

use answer_core::content::ContentKind;
use answer_core::sitemap::{page_count, SitemapEntry, SITEMAP_MAX_SIZE};
use answer_db::repositories::{ContentRepo, SitemapRepo};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// Default interval between builds.
pub const DEFAULT_INTERVAL_SECS: u64 = 3600;

/// Rebuild the stored sitemap of `kind`. Returns the number of pages written.
pub async fn build_kind(pool: &PgPool, kind: ContentKind) -> Result<i64, sqlx::Error> {
    let count = ContentRepo::count_for_sitemap(pool, kind).await?;
    let pages = page_count(count);

    for page in 1..=pages {
        let rows =
            ContentRepo::sitemap_rows(pool, kind, SITEMAP_MAX_SIZE, (page - 1) * SITEMAP_MAX_SIZE)
                .await?;
        let entries: Vec<SitemapEntry> = rows
            .iter()
            .map(|r| SitemapEntry::new(r.id, &r.title, r.created_at, Some(r.post_update_time)))
            .collect();
        let entries = serde_json::to_value(&entries)
            .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
        SitemapRepo::upsert(pool, kind.object_type(), page as i32, &entries).await?;
    }

    let stale = SitemapRepo::delete_after(pool, kind.object_type(), pages as i32).await?;
    tracing::debug!(kind = %kind, count, pages, stale, "Sitemap: kind rebuilt");
    Ok(pages)
}

/// Rebuild every kind. Errors are logged per kind.
pub async fn build_all(pool: &PgPool) {
    for kind in ContentKind::ALL {
        match build_kind(pool, kind).await {
            Ok(pages) => tracing::info!(kind = %kind, pages, "Sitemap: build complete"),
            Err(e) => tracing::error!(error = %e, kind = %kind, "Sitemap: build failed"),
        }
    }
}

/// Run the sitemap loop until `cancel` is triggered.
pub async fn run(pool: PgPool, every: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = every.as_secs(), "Sitemap job started");

    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Sitemap job stopping");
                break;
            }
            _ = interval.tick() => {
                build_all(&pool).await;
            }
        }
    }
}
