//! Repository for the `revisions` table.

use answer_core::status::RevisionStatus;
use answer_core::types::DbId;
use sqlx::PgPool;

use crate::models::revision::{CreateRevision, Revision};

/// Column list for `revisions` queries.
const COLUMNS: &str = "\
    id, object_type, object_id, user_id, title, content, status, log, \
    created_at, updated_at";

/// Provides revision storage for content edits.
pub struct RevisionRepo;

impl RevisionRepo {
    pub async fn create(pool: &PgPool, input: &CreateRevision) -> Result<Revision, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let revision = Self::create_tx(&mut tx, input).await?;
        tx.commit().await?;
        Ok(revision)
    }

    pub async fn create_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        input: &CreateRevision,
    ) -> Result<Revision, sqlx::Error> {
        let query = format!(
            "INSERT INTO revisions (object_type, object_id, user_id, title, content, status, log) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Revision>(&query)
            .bind(input.object_type)
            .bind(input.object_id)
            .bind(input.user_id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.status.id())
            .bind(&input.log)
            .fetch_one(&mut **tx)
            .await
    }

    /// Whether the object has an edit waiting for review.
    pub async fn has_unreviewed(
        pool: &PgPool,
        object_type: &str,
        object_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS ( \
                 SELECT 1 FROM revisions \
                 WHERE object_type = $1 AND object_id = $2 AND status = $3)",
        )
        .bind(object_type)
        .bind(object_id)
        .bind(RevisionStatus::Unreviewed.id())
        .fetch_one(pool)
        .await
    }

    /// All revisions of an object, newest first.
    pub async fn list_for_object(
        pool: &PgPool,
        object_type: &str,
        object_id: DbId,
    ) -> Result<Vec<Revision>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM revisions \
             WHERE object_type = $1 AND object_id = $2 \
             ORDER BY id DESC"
        );
        sqlx::query_as::<_, Revision>(&query)
            .bind(object_type)
            .bind(object_id)
            .fetch_all(pool)
            .await
    }
}
