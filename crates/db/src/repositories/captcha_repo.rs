//! Repository for the `captcha_challenges` table.

use answer_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::captcha::CaptchaChallenge;

/// Column list for `captcha_challenges` queries.
const COLUMNS: &str = "id, captcha_id, code_hash, expires_at, used_at, created_at, updated_at";

/// Provides storage for issued captcha challenges.
pub struct CaptchaRepo;

impl CaptchaRepo {
    /// Store a challenge. Only the hash of the expected code is kept.
    pub async fn create(
        pool: &PgPool,
        captcha_id: &str,
        code_hash: &str,
        expires_at: Timestamp,
    ) -> Result<CaptchaChallenge, sqlx::Error> {
        let query = format!(
            "INSERT INTO captcha_challenges (captcha_id, code_hash, expires_at) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CaptchaChallenge>(&query)
            .bind(captcha_id)
            .bind(code_hash)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Atomically consume an unexpired, unused challenge whose code hash
    /// matches. Returns `true` if a challenge was consumed.
    pub async fn consume(
        pool: &PgPool,
        captcha_id: &str,
        code_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE captcha_challenges \
             SET used_at = NOW(), updated_at = NOW() \
             WHERE captcha_id = $1 AND code_hash = $2 \
               AND used_at IS NULL AND expires_at > NOW()",
        )
        .bind(captcha_id)
        .bind(code_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
