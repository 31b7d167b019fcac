use answer_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `captcha_challenges` table.
#[derive(Debug, Clone, FromRow)]
pub struct CaptchaChallenge {
    pub id: DbId,
    pub captcha_id: String,
    pub code_hash: String,
    pub expires_at: Timestamp,
    pub used_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
