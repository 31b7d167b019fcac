//! Captcha gate for create, edit and delete.
//!
//! Every user gets a daily quota of free writes per action key (e.g.
//! `question.add`). Past the quota a solved captcha must accompany the
//! request. Admins are never asked.

use answer_core::content::ContentKind;
use answer_core::error::CoreError;
use answer_core::permission::{permission_key, PermissionAction};
use answer_core::types::DbId;
use answer_db::repositories::{ActionRecordRepo, CaptchaRepo};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use sqlx::PgPool;

use crate::error::AppResult;
use crate::services::rank::Requester;
use crate::state::AppState;

/// Window over which free actions are counted.
pub const ACTION_WINDOW_SECS: i64 = 86_400;

/// Checks a submitted captcha answer.
#[async_trait]
pub trait CaptchaVerifier: Send + Sync {
    /// Returns `true` and burns the challenge if `code` solves `captcha_id`.
    async fn verify(&self, captcha_id: &str, code: &str) -> Result<bool, sqlx::Error>;
}

/// Verifies against challenges stored in `captcha_challenges`.
pub struct DbCaptchaVerifier {
    pool: PgPool,
}

impl DbCaptchaVerifier {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CaptchaVerifier for DbCaptchaVerifier {
    async fn verify(&self, captcha_id: &str, code: &str) -> Result<bool, sqlx::Error> {
        CaptchaRepo::consume(&self.pool, captcha_id, &hash_code(code)).await
    }
}

/// Hex SHA-256 of a normalised (trimmed, lowercased) captcha code.
pub fn hash_code(code: &str) -> String {
    let digest = Sha256::digest(code.trim().to_lowercase().as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Captcha fields carried by write requests.
#[derive(Debug, Clone, Copy)]
pub struct CaptchaAnswer<'a> {
    pub captcha_id: Option<&'a str>,
    pub captcha_code: Option<&'a str>,
}

/// The rate-limited write a captcha protects.
#[derive(Debug, Clone)]
pub struct GatedAction {
    key: String,
}

impl GatedAction {
    pub fn new(kind: ContentKind, action: PermissionAction) -> Self {
        Self {
            key: permission_key(kind, action),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Fail with a `captcha_code` field error when the user is past their free
/// quota and did not solve a captcha.
pub async fn ensure_passed(
    state: &AppState,
    requester: &Requester,
    action: &GatedAction,
    answer: CaptchaAnswer<'_>,
) -> AppResult<()> {
    if requester.is_admin() {
        return Ok(());
    }
    let recent = ActionRecordRepo::count_recent(
        &state.pool,
        requester.user_id,
        action.key(),
        ACTION_WINDOW_SECS,
    )
    .await?;
    if recent < state.config.content.captcha_free_actions {
        return Ok(());
    }

    let (Some(id), Some(code)) = (answer.captcha_id, answer.captcha_code) else {
        return Err(CoreError::field("captcha_code", "captcha verification is required").into());
    };
    if !state.captcha.verify(id, code).await? {
        tracing::info!(user_id = requester.user_id, action = action.key(), "Captcha rejected");
        return Err(CoreError::field("captcha_code", "verification failed").into());
    }
    Ok(())
}

/// Count a completed write against the user's quota. Failures are logged
/// only; the write itself already succeeded.
pub async fn record(pool: &PgPool, user_id: DbId, action: &GatedAction) {
    if let Err(e) = ActionRecordRepo::record(pool, user_id, action.key()).await {
        tracing::warn!(user_id, action = action.key(), error = %e, "Failed to record action");
    }
}
