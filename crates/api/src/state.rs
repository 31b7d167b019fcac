use std::sync::Arc;

use crate::config::ServerConfig;
use crate::services::captcha::CaptchaVerifier;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: answer_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Bus for moderation and authoring activities.
    pub activity_bus: Arc<answer_events::ActivityBus>,
    /// Checks captcha answers on rate-limited writes.
    pub captcha: Arc<dyn CaptchaVerifier>,
}
