//! Moderation routes. The handlers enforce the staff role.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// ```text
/// GET /{kind}/page      -> page
/// PUT /{kind}/status    -> set_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{kind}/page", get(admin::page))
        .route("/{kind}/status", put(admin::set_status))
}
