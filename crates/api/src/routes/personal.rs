//! Personal page routes.

use axum::routing::get;
use axum::Router;

use crate::handlers::personal;
use crate::state::AppState;

/// ```text
/// GET /personal/{kind}/page               -> personal_page
/// GET /personal/{kind}/top                -> top
/// GET /personal/{kind}/collection/page    -> collection_page (auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/personal/{kind}/page", get(personal::personal_page))
        .route("/personal/{kind}/top", get(personal::top))
        .route(
            "/personal/{kind}/collection/page",
            get(personal::collection_page),
        )
}
