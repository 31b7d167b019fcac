//! Per-kind content routes.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::content;
use crate::state::AppState;

/// ```text
/// POST   /{kind}              -> create
/// PUT    /{kind}              -> update
/// DELETE /{kind}              -> delete
/// GET    /{kind}/page         -> page
/// GET    /{kind}/info         -> info
/// GET    /{kind}/similar      -> similar
/// GET    /{kind}/similar/tag  -> similar_by_tag
/// GET    /{kind}/sitemap      -> sitemap
/// PUT    /{kind}/status       -> close
/// PUT    /{kind}/reopen       -> reopen
/// PUT    /{kind}/operation    -> operation
/// POST   /{kind}/recover      -> recover
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{kind}",
            post(content::create)
                .put(content::update)
                .delete(content::delete),
        )
        .route("/{kind}/page", get(content::page))
        .route("/{kind}/info", get(content::info))
        .route("/{kind}/similar", get(content::similar))
        .route("/{kind}/similar/tag", get(content::similar_by_tag))
        .route("/{kind}/sitemap", get(content::sitemap))
        .route("/{kind}/status", put(content::close))
        .route("/{kind}/reopen", put(content::reopen))
        .route("/{kind}/operation", put(content::operation))
        .route("/{kind}/recover", post(content::recover))
}
