use axum::routing::post;
use axum::Router;

use crate::handlers::personal;
use crate::state::AppState;

/// ```text
/// POST /collection/switch   -> collection_switch (auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/collection/switch", post(personal::collection_switch))
}
