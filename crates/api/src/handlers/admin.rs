//! Moderation handlers under `/answer/admin/api`. Admin or moderator only.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;

use super::parse_kind;
use crate::error::AppResult;
use crate::middleware::rbac::RequireStaff;
use crate::query::AdminPageParams;
use crate::response::DataResponse;
use crate::services::content::{self as svc, AdminStatusRequest};
use crate::services::rank::Requester;
use crate::state::AppState;

/// GET /{kind}/page?status=&query=
pub async fn page(
    RequireStaff(_auth): RequireStaff,
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(params): Query<AdminPageParams>,
) -> AppResult<impl IntoResponse> {
    let kind = parse_kind(&kind)?;
    let page = svc::admin_page(
        &state,
        kind,
        params.status.as_deref(),
        params.query.as_deref(),
        params.window(),
    )
    .await?;
    Ok(Json(DataResponse { data: page }))
}

/// PUT /{kind}/status
pub async fn set_status(
    RequireStaff(auth): RequireStaff,
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(input): Json<AdminStatusRequest>,
) -> AppResult<impl IntoResponse> {
    let kind = parse_kind(&kind)?;
    let requester = Requester::load(&state.pool, auth.user_id).await?;
    let outcome = svc::admin_set_status(&state, &requester, kind, input).await?;
    Ok(Json(DataResponse { data: outcome }))
}
