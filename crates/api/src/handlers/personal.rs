//! Handlers for personal pages and bookmarks.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;

use super::parse_kind;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, OptionalAuthUser};
use crate::query::{PageParams, PersonalPageParams, UsernameParams};
use crate::response::DataResponse;
use crate::services::content::{self as svc, CollectionSwitchRequest};
use crate::services::rank::Requester;
use crate::state::AppState;

/// GET /personal/{kind}/page?username=
pub async fn personal_page(
    auth: OptionalAuthUser,
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(params): Query<PersonalPageParams>,
) -> AppResult<impl IntoResponse> {
    let kind = parse_kind(&kind)?;
    let username = params
        .username
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::BadRequest("username is required".into()))?;
    let viewer = Requester::load_optional(&state.pool, auth.user_id()).await?;
    let page = svc::personal_page(
        &state,
        viewer.as_ref(),
        kind,
        username,
        params.order,
        params.window(),
    )
    .await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /personal/{kind}/top?username=
pub async fn top(
    auth: OptionalAuthUser,
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(params): Query<UsernameParams>,
) -> AppResult<impl IntoResponse> {
    let kind = parse_kind(&kind)?;
    let viewer = Requester::load_optional(&state.pool, auth.user_id()).await?;
    let username = params.username.unwrap_or_default();
    let page = svc::user_top(&state, viewer.as_ref(), kind, &username).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /personal/{kind}/collection/page
pub async fn collection_page(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let kind = parse_kind(&kind)?;
    let requester = Requester::load(&state.pool, auth.user_id).await?;
    let page = svc::collection_page(&state, &requester, kind, params.window()).await?;
    Ok(Json(DataResponse { data: page }))
}

/// POST /collection/switch
pub async fn collection_switch(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CollectionSwitchRequest>,
) -> AppResult<impl IntoResponse> {
    let requester = Requester::load(&state.pool, auth.user_id).await?;
    let outcome = svc::switch_collection(&state, &requester, input).await?;
    Ok(Json(DataResponse { data: outcome }))
}
