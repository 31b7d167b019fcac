//! Handlers for the per-kind content endpoints under `/answer/api/v1/{kind}`.
//!
//! Reads accept anonymous requests; every write requires [`AuthUser`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use super::parse_kind;
use crate::error::AppResult;
use crate::middleware::auth::{AuthUser, OptionalAuthUser};
use crate::query::{ContentPageParams, IdParams, SimilarParams, SitemapParams};
use crate::response::DataResponse;
use crate::services::content::{
    self as svc, CloseRequest, CreateContentRequest, DeleteRequest, MutationOutcome,
    OperationRequest, RecoverRequest, ReopenRequest, UpdateContentRequest,
};
use crate::services::rank::Requester;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// GET /{kind}/page
pub async fn page(
    auth: OptionalAuthUser,
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(params): Query<ContentPageParams>,
) -> AppResult<impl IntoResponse> {
    let kind = parse_kind(&kind)?;
    let viewer = Requester::load_optional(&state.pool, auth.user_id()).await?;
    let page = svc::page(&state, viewer.as_ref(), kind, &params).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /{kind}/info?id=
///
/// Counts a view. Deleted and pending items are a 404 for anyone but the
/// author and users who may reopen.
pub async fn info(
    auth: OptionalAuthUser,
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(params): Query<IdParams>,
) -> AppResult<impl IntoResponse> {
    let kind = parse_kind(&kind)?;
    let viewer = Requester::load_optional(&state.pool, auth.user_id()).await?;
    let detail = svc::detail(&state, viewer.as_ref(), kind, params.id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// GET /{kind}/similar?title=
pub async fn similar(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(params): Query<SimilarParams>,
) -> AppResult<impl IntoResponse> {
    let kind = parse_kind(&kind)?;
    let items = svc::similar(&state, kind, &params.title).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /{kind}/similar/tag?id=
pub async fn similar_by_tag(
    auth: OptionalAuthUser,
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(params): Query<IdParams>,
) -> AppResult<impl IntoResponse> {
    let kind = parse_kind(&kind)?;
    let viewer = Requester::load_optional(&state.pool, auth.user_id()).await?;
    let page = svc::similar_by_tag(&state, viewer.as_ref(), kind, params.id).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /{kind}/sitemap?page=
pub async fn sitemap(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(params): Query<SitemapParams>,
) -> AppResult<impl IntoResponse> {
    let kind = parse_kind(&kind)?;
    let page = svc::sitemap_page(&state, kind, params.page.unwrap_or(1)).await?;
    Ok(Json(DataResponse { data: page }))
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// POST /{kind}
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(input): Json<CreateContentRequest>,
) -> AppResult<impl IntoResponse> {
    let kind = parse_kind(&kind)?;
    let requester = Requester::load(&state.pool, auth.user_id).await?;
    let row = svc::create(&state, &requester, kind, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: MutationOutcome::of(&row, true),
        }),
    ))
}

/// PUT /{kind}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(input): Json<UpdateContentRequest>,
) -> AppResult<impl IntoResponse> {
    let kind = parse_kind(&kind)?;
    let requester = Requester::load(&state.pool, auth.user_id).await?;
    let outcome = svc::update(&state, &requester, kind, input).await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// DELETE /{kind}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(input): Json<DeleteRequest>,
) -> AppResult<impl IntoResponse> {
    let kind = parse_kind(&kind)?;
    let requester = Requester::load(&state.pool, auth.user_id).await?;
    let outcome = svc::delete(&state, &requester, kind, input).await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// PUT /{kind}/status
pub async fn close(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(input): Json<CloseRequest>,
) -> AppResult<impl IntoResponse> {
    let kind = parse_kind(&kind)?;
    let requester = Requester::load(&state.pool, auth.user_id).await?;
    let outcome = svc::close(&state, &requester, kind, input).await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// PUT /{kind}/reopen
pub async fn reopen(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(input): Json<ReopenRequest>,
) -> AppResult<impl IntoResponse> {
    let kind = parse_kind(&kind)?;
    let requester = Requester::load(&state.pool, auth.user_id).await?;
    let outcome = svc::reopen(&state, &requester, kind, input).await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// PUT /{kind}/operation
pub async fn operation(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(input): Json<OperationRequest>,
) -> AppResult<impl IntoResponse> {
    let kind = parse_kind(&kind)?;
    let requester = Requester::load(&state.pool, auth.user_id).await?;
    let outcome = svc::operate(&state, &requester, kind, input).await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// POST /{kind}/recover
pub async fn recover(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(input): Json<RecoverRequest>,
) -> AppResult<impl IntoResponse> {
    let kind = parse_kind(&kind)?;
    let requester = Requester::load(&state.pool, auth.user_id).await?;
    let outcome = svc::recover(&state, &requester, kind, input).await?;
    Ok(Json(DataResponse { data: outcome }))
}
