//! The create/edit/moderate pipeline shared by every content kind.
//!
//! Every mutation follows the same steps: load the item, resolve the
//! requester's capabilities, check ownership or permission, pass the captcha
//! gate where it applies, perform the transition, publish an activity.

use answer_core::content::{quote_references, ContentKind};
use answer_core::error::CoreError;
use answer_core::listing::{show_hidden, ListOrder, ListPlan, PageWindow};
use answer_core::operation::{
    self, admin_status_activity, admin_status_tag_rels, apply_operation, ActivityAction,
    Operation, Transition,
};
use answer_core::permission::{can_view, member_actions, PermissionAction};
use answer_core::status::{ContentStatus, RevisionStatus, TagRelStatus};
use answer_core::text::render_paragraphs;
use answer_core::types::DbId;
use answer_core::validation::{is_unchanged, validate_draft, ContentDraft, TagInput};
use answer_db::models::content::{AdminContentFilter, ContentRow, CreateContent, UpdateContent};
use answer_db::models::revision::CreateRevision;
use answer_db::repositories::content_repo::revision_snapshot;
use answer_db::repositories::{
    CollectionRepo, ContentRepo, RevisionRepo, SitemapRepo, TagRepo, UserRepo,
};
use answer_events::ActivityEvent;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::query::ContentPageParams;
use crate::response::PageModel;
use crate::services::captcha::{self, CaptchaAnswer, GatedAction};
use crate::services::format::{self, ContentDetail, ContentRef, ContentSummary};
use crate::services::rank::{permission_of, Requester};
use crate::services::tags::{self, TagFilter, TagPlan};
use crate::state::AppState;

/// Stored verbatim; any other format is rendered into escaped paragraphs.
pub const CONTENT_FORMAT_RAW: i16 = 1;

/// Maximum number of similar-title suggestions.
pub const SIMILAR_LIMIT: i64 = 10;

/// Page size of the same-tag listing; the item itself is dropped from it.
pub const SIMILAR_BY_TAG_LIMIT: i64 = 6;

/// Length of a user's top list.
pub const USER_TOP_LIMIT: i64 = 5;

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateContentRequest {
    pub title: String,
    pub content: String,
    pub content_format: Option<i16>,
    #[serde(default)]
    pub tags: Vec<TagInput>,
    pub attributes: Option<serde_json::Value>,
    pub captcha_id: Option<String>,
    pub captcha_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateContentRequest {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub content_format: Option<i16>,
    #[serde(default)]
    pub tags: Vec<TagInput>,
    pub attributes: Option<serde_json::Value>,
    #[serde(default)]
    pub edit_summary: String,
    pub captcha_id: Option<String>,
    pub captcha_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub id: DbId,
    pub captcha_id: Option<String>,
    pub captcha_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CloseRequest {
    pub id: DbId,
    pub close_type: i32,
    #[serde(default)]
    pub close_msg: String,
}

#[derive(Debug, Deserialize)]
pub struct ReopenRequest {
    #[serde(alias = "question_id")]
    pub id: DbId,
}

#[derive(Debug, Deserialize)]
pub struct OperationRequest {
    pub id: DbId,
    pub operation: Operation,
}

#[derive(Debug, Deserialize)]
pub struct RecoverRequest {
    pub id: DbId,
}

#[derive(Debug, Deserialize)]
pub struct AdminStatusRequest {
    pub id: DbId,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct CollectionSwitchRequest {
    pub object_type: ContentKind,
    pub object_id: DbId,
    pub bookmark: bool,
}

fn captcha_answer<'a>(id: &'a Option<String>, code: &'a Option<String>) -> CaptchaAnswer<'a> {
    CaptchaAnswer {
        captcha_id: id.as_deref(),
        captcha_code: code.as_deref(),
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Result of a state-changing request.
#[derive(Debug, Clone, Serialize)]
pub struct MutationOutcome {
    pub id: DbId,
    pub status: &'static str,
    pub pin: i16,
    pub show: i16,
    /// `false` when the request was a no-op.
    pub changed: bool,
    /// The edit was stored as a revision awaiting review.
    pub wait_for_review: bool,
}

impl MutationOutcome {
    pub fn of(row: &ContentRow, changed: bool) -> Self {
        Self {
            id: row.id,
            status: row.content_status().as_str(),
            pin: row.pin,
            show: row.show,
            changed,
            wait_for_review: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionSwitchOutcome {
    pub object_id: DbId,
    pub bookmark: bool,
    pub collection_count: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SitemapPageView {
    pub object_type: &'static str,
    pub page: i32,
    pub entries: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Shared steps
// ---------------------------------------------------------------------------

async fn find_row(pool: &PgPool, kind: ContentKind, id: DbId) -> AppResult<ContentRow> {
    ContentRepo::find_by_id(pool, kind, id)
        .await?
        .ok_or_else(|| not_found(kind, id))
}

fn not_found(kind: ContentKind, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: kind.entity(),
        id,
    })
}

fn forbidden(kind: ContentKind, action: PermissionAction) -> AppError {
    AppError::Core(CoreError::Forbidden(format!(
        "Insufficient rank to {} this {}",
        action.as_str(),
        kind.object_type()
    )))
}

/// Re-read a row after a status change so the response reflects it.
async fn reload(pool: &PgPool, kind: ContentKind, id: DbId) -> AppResult<ContentRow> {
    find_row(pool, kind, id).await
}

fn publish(state: &AppState, kind: ContentKind, action: ActivityAction, row: &ContentRow, actor: DbId) {
    state.activity_bus.publish(
        ActivityEvent::new(kind, action, row.id)
            .with_owner(row.user_id)
            .with_trigger(actor),
    );
}

fn render(content: &str, content_format: i16) -> String {
    if content_format == CONTENT_FORMAT_RAW {
        content.to_string()
    } else {
        render_paragraphs(content)
    }
}

fn check_content_format(content_format: Option<i16>) -> AppResult<i16> {
    match content_format.unwrap_or(0) {
        f @ (0 | CONTENT_FORMAT_RAW) => Ok(f),
        other => Err(CoreError::field(
            "content_format",
            format!("Unknown content format {other}"),
        )
        .into()),
    }
}

/// Quotes may only reference existing, non-deleted authors and pieces.
async fn check_quote_references(
    pool: &PgPool,
    kind: ContentKind,
    attributes: &serde_json::Value,
) -> AppResult<()> {
    if kind != ContentKind::Quote {
        return Ok(());
    }
    let refs = quote_references(attributes);
    for (ref_kind, id) in [
        (ContentKind::QuoteAuthor, refs.quote_author_id),
        (ContentKind::QuotePiece, refs.quote_piece_id),
    ] {
        let Some(id) = id else { continue };
        let usable = ContentRepo::find_by_id(pool, ref_kind, id)
            .await?
            .is_some_and(|r| r.content_status() != ContentStatus::Deleted);
        if !usable {
            return Err(CoreError::field(
                "attributes",
                format!("{} {id} does not exist", ref_kind.object_type()),
            )
            .into());
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Create / update
// ---------------------------------------------------------------------------

pub async fn create(
    state: &AppState,
    requester: &Requester,
    kind: ContentKind,
    req: CreateContentRequest,
) -> AppResult<ContentRow> {
    let pool = &state.pool;
    let permission = requester.permission();
    if !permission.can_add {
        return Err(forbidden(kind, PermissionAction::Add));
    }

    let draft = ContentDraft {
        title: req.title.trim().to_string(),
        content: req.content,
        tags: req.tags,
    };
    let slugs = validate_draft(&draft)?;
    let content_format = check_content_format(req.content_format)?;
    let attributes = kind.validate_attributes(req.attributes.as_ref())?;
    check_quote_references(pool, kind, &attributes).await?;

    let plan = TagPlan::prepare(pool, &permission, slugs, None).await?;
    let gated = GatedAction::new(kind, PermissionAction::Add);
    captcha::ensure_passed(
        state,
        requester,
        &gated,
        captcha_answer(&req.captcha_id, &req.captcha_code),
    )
    .await?;
    let tag_ids: Vec<DbId> = plan
        .materialise(pool, &draft.tags)
        .await?
        .iter()
        .map(|t| t.id)
        .collect();

    let status = if state.config.content.review_new_content && !requester.is_staff() {
        ContentStatus::Pending
    } else {
        ContentStatus::Available
    };
    let input = CreateContent {
        user_id: requester.user_id,
        parsed_text: render(&draft.content, content_format),
        title: draft.title,
        original_text: draft.content,
        content_format,
        status,
        attributes,
    };
    let row = ContentRepo::create(pool, kind, &input, &tag_ids, "New post").await?;

    captcha::record(pool, requester.user_id, &gated).await;
    publish(state, kind, ActivityAction::Asked, &row, requester.user_id);
    tracing::info!(
        user_id = requester.user_id,
        kind = %kind,
        object_id = row.id,
        status = status.as_str(),
        "Content created"
    );
    Ok(row)
}

pub async fn update(
    state: &AppState,
    requester: &Requester,
    kind: ContentKind,
    req: UpdateContentRequest,
) -> AppResult<MutationOutcome> {
    let pool = &state.pool;
    let row = find_row(pool, kind, req.id).await?;
    if row.content_status() == ContentStatus::Deleted {
        return Err(CoreError::Validation("Cannot edit a deleted item".into()).into());
    }
    if RevisionRepo::has_unreviewed(pool, kind.object_type(), row.id).await? {
        return Err(
            CoreError::Validation("An earlier edit of this item is awaiting review".into()).into(),
        );
    }

    let permission = requester.permission();
    let is_owner = row.user_id == requester.user_id;
    if !is_owner && !permission.can_edit {
        return Err(forbidden(kind, PermissionAction::Edit));
    }

    let draft = ContentDraft {
        title: req.title.trim().to_string(),
        content: req.content,
        tags: req.tags,
    };
    let slugs = validate_draft(&draft)?;
    let content_format = check_content_format(req.content_format.or(Some(row.content_format)))?;
    let attributes = kind.validate_attributes(req.attributes.as_ref().or(Some(&row.attributes)))?;
    check_quote_references(pool, kind, &attributes).await?;

    let old_tags = TagRepo::object_tags(pool, kind.object_type(), row.id).await?;
    let plan = TagPlan::prepare(pool, &permission, slugs, Some(&old_tags)).await?;

    let old_slugs: Vec<String> = old_tags.iter().map(|t| t.slug_name.clone()).collect();
    if is_unchanged(
        &row.title,
        &row.original_text,
        &old_slugs,
        &draft.title,
        &draft.content,
        plan.slugs(),
    ) && attributes == row.attributes
        && content_format == row.content_format
    {
        tracing::debug!(kind = %kind, object_id = row.id, "Edit is a no-op");
        return Ok(MutationOutcome::of(&row, false));
    }

    let gated = GatedAction::new(kind, PermissionAction::Edit);
    captcha::ensure_passed(
        state,
        requester,
        &gated,
        captcha_answer(&req.captcha_id, &req.captcha_code),
    )
    .await?;
    let tag_ids: Vec<DbId> = plan
        .materialise(pool, &draft.tags)
        .await?
        .iter()
        .map(|t| t.id)
        .collect();

    let mut proposed = row.clone();
    proposed.parsed_text = render(&draft.content, content_format);
    proposed.title = draft.title;
    proposed.original_text = draft.content;
    proposed.content_format = content_format;
    proposed.attributes = attributes;

    let apply_directly = is_owner || permission.can_edit_without_review;
    let revision = RevisionRepo::create(
        pool,
        &CreateRevision {
            object_type: kind.object_type(),
            object_id: row.id,
            user_id: requester.user_id,
            title: proposed.title.clone(),
            content: revision_snapshot(&proposed, &tag_ids),
            status: if apply_directly {
                RevisionStatus::Passed
            } else {
                RevisionStatus::Unreviewed
            },
            log: req.edit_summary,
        },
    )
    .await?;
    captcha::record(pool, requester.user_id, &gated).await;

    if !apply_directly {
        tracing::info!(
            user_id = requester.user_id,
            kind = %kind,
            object_id = row.id,
            revision_id = revision.id,
            "Edit stored for review"
        );
        let mut outcome = MutationOutcome::of(&row, false);
        outcome.wait_for_review = true;
        return Ok(outcome);
    }

    let updated = ContentRepo::apply_update(
        pool,
        kind,
        row.id,
        &UpdateContent {
            title: proposed.title,
            original_text: proposed.original_text,
            parsed_text: proposed.parsed_text,
            content_format,
            attributes: proposed.attributes,
            last_edit_user_id: requester.user_id,
            revision_id: Some(revision.id),
        },
        &tag_ids,
    )
    .await?
    .ok_or_else(|| not_found(kind, row.id))?;

    state.activity_bus.publish(
        ActivityEvent::new(kind, ActivityAction::Edited, updated.id)
            .with_owner(updated.user_id)
            .with_trigger(requester.user_id)
            .with_payload(serde_json::json!({ "revision_id": revision.id })),
    );
    tracing::info!(
        user_id = requester.user_id,
        kind = %kind,
        object_id = updated.id,
        revision_id = revision.id,
        "Content edited"
    );
    Ok(MutationOutcome::of(&updated, true))
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

pub async fn delete(
    state: &AppState,
    requester: &Requester,
    kind: ContentKind,
    req: DeleteRequest,
) -> AppResult<MutationOutcome> {
    let pool = &state.pool;
    let row = find_row(pool, kind, req.id).await?;
    let is_owner = row.user_id == requester.user_id;
    if !is_owner && !requester.permission().can_delete {
        return Err(forbidden(kind, PermissionAction::Delete));
    }

    let Transition::Apply(to, action) = operation::delete(row.content_status()) else {
        return Ok(MutationOutcome::of(&row, false));
    };

    let gated = GatedAction::new(kind, PermissionAction::Delete);
    captcha::ensure_passed(
        state,
        requester,
        &gated,
        captcha_answer(&req.captcha_id, &req.captcha_code),
    )
    .await?;

    ContentRepo::set_status(pool, kind, row.id, to, false, Some(TagRelStatus::Deleted)).await?;
    captcha::record(pool, requester.user_id, &gated).await;
    publish(state, kind, action, &row, requester.user_id);
    tracing::info!(user_id = requester.user_id, kind = %kind, object_id = row.id, "Content deleted");

    let row = reload(pool, kind, row.id).await?;
    Ok(MutationOutcome::of(&row, true))
}

pub async fn close(
    state: &AppState,
    requester: &Requester,
    kind: ContentKind,
    req: CloseRequest,
) -> AppResult<MutationOutcome> {
    let pool = &state.pool;
    let row = find_row(pool, kind, req.id).await?;
    if !requester.permission().can_close {
        return Err(forbidden(kind, PermissionAction::Close));
    }

    let Transition::Apply(_, action) = operation::close(row.content_status())? else {
        return Ok(MutationOutcome::of(&row, false));
    };

    let reason = serde_json::json!({
        "close_type": req.close_type,
        "close_msg": req.close_msg.trim(),
    });
    ContentRepo::close(pool, kind, row.id, &reason).await?;
    state.activity_bus.publish(
        ActivityEvent::new(kind, action, row.id)
            .with_owner(row.user_id)
            .with_trigger(requester.user_id)
            .with_payload(reason),
    );
    tracing::info!(
        user_id = requester.user_id,
        kind = %kind,
        object_id = row.id,
        close_type = req.close_type,
        "Content closed"
    );

    let row = reload(pool, kind, row.id).await?;
    Ok(MutationOutcome::of(&row, true))
}

pub async fn reopen(
    state: &AppState,
    requester: &Requester,
    kind: ContentKind,
    req: ReopenRequest,
) -> AppResult<MutationOutcome> {
    let pool = &state.pool;
    let row = find_row(pool, kind, req.id).await?;
    if !requester.permission().can_reopen {
        return Err(forbidden(kind, PermissionAction::Reopen));
    }

    let Transition::Apply(to, action) = operation::reopen(row.content_status())? else {
        return Ok(MutationOutcome::of(&row, false));
    };

    ContentRepo::set_status(pool, kind, row.id, to, true, None).await?;
    publish(state, kind, action, &row, requester.user_id);
    tracing::info!(user_id = requester.user_id, kind = %kind, object_id = row.id, "Content reopened");

    let row = reload(pool, kind, row.id).await?;
    Ok(MutationOutcome::of(&row, true))
}

/// Pin, unpin, hide or show.
pub async fn operate(
    state: &AppState,
    requester: &Requester,
    kind: ContentKind,
    req: OperationRequest,
) -> AppResult<MutationOutcome> {
    let pool = &state.pool;
    let row = find_row(pool, kind, req.id).await?;
    let permission = requester.permission();
    let (allowed, action) = match req.operation {
        Operation::Pin => (permission.can_pin, PermissionAction::Pin),
        Operation::Unpin => (permission.can_unpin, PermissionAction::Unpin),
        Operation::Hide => (permission.can_hide, PermissionAction::Hide),
        Operation::Show => (permission.can_show, PermissionAction::Show),
    };
    if !allowed {
        return Err(forbidden(kind, action));
    }
    if row.content_status() == ContentStatus::Deleted {
        return Err(CoreError::Validation("Cannot change a deleted item".into()).into());
    }

    let Some(effect) = apply_operation(row.pin_state(), row.show_state(), req.operation) else {
        tracing::debug!(kind = %kind, object_id = row.id, operation = ?req.operation, "Operation rejected by state");
        return Ok(MutationOutcome::of(&row, false));
    };
    if effect.pin == row.pin_state() && effect.show == row.show_state() {
        return Ok(MutationOutcome::of(&row, false));
    }

    ContentRepo::set_display(pool, kind, row.id, effect.pin, effect.show, effect.tag_rels).await?;
    publish(state, kind, req.operation.activity(), &row, requester.user_id);
    tracing::info!(
        user_id = requester.user_id,
        kind = %kind,
        object_id = row.id,
        operation = ?req.operation,
        "Display operation applied"
    );

    let row = reload(pool, kind, row.id).await?;
    Ok(MutationOutcome::of(&row, true))
}

pub async fn recover(
    state: &AppState,
    requester: &Requester,
    kind: ContentKind,
    req: RecoverRequest,
) -> AppResult<MutationOutcome> {
    let pool = &state.pool;
    if !requester.permission().can_recover {
        return Err(forbidden(kind, PermissionAction::Undeleted));
    }
    let row = find_row(pool, kind, req.id).await?;

    let Transition::Apply(to, action) = operation::recover(row.content_status()) else {
        return Ok(MutationOutcome::of(&row, false));
    };

    let rels = TagRelStatus::live_for(row.show_state());
    ContentRepo::set_status(pool, kind, row.id, to, false, Some(rels)).await?;
    publish(state, kind, action, &row, requester.user_id);
    tracing::info!(user_id = requester.user_id, kind = %kind, object_id = row.id, "Content recovered");

    let row = reload(pool, kind, row.id).await?;
    Ok(MutationOutcome::of(&row, true))
}

/// Moderator status change to any status. Only deletion leaves `updated_at`
/// alone.
pub async fn admin_set_status(
    state: &AppState,
    requester: &Requester,
    kind: ContentKind,
    req: AdminStatusRequest,
) -> AppResult<MutationOutcome> {
    let pool = &state.pool;
    if !requester.is_staff() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Admin or moderator role required".into(),
        )));
    }
    let to = ContentStatus::parse(&req.status)?;
    let row = find_row(pool, kind, req.id).await?;
    let from = row.content_status();
    if from == to {
        return Ok(MutationOutcome::of(&row, false));
    }

    ContentRepo::set_status(
        pool,
        kind,
        row.id,
        to,
        to != ContentStatus::Deleted,
        admin_status_tag_rels(from, to, row.show_state()),
    )
    .await?;
    if let Some(action) = admin_status_activity(from, to) {
        publish(state, kind, action, &row, requester.user_id);
    }
    tracing::info!(
        user_id = requester.user_id,
        kind = %kind,
        object_id = row.id,
        from = from.as_str(),
        to = to.as_str(),
        "Admin status change"
    );

    let row = reload(pool, kind, row.id).await?;
    Ok(MutationOutcome::of(&row, true))
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

pub async fn detail(
    state: &AppState,
    viewer: Option<&Requester>,
    kind: ContentKind,
    id: DbId,
) -> AppResult<ContentDetail> {
    let pool = &state.pool;
    let mut row = find_row(pool, kind, id).await?;
    let viewer_id = viewer.map(|v| v.user_id);
    let permission = permission_of(viewer);
    if !can_view(row.content_status(), row.user_id, viewer_id, &permission) {
        return Err(not_found(kind, id));
    }

    match ContentRepo::increment_view(pool, kind, id).await {
        Ok(true) => row.view_count += 1,
        Ok(false) => {}
        Err(e) => tracing::warn!(kind = %kind, object_id = id, error = %e, "Failed to count view"),
    }

    let adjusted = permission.adjust_for_state(row.content_status(), row.pin_state(), row.show_state());
    let actions = member_actions(viewer_id, row.user_id, row.content_status(), &adjusted);
    let collected = match viewer_id {
        Some(uid) => CollectionRepo::exists(pool, uid, kind.object_type(), id).await?,
        None => false,
    };
    format::detail(pool, kind, &row, actions, collected).await
}

pub async fn page(
    state: &AppState,
    viewer: Option<&Requester>,
    kind: ContentKind,
    params: &ContentPageParams,
) -> AppResult<PageModel<ContentSummary>> {
    let pool = &state.pool;
    let tag_ids = match tags::resolve_filter(pool, params.tag.as_deref(), params.tag_id).await? {
        TagFilter::Any => Vec::new(),
        TagFilter::Tags(ids) => ids,
        TagFilter::NoMatch => return Ok(PageModel::empty()),
    };
    let user_id = match params.username.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        Some(username) => match UserRepo::find_by_username(pool, username).await? {
            Some(user) => Some(user.id),
            None => return Ok(PageModel::empty()),
        },
        None => None,
    };

    let hidden = show_hidden(
        viewer.map(|v| v.user_id),
        viewer.map(|v| v.role.as_str()),
        user_id,
    );
    let plan = ListPlan::new(params.order, params.window())
        .with_tags(tag_ids)
        .with_user(user_id, hidden)
        .with_in_days(params.in_days)
        .finish();
    run_plan(pool, kind, &plan).await
}

/// Items of one user. Hidden and pending items are included for the user
/// themself and for staff.
pub async fn personal_page(
    state: &AppState,
    viewer: Option<&Requester>,
    kind: ContentKind,
    username: &str,
    order: ListOrder,
    window: PageWindow,
) -> AppResult<PageModel<ContentSummary>> {
    let pool = &state.pool;
    let user = UserRepo::find_by_username(pool, username.trim())
        .await?
        .ok_or_else(|| AppError::BadRequest("user not found".into()))?;

    let hidden = show_hidden(
        viewer.map(|v| v.user_id),
        viewer.map(|v| v.role.as_str()),
        Some(user.id),
    );
    let plan = ListPlan::new(order, window)
        .with_user(Some(user.id), hidden)
        .with_pending(hidden)
        .finish();
    run_plan(pool, kind, &plan).await
}

async fn run_plan(
    pool: &PgPool,
    kind: ContentKind,
    plan: &ListPlan,
) -> AppResult<PageModel<ContentSummary>> {
    let (rows, count) = ContentRepo::page(pool, kind, plan).await?;
    Ok(PageModel {
        count,
        list: format::summaries(pool, kind, &rows).await?,
    })
}

pub async fn similar(state: &AppState, kind: ContentKind, title: &str) -> AppResult<Vec<ContentRef>> {
    let title = title.trim();
    if title.is_empty() {
        return Ok(Vec::new());
    }
    let rows = ContentRepo::similar(&state.pool, kind, title, SIMILAR_LIMIT).await?;
    Ok(rows.iter().map(ContentRef::from).collect())
}

/// Hottest items sharing the first tag of item `id`, without the item
/// itself. Items the viewer cannot open have no related items.
pub async fn similar_by_tag(
    state: &AppState,
    viewer: Option<&Requester>,
    kind: ContentKind,
    id: DbId,
) -> AppResult<PageModel<ContentSummary>> {
    let pool = &state.pool;
    let Some(row) = ContentRepo::find_by_id(pool, kind, id).await? else {
        return Ok(PageModel::empty());
    };
    if !can_view(
        row.content_status(),
        row.user_id,
        viewer.map(|v| v.user_id),
        &permission_of(viewer),
    ) {
        return Ok(PageModel::empty());
    }

    let first_tag = TagRepo::object_tags(pool, kind.object_type(), row.id)
        .await?
        .into_iter()
        .next();
    let tag_ids = match first_tag {
        Some(tag) => match tags::resolve_filter(pool, None, Some(tag.id)).await? {
            TagFilter::Tags(ids) => ids,
            TagFilter::Any | TagFilter::NoMatch => vec![tag.id],
        },
        None => Vec::new(),
    };

    let plan = ListPlan::new(
        ListOrder::Hot,
        PageWindow::new(Some(1), Some(SIMILAR_BY_TAG_LIMIT)),
    )
    .with_tags(tag_ids)
    .finish();
    let (rows, _) = ContentRepo::page(pool, kind, &plan).await?;
    let rows: Vec<ContentRow> = rows.into_iter().filter(|r| r.id != row.id).collect();
    let list = format::summaries(pool, kind, &rows).await?;
    Ok(PageModel {
        count: list.len() as i64,
        list,
    })
}

/// A user's best-scored items. Unknown users have none.
pub async fn user_top(
    state: &AppState,
    viewer: Option<&Requester>,
    kind: ContentKind,
    username: &str,
) -> AppResult<PageModel<ContentSummary>> {
    let pool = &state.pool;
    let Some(user) = UserRepo::find_by_username(pool, username.trim()).await? else {
        return Ok(PageModel::empty());
    };
    let hidden = show_hidden(
        viewer.map(|v| v.user_id),
        viewer.map(|v| v.role.as_str()),
        Some(user.id),
    );
    let plan = ListPlan::new(
        ListOrder::Score,
        PageWindow::new(Some(1), Some(USER_TOP_LIMIT)),
    )
    .with_user(Some(user.id), hidden)
    .finish();
    let (rows, _) = ContentRepo::page(pool, kind, &plan).await?;
    let list = format::summaries(pool, kind, &rows).await?;
    Ok(PageModel {
        count: list.len() as i64,
        list,
    })
}

pub async fn sitemap_page(state: &AppState, kind: ContentKind, page: i64) -> AppResult<SitemapPageView> {
    let page = i32::try_from(page.max(1)).unwrap_or(i32::MAX);
    let stored = SitemapRepo::find(&state.pool, kind.object_type(), page)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SitemapPage",
            id: DbId::from(page),
        }))?;
    Ok(SitemapPageView {
        object_type: kind.object_type(),
        page: stored.page,
        entries: stored.entries,
    })
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

pub async fn switch_collection(
    state: &AppState,
    requester: &Requester,
    req: CollectionSwitchRequest,
) -> AppResult<CollectionSwitchOutcome> {
    let pool = &state.pool;
    let kind = req.object_type;
    let row = find_row(pool, kind, req.object_id).await?;
    if row.content_status() == ContentStatus::Deleted {
        return Err(not_found(kind, row.id));
    }

    if req.bookmark {
        CollectionRepo::add(pool, requester.user_id, kind.object_type(), row.id).await?;
    } else {
        CollectionRepo::remove(pool, requester.user_id, kind.object_type(), row.id).await?;
    }
    let collection_count = ContentRepo::refresh_collection_count(pool, kind, row.id).await?;
    tracing::info!(
        user_id = requester.user_id,
        kind = %kind,
        object_id = row.id,
        bookmark = req.bookmark,
        "Collection switched"
    );
    Ok(CollectionSwitchOutcome {
        object_id: row.id,
        bookmark: req.bookmark,
        collection_count,
    })
}

/// The requester's collected items of one kind, newest bookmark first.
/// Items deleted since they were collected are skipped.
pub async fn collection_page(
    state: &AppState,
    requester: &Requester,
    kind: ContentKind,
    window: PageWindow,
) -> AppResult<PageModel<ContentSummary>> {
    let pool = &state.pool;
    let (ids, count) =
        CollectionRepo::page_object_ids(pool, requester.user_id, kind.object_type(), window)
            .await?;
    let found = ContentRepo::find_by_ids(pool, kind, &ids).await?;
    let rows: Vec<ContentRow> = ids
        .iter()
        .filter_map(|id| found.iter().find(|r| r.id == *id))
        .filter(|r| r.content_status() != ContentStatus::Deleted)
        .cloned()
        .collect();
    Ok(PageModel {
        count,
        list: format::summaries(pool, kind, &rows).await?,
    })
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// Parse the admin `query` box: `{kind}:<id>` searches by id, anything else
/// matches titles.
pub fn admin_filter(kind: ContentKind, status: ContentStatus, query: Option<&str>) -> AdminContentFilter {
    let query = query.map(str::trim).filter(|q| !q.is_empty());
    let id = query
        .and_then(|q| q.strip_prefix(kind.object_type()))
        .and_then(|rest| rest.strip_prefix(':'))
        .and_then(|rest| rest.trim().parse::<DbId>().ok());
    AdminContentFilter {
        status,
        id,
        title: if id.is_some() {
            None
        } else {
            query.map(str::to_string)
        },
    }
}

pub async fn admin_page(
    state: &AppState,
    kind: ContentKind,
    status: Option<&str>,
    query: Option<&str>,
    window: PageWindow,
) -> AppResult<PageModel<ContentSummary>> {
    let status = match status.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => ContentStatus::parse(s)?,
        None => ContentStatus::Available,
    };
    let filter = admin_filter(kind, status, query);
    let (rows, count) = ContentRepo::admin_page(&state.pool, kind, &filter, window).await?;
    Ok(PageModel {
        count,
        list: format::summaries(&state.pool, kind, &rows).await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_query_by_id() {
        let f = admin_filter(ContentKind::Question, ContentStatus::Closed, Some("question:42"));
        assert_eq!(f.id, Some(42));
        assert_eq!(f.title, None);
        assert_eq!(f.status, ContentStatus::Closed);
    }

    #[test]
    fn admin_query_for_other_kind_is_a_title_search() {
        let f = admin_filter(ContentKind::Article, ContentStatus::Available, Some("question:42"));
        assert_eq!(f.id, None);
        assert_eq!(f.title.as_deref(), Some("question:42"));
    }

    #[test]
    fn blank_admin_query_matches_everything() {
        let f = admin_filter(ContentKind::Quote, ContentStatus::Available, Some("   "));
        assert_eq!(f.id, None);
        assert_eq!(f.title, None);
    }

    #[test]
    fn raw_format_is_stored_verbatim() {
        assert_eq!(render("<b>x</b>", CONTENT_FORMAT_RAW), "<b>x</b>");
        assert_eq!(render("a < b", 0), "<p>a &lt; b</p>");
    }

    #[test]
    fn unknown_content_format_is_a_field_error() {
        assert!(check_content_format(None).is_ok());
        assert!(check_content_format(Some(1)).is_ok());
        assert!(matches!(
            check_content_format(Some(7)),
            Err(AppError::Core(CoreError::FieldValidation(_)))
        ));
    }
}
