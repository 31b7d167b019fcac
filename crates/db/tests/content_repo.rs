//! Integration tests for the content repository: creation, moderation
//! state changes, tag relation bookkeeping and page queries.

use answer_core::content::ContentKind;
use answer_core::listing::{ListOrder, ListPlan, PageWindow};
use answer_core::status::{ContentStatus, PinState, ShowState, TagRelStatus};
use answer_db::models::content::{CreateContent, UpdateContent};
use answer_db::models::user::CreateUser;
use answer_db::repositories::{ContentRepo, RevisionRepo, TagRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool, username: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            display_name: username.to_string(),
            role: "user".to_string(),
            rank: 1,
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_tag(pool: &PgPool, slug: &str) -> i64 {
    TagRepo::get_or_create(pool, slug, slug).await.unwrap().id
}

fn new_content(user_id: i64, title: &str) -> CreateContent {
    CreateContent {
        user_id,
        title: title.to_string(),
        original_text: "Some body text".to_string(),
        parsed_text: "<p>Some body text</p>".to_string(),
        content_format: 0,
        status: ContentStatus::Available,
        attributes: serde_json::json!({}),
    }
}

async fn content_count(pool: &PgPool, tag_id: i64) -> i32 {
    sqlx::query_scalar("SELECT content_count FROM tags WHERE id = $1")
        .bind(tag_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn rel_status(pool: &PgPool, object_type: &str, object_id: i64) -> Vec<i16> {
    sqlx::query_scalar("SELECT status FROM tag_rels WHERE object_type = $1 AND object_id = $2")
        .bind(object_type)
        .bind(object_id)
        .fetch_all(pool)
        .await
        .unwrap()
}

fn newest_plan() -> ListPlan {
    ListPlan::new(ListOrder::Newest, PageWindow::new(None, None)).finish()
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_writes_tags_and_revision(pool: PgPool) {
    let user = seed_user(&pool, "alice").await;
    let tag = seed_tag(&pool, "rust").await;

    let row = ContentRepo::create(
        &pool,
        ContentKind::Question,
        &new_content(user, "How do lifetimes work?"),
        &[tag],
        "",
    )
    .await
    .unwrap();

    assert_eq!(row.content_status(), ContentStatus::Available);
    assert_eq!(row.pin_state(), PinState::Unpinned);
    assert_eq!(row.show_state(), ShowState::Shown);
    assert!(row.revision_id.is_some());
    assert_eq!(content_count(&pool, tag).await, 1);

    let revisions = RevisionRepo::list_for_object(&pool, "question", row.id)
        .await
        .unwrap();
    assert_eq!(revisions.len(), 1);
    assert_eq!(revisions[0].content["tag_ids"], serde_json::json!([tag]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_kinds_are_isolated(pool: PgPool) {
    let user = seed_user(&pool, "alice").await;
    let tag = seed_tag(&pool, "rust").await;
    ContentRepo::create(&pool, ContentKind::Article, &new_content(user, "An article"), &[tag], "")
        .await
        .unwrap();

    let (rows, total) = ContentRepo::page(&pool, ContentKind::Quote, &newest_plan())
        .await
        .unwrap();
    assert!(rows.is_empty());
    assert_eq!(total, 0);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_replaces_tags(pool: PgPool) {
    let user = seed_user(&pool, "alice").await;
    let rust = seed_tag(&pool, "rust").await;
    let go = seed_tag(&pool, "go").await;
    let row = ContentRepo::create(&pool, ContentKind::Article, &new_content(user, "Title one"), &[rust], "")
        .await
        .unwrap();

    let updated = ContentRepo::apply_update(
        &pool,
        ContentKind::Article,
        row.id,
        &UpdateContent {
            title: "Title two".to_string(),
            original_text: "New body text".to_string(),
            parsed_text: "<p>New body text</p>".to_string(),
            content_format: 0,
            attributes: serde_json::json!({}),
            last_edit_user_id: user,
            revision_id: None,
        },
        &[go],
    )
    .await
    .unwrap()
    .expect("row exists");

    assert_eq!(updated.title, "Title two");
    assert_eq!(updated.last_edit_user_id, Some(user));
    assert_eq!(updated.revision_id, row.revision_id);
    assert!(updated.post_update_time >= row.post_update_time);
    assert_eq!(content_count(&pool, rust).await, 0);
    assert_eq!(content_count(&pool, go).await, 1);

    let tags = TagRepo::object_tags(&pool, "article", row.id).await.unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].slug_name, "go");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_row_returns_none(pool: PgPool) {
    let user = seed_user(&pool, "alice").await;
    let result = ContentRepo::apply_update(
        &pool,
        ContentKind::Question,
        9999,
        &UpdateContent {
            title: "Nothing here".to_string(),
            original_text: "body text".to_string(),
            parsed_text: "body text".to_string(),
            content_format: 0,
            attributes: serde_json::json!({}),
            last_edit_user_id: user,
            revision_id: None,
        },
        &[],
    )
    .await
    .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Moderation state
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_hide_and_show_move_tag_rels(pool: PgPool) {
    let user = seed_user(&pool, "alice").await;
    let tag = seed_tag(&pool, "rust").await;
    let row = ContentRepo::create(&pool, ContentKind::Quote, &new_content(user, "A quote"), &[tag], "")
        .await
        .unwrap();

    ContentRepo::set_display(
        &pool,
        ContentKind::Quote,
        row.id,
        PinState::Unpinned,
        ShowState::Hidden,
        Some(TagRelStatus::Hidden),
    )
    .await
    .unwrap();
    assert_eq!(rel_status(&pool, "quote", row.id).await, vec![TagRelStatus::Hidden.id()]);
    assert_eq!(content_count(&pool, tag).await, 0);

    let (rows, _) = ContentRepo::page(&pool, ContentKind::Quote, &newest_plan())
        .await
        .unwrap();
    assert!(rows.is_empty(), "hidden items are not listed");

    ContentRepo::set_display(
        &pool,
        ContentKind::Quote,
        row.id,
        PinState::Unpinned,
        ShowState::Shown,
        Some(TagRelStatus::Available),
    )
    .await
    .unwrap();
    assert_eq!(content_count(&pool, tag).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_and_recover(pool: PgPool) {
    let user = seed_user(&pool, "alice").await;
    let tag = seed_tag(&pool, "rust").await;
    let row = ContentRepo::create(&pool, ContentKind::Question, &new_content(user, "Delete me"), &[tag], "")
        .await
        .unwrap();

    let deleted = ContentRepo::set_status(
        &pool,
        ContentKind::Question,
        row.id,
        ContentStatus::Deleted,
        false,
        Some(TagRelStatus::Deleted),
    )
    .await
    .unwrap();
    assert!(deleted);

    let stored = ContentRepo::find_by_id(&pool, ContentKind::Question, row.id)
        .await
        .unwrap()
        .expect("soft-deleted rows stay readable");
    assert_eq!(stored.content_status(), ContentStatus::Deleted);
    assert_eq!(stored.updated_at, row.updated_at, "deletion does not touch updated_at");
    assert_eq!(content_count(&pool, tag).await, 0);
    assert!(TagRepo::object_tags(&pool, "question", row.id).await.unwrap().is_empty());

    let (rows, total) = ContentRepo::page(&pool, ContentKind::Question, &newest_plan())
        .await
        .unwrap();
    assert!(rows.is_empty());
    assert_eq!(total, 0);

    ContentRepo::set_status(
        &pool,
        ContentKind::Question,
        row.id,
        ContentStatus::Available,
        false,
        Some(TagRelStatus::Available),
    )
    .await
    .unwrap();
    assert_eq!(content_count(&pool, tag).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_hidden_item_relations_stay_hidden(pool: PgPool) {
    let user = seed_user(&pool, "alice").await;
    let tag = seed_tag(&pool, "rust").await;
    let row = ContentRepo::create(&pool, ContentKind::Article, &new_content(user, "Hidden article"), &[tag], "")
        .await
        .unwrap();
    ContentRepo::set_display(
        &pool,
        ContentKind::Article,
        row.id,
        PinState::Unpinned,
        ShowState::Hidden,
        Some(TagRelStatus::Hidden),
    )
    .await
    .unwrap();

    // Editing keeps the same tag hidden.
    let updated = ContentRepo::apply_update(
        &pool,
        ContentKind::Article,
        row.id,
        &UpdateContent {
            title: "Hidden article, edited".to_string(),
            original_text: "New body text".to_string(),
            parsed_text: "<p>New body text</p>".to_string(),
            content_format: 0,
            attributes: serde_json::json!({}),
            last_edit_user_id: user,
            revision_id: None,
        },
        &[tag],
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.show_state(), ShowState::Hidden);
    assert_eq!(rel_status(&pool, "article", row.id).await, vec![TagRelStatus::Hidden.id()]);
    assert_eq!(content_count(&pool, tag).await, 0);

    // Delete then recover restores the relation as hidden.
    ContentRepo::set_status(
        &pool,
        ContentKind::Article,
        row.id,
        ContentStatus::Deleted,
        false,
        Some(TagRelStatus::Deleted),
    )
    .await
    .unwrap();
    ContentRepo::set_status(
        &pool,
        ContentKind::Article,
        row.id,
        ContentStatus::Available,
        false,
        Some(TagRelStatus::live_for(updated.show_state())),
    )
    .await
    .unwrap();
    assert_eq!(rel_status(&pool, "article", row.id).await, vec![TagRelStatus::Hidden.id()]);
    assert_eq!(content_count(&pool, tag).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_close_records_reason(pool: PgPool) {
    let user = seed_user(&pool, "alice").await;
    let row = ContentRepo::create(&pool, ContentKind::Question, &new_content(user, "Close me"), &[], "")
        .await
        .unwrap();

    let reason = serde_json::json!({"close_type": 1, "close_msg": "off topic"});
    assert!(ContentRepo::close(&pool, ContentKind::Question, row.id, &reason).await.unwrap());

    let stored = ContentRepo::find_by_id(&pool, ContentKind::Question, row.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.content_status(), ContentStatus::Closed);
    assert_eq!(stored.close_reason, Some(reason));

    let (rows, _) = ContentRepo::page(&pool, ContentKind::Question, &newest_plan())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1, "closed items stay listed");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_set_status_on_missing_row(pool: PgPool) {
    let changed = ContentRepo::set_status(
        &pool,
        ContentKind::Article,
        12345,
        ContentStatus::Deleted,
        false,
        None,
    )
    .await
    .unwrap();
    assert!(!changed);
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pinned_items_sort_first(pool: PgPool) {
    let user = seed_user(&pool, "alice").await;
    let first = ContentRepo::create(&pool, ContentKind::Article, &new_content(user, "Older article"), &[], "")
        .await
        .unwrap();
    let second = ContentRepo::create(&pool, ContentKind::Article, &new_content(user, "Newer article"), &[], "")
        .await
        .unwrap();

    ContentRepo::set_display(&pool, ContentKind::Article, first.id, PinState::Pinned, ShowState::Shown, None)
        .await
        .unwrap();

    let (rows, total) = ContentRepo::page(&pool, ContentKind::Article, &newest_plan())
        .await
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(rows[0].id, first.id);
    assert_eq!(rows[1].id, second.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tag_filter_and_pagination(pool: PgPool) {
    let user = seed_user(&pool, "alice").await;
    let rust = seed_tag(&pool, "rust").await;
    let go = seed_tag(&pool, "go").await;
    for i in 0..3 {
        ContentRepo::create(&pool, ContentKind::Question, &new_content(user, &format!("Rust question {i}")), &[rust, go], "")
            .await
            .unwrap();
    }
    ContentRepo::create(&pool, ContentKind::Question, &new_content(user, "Go only question"), &[go], "")
        .await
        .unwrap();

    let plan = ListPlan::new(ListOrder::Newest, PageWindow::new(Some(1), Some(2)))
        .with_tags(vec![rust])
        .finish();
    let (rows, total) = ContentRepo::page(&pool, ContentKind::Question, &plan).await.unwrap();
    assert_eq!(total, 3);
    assert_eq!(rows.len(), 2);

    // Matching several tags must not duplicate rows.
    let plan = ListPlan::new(ListOrder::Newest, PageWindow::new(None, None))
        .with_tags(vec![rust, go])
        .finish();
    let (rows, total) = ContentRepo::page(&pool, ContentKind::Question, &plan).await.unwrap();
    assert_eq!(total, 4);
    assert_eq!(rows.len(), 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_owner_listing_can_include_hidden(pool: PgPool) {
    let user = seed_user(&pool, "alice").await;
    let row = ContentRepo::create(&pool, ContentKind::QuotePiece, &new_content(user, "A quote piece"), &[], "")
        .await
        .unwrap();
    ContentRepo::set_display(&pool, ContentKind::QuotePiece, row.id, PinState::Unpinned, ShowState::Hidden, None)
        .await
        .unwrap();

    let hidden_excluded = ListPlan::new(ListOrder::Newest, PageWindow::new(None, None))
        .with_user(Some(user), false)
        .finish();
    let (rows, _) = ContentRepo::page(&pool, ContentKind::QuotePiece, &hidden_excluded).await.unwrap();
    assert!(rows.is_empty());

    let hidden_included = ListPlan::new(ListOrder::Newest, PageWindow::new(None, None))
        .with_user(Some(user), true)
        .finish();
    let (rows, _) = ContentRepo::page(&pool, ContentKind::QuotePiece, &hidden_included).await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_hot_order_uses_stored_score(pool: PgPool) {
    let user = seed_user(&pool, "alice").await;
    let cold = ContentRepo::create(&pool, ContentKind::Question, &new_content(user, "Cold question"), &[], "")
        .await
        .unwrap();
    let hot = ContentRepo::create(&pool, ContentKind::Question, &new_content(user, "Hot question"), &[], "")
        .await
        .unwrap();
    ContentRepo::set_hot_score(&pool, ContentKind::Question, cold.id, 10).await.unwrap();
    ContentRepo::set_hot_score(&pool, ContentKind::Question, hot.id, 5000).await.unwrap();

    let plan = ListPlan::new(ListOrder::Hot, PageWindow::new(None, None)).finish();
    let (rows, _) = ContentRepo::page(&pool, ContentKind::Question, &plan).await.unwrap();
    assert_eq!(rows[0].id, hot.id);

    let stored = ContentRepo::find_by_id(&pool, ContentKind::Question, hot.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.updated_at, hot.updated_at, "hot score refresh leaves updated_at alone");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sitemap_rows_exclude_hidden_and_deleted(pool: PgPool) {
    let user = seed_user(&pool, "alice").await;
    let kept = ContentRepo::create(&pool, ContentKind::Article, &new_content(user, "Kept article"), &[], "")
        .await
        .unwrap();
    let hidden = ContentRepo::create(&pool, ContentKind::Article, &new_content(user, "Hidden article"), &[], "")
        .await
        .unwrap();
    let deleted = ContentRepo::create(&pool, ContentKind::Article, &new_content(user, "Deleted article"), &[], "")
        .await
        .unwrap();
    ContentRepo::set_display(&pool, ContentKind::Article, hidden.id, PinState::Unpinned, ShowState::Hidden, None)
        .await
        .unwrap();
    ContentRepo::set_status(&pool, ContentKind::Article, deleted.id, ContentStatus::Deleted, false, None)
        .await
        .unwrap();

    assert_eq!(ContentRepo::count_for_sitemap(&pool, ContentKind::Article).await.unwrap(), 1);
    let rows = ContentRepo::sitemap_rows(&pool, ContentKind::Article, 10, 0).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, kept.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_similar_matches_title_substring(pool: PgPool) {
    let user = seed_user(&pool, "alice").await;
    ContentRepo::create(&pool, ContentKind::Question, &new_content(user, "Borrow checker woes"), &[], "")
        .await
        .unwrap();
    ContentRepo::create(&pool, ContentKind::Question, &new_content(user, "Async runtimes"), &[], "")
        .await
        .unwrap();

    let rows = ContentRepo::similar(&pool, ContentKind::Question, "borrow", 5).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Borrow checker woes");

    let rows = ContentRepo::similar(&pool, ContentKind::Question, "100%", 5).await.unwrap();
    assert!(rows.is_empty());
}
