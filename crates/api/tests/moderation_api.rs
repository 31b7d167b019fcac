//! HTTP integration tests for close/reopen, display operations, deletion,
//! the captcha gate and bookmarks.

mod common;

use std::sync::Arc;

use answer_api::services::captcha::{hash_code, DbCaptchaVerifier};
use answer_db::repositories::CaptchaRepo;
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::*;
use serde_json::json;
use sqlx::PgPool;

async fn tag_count(pool: &PgPool, slug: &str) -> i32 {
    sqlx::query_scalar("SELECT content_count FROM tags WHERE slug_name = $1")
        .bind(slug)
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Close / reopen
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_close_and_reopen(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let ada = seed_user(&pool, "ada", "user", 1).await;
    let closer = seed_user(&pool, "closer", "user", 2000).await;
    let id = create_item(&app, "question", &app.token(&ada), "Question to close", &["a"]).await;
    let uri = format!("{API}/question/status");
    let reason = json!({ "id": id, "close_type": 1, "close_msg": "duplicate" });

    let (status, _) = app.put_json(&uri, Some(&app.token(&ada)), reason.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let mut rx = app.activity_bus.subscribe();
    let (status, body) = app.put_json(&uri, Some(&app.token(&closer)), reason.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "closed");
    assert_eq!(body["data"]["changed"], true);

    let (_, body) = app.put_json(&uri, Some(&app.token(&closer)), reason).await;
    assert_eq!(body["data"]["changed"], false);

    let (_, body) = app.get(&format!("{API}/question/info?id={id}"), None).await;
    assert_eq!(body["data"]["close_reason"]["close_msg"], "duplicate");
    assert_eq!(body["data"]["operation"]["operation_type"], "closed");
    assert_eq!(body["data"]["operation"]["operation_msg"], "duplicate");

    // Closed items stay listed.
    let (_, body) = app.get(&format!("{API}/question/page"), None).await;
    assert_eq!(body["data"]["count"], 1);

    let reopen = format!("{API}/question/reopen");
    let (status, body) = app
        .put_json(&reopen, Some(&app.token(&closer)), json!({ "question_id": id }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "available");

    let (_, body) = app
        .put_json(&reopen, Some(&app.token(&closer)), json!({ "id": id }))
        .await;
    assert_eq!(body["data"]["changed"], false);

    assert_eq!(
        drain_activities(&mut rx),
        vec!["question.closed", "question.reopened"]
    );
}

// ---------------------------------------------------------------------------
// Pin / hide
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pin_and_hide_are_mutually_exclusive(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let ada = seed_user(&pool, "ada", "user", 1).await;
    let veteran = seed_user(&pool, "veteran", "user", 5000).await;
    let moderator = seed_user(&pool, "mod", "moderator", 1).await;
    let id = create_item(&app, "article", &app.token(&ada), "Article to moderate", &["news"]).await;
    let uri = format!("{API}/article/operation");
    let token = app.token(&moderator);

    // Pinning is staff only, whatever the rank.
    let (status, _) = app
        .put_json(&uri, Some(&app.token(&veteran)), json!({ "id": id, "operation": "pin" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = app.put_json(&uri, Some(&token), json!({ "id": id, "operation": "pin" })).await;
    assert_eq!(body["data"]["pin"], 2);
    assert_eq!(body["data"]["changed"], true);

    let (_, body) = app.put_json(&uri, Some(&token), json!({ "id": id, "operation": "hide" })).await;
    assert_eq!(body["data"]["changed"], false);
    assert_eq!(body["data"]["show"], 1);

    app.put_json(&uri, Some(&token), json!({ "id": id, "operation": "unpin" })).await;
    let (_, body) = app.put_json(&uri, Some(&token), json!({ "id": id, "operation": "hide" })).await;
    assert_eq!(body["data"]["show"], 2);
    assert_eq!(tag_count(&pool, "news").await, 0);

    let (_, body) = app.put_json(&uri, Some(&token), json!({ "id": id, "operation": "pin" })).await;
    assert_eq!(body["data"]["changed"], false);
    assert_eq!(body["data"]["pin"], 1);

    // Hidden from public listings, still on the owner's own page.
    let (_, body) = app.get(&format!("{API}/article/page"), None).await;
    assert_eq!(body["data"]["count"], 0);
    let (_, body) = app.get(&format!("{API}/article/page?username=ada"), None).await;
    assert_eq!(body["data"]["count"], 0);
    let (_, body) = app
        .get(&format!("{API}/article/page?username=ada"), Some(&app.token(&ada)))
        .await;
    assert_eq!(body["data"]["count"], 1);
    let (_, body) = app
        .get(&format!("{API}/personal/article/page?username=ada"), Some(&token))
        .await;
    assert_eq!(body["data"]["count"], 1);

    let (_, body) = app.put_json(&uri, Some(&token), json!({ "id": id, "operation": "show" })).await;
    assert_eq!(body["data"]["show"], 1);
    assert_eq!(tag_count(&pool, "news").await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_detail_actions_follow_state(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let ada = seed_user(&pool, "ada", "user", 1).await;
    let moderator = seed_user(&pool, "mod", "moderator", 1).await;
    let token = app.token(&moderator);
    let id = create_item(&app, "quote", &app.token(&ada), "A quotable sentence", &["q"]).await;

    let actions = |body: &serde_json::Value| -> Vec<String> {
        body["data"]["member_actions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["action"].as_str().unwrap().to_string())
            .collect()
    };

    let (_, body) = app.get(&format!("{API}/quote/info?id={id}"), Some(&token)).await;
    assert_eq!(actions(&body), vec!["report", "edit", "close", "pin", "hide", "delete"]);

    app.put_json(
        &format!("{API}/quote/operation"),
        Some(&token),
        json!({ "id": id, "operation": "pin" }),
    )
    .await;
    let (_, body) = app.get(&format!("{API}/quote/info?id={id}"), Some(&token)).await;
    assert_eq!(actions(&body), vec!["report", "edit", "close", "unpin", "delete"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_hidden_item_is_not_counted_after_edit_or_recover(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let ada = seed_user(&pool, "ada", "user", 1).await;
    let moderator = seed_user(&pool, "mod", "moderator", 1).await;
    let owner = app.token(&ada);
    let token = app.token(&moderator);
    let id = create_item(&app, "article", &owner, "Article to hide away", &["news"]).await;

    app.put_json(
        &format!("{API}/article/operation"),
        Some(&token),
        json!({ "id": id, "operation": "hide" }),
    )
    .await;
    assert_eq!(tag_count(&pool, "news").await, 0);

    let mut edit = new_post("Article to hide away, edited", &["news"]);
    edit["id"] = json!(id);
    let (status, body) = app.put_json(&format!("{API}/article"), Some(&owner), edit).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["show"], 2);
    assert_eq!(tag_count(&pool, "news").await, 0);

    app.delete_json(&format!("{API}/article"), Some(&owner), json!({ "id": id }))
        .await;
    let (_, body) = app
        .post_json(&format!("{API}/article/recover"), Some(&token), json!({ "id": id }))
        .await;
    assert_eq!(body["data"]["status"], "available");
    assert_eq!(body["data"]["show"], 2);
    assert_eq!(tag_count(&pool, "news").await, 0);
}

// ---------------------------------------------------------------------------
// Delete / recover
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_and_recover(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let ada = seed_user(&pool, "ada", "user", 1).await;
    let bob = seed_user(&pool, "bob", "user", 1).await;
    let moderator = seed_user(&pool, "mod", "moderator", 1).await;
    let id = create_item(&app, "quote_piece", &app.token(&ada), "The Art of Programming", &["books"]).await;
    let uri = format!("{API}/quote_piece");

    let (status, _) = app
        .delete_json(&uri, Some(&app.token(&bob)), json!({ "id": id }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let mut rx = app.activity_bus.subscribe();
    let (status, body) = app
        .delete_json(&uri, Some(&app.token(&ada)), json!({ "id": id }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "deleted");
    assert_eq!(tag_count(&pool, "books").await, 0);

    let (_, body) = app
        .delete_json(&uri, Some(&app.token(&ada)), json!({ "id": id }))
        .await;
    assert_eq!(body["data"]["changed"], false);

    let info = format!("{API}/quote_piece/info?id={id}");
    let (status, _) = app.get(&info, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = app.get(&info, Some(&app.token(&ada))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["operation"]["operation_type"], "deleted");

    // Deleted items cannot be edited.
    let mut edit = new_post("The Art of Computer Programming", &["books"]);
    edit["id"] = json!(id);
    let (status, _) = app.put_json(&uri, Some(&app.token(&ada)), edit).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let recover = format!("{API}/quote_piece/recover");
    let (status, _) = app
        .post_json(&recover, Some(&app.token(&ada)), json!({ "id": id }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .post_json(&recover, Some(&app.token(&moderator)), json!({ "id": id }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "available");
    assert_eq!(tag_count(&pool, "books").await, 1);

    let (_, body) = app
        .post_json(&recover, Some(&app.token(&moderator)), json!({ "id": id }))
        .await;
    assert_eq!(body["data"]["changed"], false);

    let (status, _) = app
        .post_json(&recover, Some(&app.token(&moderator)), json!({ "id": 999_999 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(
        drain_activities(&mut rx),
        vec!["quote_piece.deleted", "quote_piece.undeleted"]
    );
}

// ---------------------------------------------------------------------------
// Captcha gate
// ---------------------------------------------------------------------------

fn captcha_config(free_actions: i64) -> answer_api::config::ServerConfig {
    let mut config = test_config();
    config.content.captcha_free_actions = free_actions;
    config
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_captcha_required_past_quota(pool: PgPool) {
    let app = build_test_app_with(pool.clone(), captcha_config(1), Arc::new(FixedCaptcha("1234")));
    let ada = seed_user(&pool, "ada", "user", 1).await;
    let token = app.token(&ada);
    let uri = format!("{API}/question");

    // The first write of the day is free.
    create_item(&app, "question", &token, "First free question", &["a"]).await;

    let (status, body) = app
        .post_json(&uri, Some(&token), new_post("Second question today", &["a"]))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"][0]["error_field"], "captcha_code");

    let mut wrong = new_post("Second question today", &["a"]);
    wrong["captcha_id"] = json!("c1");
    wrong["captcha_code"] = json!("0000");
    let (status, body) = app.post_json(&uri, Some(&token), wrong).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"][0]["error_field"], "captcha_code");

    let mut right = new_post("Second question today", &["a"]);
    right["captcha_id"] = json!("c1");
    right["captcha_code"] = json!("1234");
    let (status, _) = app.post_json(&uri, Some(&token), right).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admins_skip_captcha(pool: PgPool) {
    let app = build_test_app_with(pool.clone(), captcha_config(0), Arc::new(FixedCaptcha("1234")));
    let admin = seed_user(&pool, "root", "admin", 1).await;
    create_item(&app, "article", &app.token(&admin), "Admin announcement", &["news"]).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stored_captcha_is_single_use(pool: PgPool) {
    let app = build_test_app_with(
        pool.clone(),
        captcha_config(0),
        Arc::new(DbCaptchaVerifier::new(pool.clone())),
    );
    let ada = seed_user(&pool, "ada", "user", 1).await;
    let token = app.token(&ada);
    CaptchaRepo::create(&pool, "cap-1", &hash_code("AbCd"), Utc::now() + Duration::minutes(5))
        .await
        .unwrap();

    let mut body = new_post("Captcha protected question", &["a"]);
    body["captcha_id"] = json!("cap-1");
    body["captcha_code"] = json!("abcd");
    let (status, _) = app
        .post_json(&format!("{API}/question"), Some(&token), body.clone())
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app.post_json(&format!("{API}/question"), Some(&token), body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Bookmarks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_collection_switch_and_page(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let ada = seed_user(&pool, "ada", "user", 1).await;
    let bob = seed_user(&pool, "bob", "user", 1).await;
    let first = create_item(&app, "article", &app.token(&ada), "First article here", &["a"]).await;
    let second = create_item(&app, "article", &app.token(&ada), "Second article here", &["a"]).await;
    let token = app.token(&bob);
    let switch = format!("{API}/collection/switch");

    for id in [first, second] {
        let (status, body) = app
            .post_json(
                &switch,
                Some(&token),
                json!({ "object_type": "article", "object_id": id, "bookmark": true }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["collection_count"], 1);
    }

    let (_, body) = app
        .get(&format!("{API}/article/info?id={first}"), Some(&token))
        .await;
    assert_eq!(body["data"]["collected"], true);
    assert_eq!(body["data"]["collection_count"], 1);

    let page = format!("{API}/personal/article/collection/page");
    let (_, body) = app.get(&page, Some(&token)).await;
    assert_eq!(body["data"]["count"], 2);
    assert_eq!(body["data"]["list"][0]["id"], second);

    let (_, body) = app
        .post_json(
            &switch,
            Some(&token),
            json!({ "object_type": "article", "object_id": second, "bookmark": false }),
        )
        .await;
    assert_eq!(body["data"]["collection_count"], 0);
    let (_, body) = app.get(&page, Some(&token)).await;
    assert_eq!(body["data"]["count"], 1);

    let (status, _) = app
        .post_json(
            &switch,
            Some(&token),
            json!({ "object_type": "article", "object_id": 999_999, "bookmark": true }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get(&page, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
