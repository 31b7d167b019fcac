#![allow(dead_code)]

use std::sync::Arc;

use answer_api::auth::jwt::{generate_access_token, JwtConfig};
use answer_api::config::{ContentConfig, JobsConfig, ServerConfig};
use answer_api::router::build_app_router;
use answer_api::services::captcha::{CaptchaVerifier, DbCaptchaVerifier};
use answer_api::state::AppState;
use answer_db::models::user::{CreateUser, User};
use answer_db::repositories::UserRepo;
use answer_events::ActivityBus;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

pub const API: &str = "/answer/api/v1";
pub const ADMIN_API: &str = "/answer/admin/api";

/// Build a test `ServerConfig` with safe defaults. Background jobs are off
/// and every user gets plenty of captcha-free writes.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            access_token_expiry_mins: 15,
        },
        content: ContentConfig {
            review_new_content: false,
            captcha_free_actions: 1000,
        },
        jobs: JobsConfig {
            run_background_jobs: false,
            ..JobsConfig::default()
        },
    }
}

/// Accepts exactly one code for any captcha id.
pub struct FixedCaptcha(pub &'static str);

#[async_trait]
impl CaptchaVerifier for FixedCaptcha {
    async fn verify(&self, _captcha_id: &str, code: &str) -> Result<bool, sqlx::Error> {
        Ok(code == self.0)
    }
}

/// The router under test plus handles tests inspect directly.
pub struct TestApp {
    pub router: Router,
    pub activity_bus: Arc<ActivityBus>,
    pub config: ServerConfig,
}

/// Full middleware stack with the database-backed captcha verifier.
pub fn build_test_app(pool: PgPool) -> TestApp {
    let captcha = Arc::new(DbCaptchaVerifier::new(pool.clone()));
    build_test_app_with(pool, test_config(), captcha)
}

pub fn build_test_app_with(
    pool: PgPool,
    config: ServerConfig,
    captcha: Arc<dyn CaptchaVerifier>,
) -> TestApp {
    let activity_bus = Arc::new(ActivityBus::default());
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        activity_bus: Arc::clone(&activity_bus),
        captcha,
    };
    TestApp {
        router: build_app_router(state, &config),
        activity_bus,
        config,
    }
}

impl TestApp {
    pub fn token(&self, user: &User) -> String {
        generate_access_token(user.id, &user.role, &self.config.jwt).unwrap()
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post_json(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put_json(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete_json(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, token, Some(body)).await
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, body_json(response.into_body()).await)
    }
}

/// Collect a response body as JSON (`Value::Null` when empty).
pub async fn body_json(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    }
}

pub async fn seed_user(pool: &PgPool, username: &str, role: &str, rank: i32) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            display_name: username.to_string(),
            role: role.to_string(),
            rank,
        },
    )
    .await
    .unwrap()
}

/// A minimal valid create payload.
pub fn new_post(title: &str, tags: &[&str]) -> Value {
    serde_json::json!({
        "title": title,
        "content": "Body text long enough to pass validation.",
        "tags": tags.iter().map(|t| serde_json::json!({ "slug_name": t })).collect::<Vec<_>>(),
    })
}

/// Create an item through the API and return its id.
pub async fn create_item(app: &TestApp, kind: &str, token: &str, title: &str, tags: &[&str]) -> i64 {
    let (status, body) = app
        .post_json(&format!("{API}/{kind}"), Some(token), new_post(title, tags))
        .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body["data"]["id"].as_i64().unwrap()
}

/// Activity types published since `rx` subscribed.
pub fn drain_activities(rx: &mut tokio::sync::broadcast::Receiver<answer_events::ActivityEvent>) -> Vec<String> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        out.push(event.activity_type);
    }
    out
}
