use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use answer_worker::{hot_score, interval_from_env, sitemap};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "answer_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = answer_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    answer_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Worker connected to database");

    let cancel = CancellationToken::new();

    let hot_handle = tokio::spawn(hot_score::run(
        pool.clone(),
        interval_from_env("HOT_SCORE_INTERVAL_SECS", hot_score::DEFAULT_INTERVAL_SECS),
        cancel.clone(),
    ));
    let sitemap_handle = tokio::spawn(sitemap::run(
        pool,
        interval_from_env("SITEMAP_INTERVAL_SECS", sitemap::DEFAULT_INTERVAL_SECS),
        cancel.clone(),
    ));

    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl-C handler");
    tracing::info!("Received SIGINT (Ctrl-C), stopping jobs");

    cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), hot_handle).await;
    let _ = tokio::time::timeout(Duration::from_secs(5), sitemap_handle).await;
    tracing::info!("Worker stopped");
}
