//! Periodic jobs for the content platform.
//!
//! Each module exposes a one-shot pass (used by tests and the admin tools)
//! and a `run` loop intended to be spawned via `tokio::spawn`. Loops accept a
//! [`CancellationToken`](tokio_util::sync::CancellationToken) for graceful
//! shutdown.

pub mod hot_score;
pub mod sitemap;

use std::time::Duration;

/// Read an interval in seconds from the environment, falling back to
/// `default_secs` when unset or unparseable.
pub fn interval_from_env(var: &str, default_secs: u64) -> Duration {
    let secs = std::env::var(var)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|&s| s > 0)
        .unwrap_or(default_secs);
    Duration::from_secs(secs)
}
