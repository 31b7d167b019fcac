use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for each background task (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// JWT verification settings.
    pub jwt: JwtConfig,
    /// Moderation knobs for content writes.
    pub content: ContentConfig,
    /// Background job scheduling.
    pub jobs: JobsConfig,
}

/// Moderation settings applied to create/edit/delete.
#[derive(Debug, Clone)]
pub struct ContentConfig {
    /// New content from non-staff users starts out pending.
    pub review_new_content: bool,
    /// Writes per action and per day a user may make before a captcha is
    /// required.
    pub captcha_free_actions: i64,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            review_new_content: false,
            captcha_free_actions: 10,
        }
    }
}

/// Whether and how often the server runs the hot-score and sitemap jobs
/// in-process. Deployments using the standalone worker turn this off.
#[derive(Debug, Clone)]
pub struct JobsConfig {
    pub run_background_jobs: bool,
    pub hot_score_interval_secs: u64,
    pub sitemap_interval_secs: u64,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            run_background_jobs: true,
            hot_score_interval_secs: answer_worker::hot_score::DEFAULT_INTERVAL_SECS,
            sitemap_interval_secs: answer_worker::sitemap::DEFAULT_INTERVAL_SECS,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                    |
    /// |---------------------------|----------------------------|
    /// | `HOST`                    | `0.0.0.0`                  |
    /// | `PORT`                    | `3000`                     |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`   | `30`                       |
    /// | `REVIEW_NEW_CONTENT`      | `false`                    |
    /// | `CAPTCHA_FREE_ACTIONS`    | `10`                       |
    /// | `RUN_BACKGROUND_JOBS`     | `true`                     |
    /// | `HOT_SCORE_INTERVAL_SECS` | `1800`                     |
    /// | `SITEMAP_INTERVAL_SECS`   | `3600`                     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let content_defaults = ContentConfig::default();
        let content = ContentConfig {
            review_new_content: env_flag("REVIEW_NEW_CONTENT", content_defaults.review_new_content),
            captcha_free_actions: std::env::var("CAPTCHA_FREE_ACTIONS")
                .map(|v| v.parse().expect("CAPTCHA_FREE_ACTIONS must be a valid i64"))
                .unwrap_or(content_defaults.captcha_free_actions),
        };

        let job_defaults = JobsConfig::default();
        let jobs = JobsConfig {
            run_background_jobs: env_flag("RUN_BACKGROUND_JOBS", job_defaults.run_background_jobs),
            hot_score_interval_secs: answer_worker::interval_from_env(
                "HOT_SCORE_INTERVAL_SECS",
                job_defaults.hot_score_interval_secs,
            )
            .as_secs(),
            sitemap_interval_secs: answer_worker::interval_from_env(
                "SITEMAP_INTERVAL_SECS",
                job_defaults.sitemap_interval_secs,
            )
            .as_secs(),
        };

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt,
            content,
            jobs,
        }
    }
}

/// Parse a boolean flag; `1`, `true`, `yes` and `on` enable it.
fn env_flag(var: &str, default: bool) -> bool {
    match std::env::var(var) {
        Ok(v) => parse_flag(&v),
        Err(_) => default,
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
