use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

/// How handler views are turned into responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Server-rendered HTML pages.
    Html,
    /// The raw view model as JSON (`{"template": .., "data": ..}`).
    Json,
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(RenderMode::Html),
            "json" => Ok(RenderMode::Json),
            other => Err(format!("unknown render mode '{other}' (expected html or json)")),
        }
    }
}

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
    /// Page output format (default: `html`).
    pub render_mode: RenderMode,
    /// The site's own domain; referers from it are not counted as view sources.
    pub site_domain: String,
    /// Words rejected in submitted forms, from comma-separated `SENSITIVE_WORDS`.
    pub sensitive_words: Vec<String>,
    /// Seconds between flushes of buffered view counts (default: `60`).
    pub view_flush_interval_secs: u64,
    /// Capacity of the per-user view record queue (default: `1024`).
    pub view_record_queue: usize,
    /// Number of tasks draining the view record queue (default: `2`).
    pub view_record_workers: usize,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                    |
    /// |----------------------------|----------------------------|
    /// | `HOST`                     | `0.0.0.0`                  |
    /// | `PORT`                     | `3000`                     |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                       |
    /// | `RENDER_MODE`              | `html`                     |
    /// | `SITE_DOMAIN`              | `localhost`                |
    /// | `SENSITIVE_WORDS`          | (empty)                    |
    /// | `VIEW_FLUSH_INTERVAL_SECS` | `60`                       |
    /// | `VIEW_RECORD_QUEUE`        | `1024`                     |
    /// | `VIEW_RECORD_WORKERS`      | `2`                        |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = env_parse("PORT", 3000);

        let cors_origins = env_list("CORS_ORIGINS", "http://localhost:5173");

        let request_timeout_secs: u64 = env_parse("REQUEST_TIMEOUT_SECS", 30);

        let render_mode = std::env::var("RENDER_MODE")
            .unwrap_or_else(|_| "html".into())
            .parse()
            .unwrap_or_else(|e| panic!("RENDER_MODE: {e}"));

        let site_domain = std::env::var("SITE_DOMAIN").unwrap_or_else(|_| "localhost".into());

        let sensitive_words = env_list("SENSITIVE_WORDS", "");

        let view_flush_interval_secs: u64 = env_parse("VIEW_FLUSH_INTERVAL_SECS", 60);
        assert!(
            view_flush_interval_secs > 0,
            "VIEW_FLUSH_INTERVAL_SECS must be positive"
        );

        let view_record_queue: usize = env_parse("VIEW_RECORD_QUEUE", 1024);
        assert!(view_record_queue > 0, "VIEW_RECORD_QUEUE must be positive");

        let view_record_workers: usize = env_parse("VIEW_RECORD_WORKERS", 2);
        assert!(view_record_workers > 0, "VIEW_RECORD_WORKERS must be positive");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            render_mode,
            site_domain,
            sensitive_words,
            view_flush_interval_secs,
            view_record_queue,
            view_record_workers,
            jwt,
        }
    }
}

/// Read and parse an env var, falling back to `default` when unset.
///
/// # Panics
///
/// Panics if the variable is set but does not parse.
fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} must be a valid value: {e}")),
        Err(_) => default,
    }
}

/// Split a comma-separated env var into trimmed, non-empty entries.
fn env_list(key: &str, default: &str) -> Vec<String> {
    std::env::var(key)
        .unwrap_or_else(|_| default.into())
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
