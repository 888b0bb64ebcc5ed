use std::str::FromStr;
use std::time::Duration;

use labelbase_core::retry::{RetryPolicy, DEFAULT_DELAY, DEFAULT_JITTER, DEFAULT_MAX_ATTEMPTS};
use labelbase_gemini::GeminiConfig;
use labelbase_youtube::YouTubeConfig;

/// Errors raised while loading [`ServerConfig`] from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Server configuration loaded from environment variables.
///
/// Everything except the database URL and the two provider API keys has a
/// default suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Postgres connection string.
    pub database_url: String,
    /// Pool size (default: `10`).
    pub db_max_connections: u32,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `120`).
    pub request_timeout_secs: u64,
    pub youtube: YouTubeConfig,
    pub gemini: GeminiConfig,
    /// Retry bound and backoff for the metadata fetch.
    pub metadata_retry: RetryPolicy,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                                      |
    /// |----------------------------|----------------------------------------------|
    /// | `HOST`                     | `0.0.0.0`                                    |
    /// | `PORT`                     | `8000`                                       |
    /// | `DATABASE_URL`             | required                                     |
    /// | `DB_MAX_CONNECTIONS`       | `10`                                         |
    /// | `CORS_ORIGINS`             | `http://localhost:3000`                      |
    /// | `REQUEST_TIMEOUT_SECS`     | `120`                                        |
    /// | `GOOGLE_API_KEY`           | required                                     |
    /// | `GEMINI_MODEL`             | `gemini-2.0-flash`                           |
    /// | `GEMINI_BASE_URL`          | `https://generativelanguage.googleapis.com`  |
    /// | `YOUTUBE_API_KEY`          | required                                     |
    /// | `YOUTUBE_BASE_URL`         | `https://www.googleapis.com/youtube/v3`      |
    /// | `METADATA_MAX_ATTEMPTS`    | `3`                                          |
    /// | `METADATA_RETRY_DELAY_MS`  | `1000`                                       |
    /// | `METADATA_RETRY_JITTER_MS` | `250`                                        |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| var(name).ok_or(ConfigError::Missing(name));

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or(&var, "PORT", 8000u16)?;
        let database_url = required("DATABASE_URL")?;
        let db_max_connections = parse_or(&var, "DB_MAX_CONNECTIONS", 10u32)?;

        let cors_origins: Vec<String> = var("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = parse_or(&var, "REQUEST_TIMEOUT_SECS", 120u64)?;

        let mut gemini = GeminiConfig::new(required("GOOGLE_API_KEY")?);
        if let Some(model) = var("GEMINI_MODEL") {
            gemini.model = model;
        }
        if let Some(base_url) = var("GEMINI_BASE_URL") {
            gemini.base_url = base_url;
        }

        let mut youtube = YouTubeConfig::new(required("YOUTUBE_API_KEY")?);
        if let Some(base_url) = var("YOUTUBE_BASE_URL") {
            youtube.base_url = base_url;
        }

        let metadata_retry = RetryPolicy::new(
            parse_or(&var, "METADATA_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?,
            Duration::from_millis(parse_or(
                &var,
                "METADATA_RETRY_DELAY_MS",
                DEFAULT_DELAY.as_millis() as u64,
            )?),
            Duration::from_millis(parse_or(
                &var,
                "METADATA_RETRY_JITTER_MS",
                DEFAULT_JITTER.as_millis() as u64,
            )?),
        );

        Ok(Self {
            host,
            port,
            database_url,
            db_max_connections,
            cors_origins,
            request_timeout_secs,
            youtube,
            gemini,
            metadata_retry,
        })
    }
}

fn parse_or<T, F>(var: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
