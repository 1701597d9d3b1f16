//! Application configuration loaded from environment variables.

use std::time::Duration;

use checkout::DEFAULT_MAX_CONCURRENT;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `HTTP_PORT` or `PORT`: listen port (default: `8080`)
/// - `APP_ENV`: deployment environment tag (default: `"dev"`)
/// - `RUST_LOG` or `LOG_LEVEL`: tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT`: `text` or `json` (default: `text`)
/// - `DATABASE_URL`: PostgreSQL URL; in-memory stores are used when unset
/// - `DB_MAX_CONNECTIONS`: pool size (default: `10`)
/// - `QUOTE_MAX_CONCURRENT`: product lookups in flight per quote (default: `10`)
/// - `REQUEST_TIMEOUT_MS`: deadline for every gateway call (default: `3000`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub app_env: String,
    pub log_level: String,
    pub log_format: LogFormat,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub quote_max_concurrent: usize,
    pub request_timeout: Duration,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            host: var("HOST").unwrap_or(defaults.host),
            port: var("HTTP_PORT")
                .or_else(|| var("PORT"))
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(defaults.port),
            app_env: var("APP_ENV").unwrap_or(defaults.app_env),
            log_level: var("RUST_LOG")
                .or_else(|| var("LOG_LEVEL"))
                .unwrap_or(defaults.log_level),
            log_format: var("LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or(defaults.log_format),
            database_url: var("DATABASE_URL"),
            db_max_connections: var("DB_MAX_CONNECTIONS")
                .and_then(|v| v.trim().parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.db_max_connections),
            quote_max_concurrent: var("QUOTE_MAX_CONCURRENT")
                .and_then(|v| v.trim().parse::<i64>().ok())
                .filter(|n| *n >= 1)
                .map(|n| usize::try_from(n).unwrap_or(usize::MAX))
                .unwrap_or(defaults.quote_max_concurrent),
            request_timeout: var("REQUEST_TIMEOUT_MS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_timeout),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            app_env: "dev".to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            database_url: None,
            db_max_connections: 10,
            quote_max_concurrent: DEFAULT_MAX_CONCURRENT,
            request_timeout: Duration::from_millis(3000),
        }
    }
}
