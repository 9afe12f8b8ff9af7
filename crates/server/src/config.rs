//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `IPUFOOD_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `IPUFOOD_BASE_URL` - Public URL of the API
//!
//! ## Optional
//! - `IPUFOOD_HOST` - Bind address (default: 127.0.0.1)
//! - `IPUFOOD_PORT` - Listen port (default: 3000)
//! - `IPUFOOD_REPORT_UTC_OFFSET_HOURS` - Timezone used to bucket reports by weekday (default: -3)
//! - `IPUFOOD_TRUST_PROXY_HEADERS` - Take the client IP from `X-Forwarded-For` /
//!   `X-Real-IP` (default: false). Only enable behind a proxy that overwrites them.
//! - `IPUFOOD_LOG_JSON` - Emit JSON logs when set
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};

use chrono::FixedOffset;
use secrecy::SecretString;
use thiserror::Error;

const SECONDS_PER_HOUR: i32 = 60 * 60;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of the API
    pub base_url: String,
    /// Trust forwarded client IP headers (set only behind a reverse proxy)
    pub trust_proxy_headers: bool,
    /// Offset used when grouping orders by day of week
    pub report_offset: FixedOffset,
    /// Emit JSON logs instead of text
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g., "production")
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced by Sentry
    pub sentry_traces_sample_rate: f32,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, unparseable,
    /// or out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("IPUFOOD_DATABASE_URL")?;
        let host = get_env_or_default("IPUFOOD_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("IPUFOOD_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("IPUFOOD_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("IPUFOOD_PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("IPUFOOD_BASE_URL")?;
        let trust_proxy_headers = get_env_or_default("IPUFOOD_TRUST_PROXY_HEADERS", "false")
            .parse::<bool>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("IPUFOOD_TRUST_PROXY_HEADERS".to_string(), e.to_string())
            })?;
        let report_offset = parse_utc_offset(
            "IPUFOOD_REPORT_UTC_OFFSET_HOURS",
            &get_env_or_default("IPUFOOD_REPORT_UTC_OFFSET_HOURS", "-3"),
        )?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            trust_proxy_headers,
            report_offset,
            log_json: get_optional_env("IPUFOOD_LOG_JSON").is_some(),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: parse_rate("SENTRY_TRACES_SAMPLE_RATE", 0.1)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the API is served over HTTPS (controls secure cookies).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a sample rate in `0.0..=1.0`.
fn parse_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let Some(raw) = get_optional_env(key) else {
        return Ok(default);
    };
    let rate = raw
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ));
    }
    Ok(rate)
}

/// Parse a whole-hour UTC offset in `-12..=14`.
fn parse_utc_offset(key: &str, raw: &str) -> Result<FixedOffset, ConfigError> {
    let hours = raw
        .trim()
        .parse::<i32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(-12..=14).contains(&hours) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("offset must be between -12 and 14 hours (got {hours})"),
        ));
    }
    FixedOffset::east_opt(hours * SECONDS_PER_HOUR).ok_or_else(|| {
        ConfigError::InvalidEnvVar(key.to_string(), format!("invalid offset {hours}"))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    pub(crate) fn test_config() -> ServerConfig {
        ServerConfig {
            database_url: SecretString::from("postgres://localhost/ipufood_test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            trust_proxy_headers: false,
            report_offset: FixedOffset::west_opt(3 * SECONDS_PER_HOUR).unwrap(),
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        }
    }

    #[test]
    fn test_parse_utc_offset() {
        let offset = parse_utc_offset("TEST", "-3").unwrap();
        assert_eq!(offset.local_minus_utc(), -3 * SECONDS_PER_HOUR);
        assert!(parse_utc_offset("TEST", "15").is_err());
        assert!(parse_utc_offset("TEST", "brt").is_err());
    }

    #[test]
    fn test_socket_addr_and_security() {
        let config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
        assert!(!config.is_secure());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = test_config();
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("ipufood_test"));
    }
}

#[cfg(test)]
pub(crate) use tests::test_config;
