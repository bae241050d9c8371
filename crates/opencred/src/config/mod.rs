use std::env;
use std::fmt;
use std::time::Duration;

use url::Url;

use crate::lending::tracking::{FailurePolicy, PollPolicy};

/// Distinguishes runtime behavior for different stages of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the client.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub backend: BackendConfig,
    pub polling: PollingConfig,
    pub session: SessionConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let raw_url =
            env::var("OPENCRED_API_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());
        let base_url = parse_base_url(&raw_url)?;

        let timeout_secs = parse_var("OPENCRED_REQUEST_TIMEOUT_SECS", 10u64)?;
        let interval_ms = parse_var("OPENCRED_POLL_INTERVAL_MS", 1000u64)?;
        if interval_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "OPENCRED_POLL_INTERVAL_MS",
                reason: "must be greater than zero",
            });
        }

        let max_failures = match env::var("OPENCRED_POLL_MAX_FAILURES") {
            Ok(raw) => Some(raw.trim().parse::<u32>().map_err(|_| ConfigError::Invalid {
                key: "OPENCRED_POLL_MAX_FAILURES",
                reason: "must be a non-negative integer",
            })?),
            Err(_) => None,
        };
        let max_backoff_ms = parse_var("OPENCRED_POLL_MAX_BACKOFF_MS", 30_000u64)?;
        let session_ttl = parse_var("OPENCRED_SESSION_TTL_MINS", 30i64)?;
        let session_ttl = chrono::Duration::try_minutes(session_ttl)
            .filter(|ttl| *ttl > chrono::Duration::zero())
            .ok_or(ConfigError::Invalid {
                key: "OPENCRED_SESSION_TTL_MINS",
                reason: "must be a positive number of minutes",
            })?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            backend: BackendConfig {
                base_url,
                request_timeout: Duration::from_secs(timeout_secs),
            },
            polling: PollingConfig {
                interval: Duration::from_millis(interval_ms),
                max_consecutive_failures: max_failures,
                max_backoff: Duration::from_millis(max_backoff_ms),
            },
            session: SessionConfig {
                ttl: session_ttl,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Where and how to reach the loan service.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: Url,
    pub request_timeout: Duration,
}

impl BackendConfig {
    pub fn set_base_url(&mut self, raw: &str) -> Result<(), ConfigError> {
        self.base_url = parse_base_url(raw)?;
        Ok(())
    }
}

/// Status polling cadence and failure tolerance.
#[derive(Debug, Clone)]
pub struct PollingConfig {
    pub interval: Duration,
    /// `None` keeps polling through failures indefinitely.
    pub max_consecutive_failures: Option<u32>,
    pub max_backoff: Duration,
}

impl PollingConfig {
    pub fn policy(&self) -> PollPolicy {
        let failures = match self.max_consecutive_failures {
            Some(max_consecutive_failures) => FailurePolicy::Bounded {
                max_consecutive_failures,
                max_interval: self.max_backoff.max(self.interval),
            },
            None => FailurePolicy::Tolerate,
        };

        PollPolicy {
            interval: self.interval,
            failures,
            ..PollPolicy::default()
        }
    }
}

/// Lifetime of assistant-to-form hand-off sessions.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub ttl: chrono::Duration,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidUrl {
        value: String,
        source: url::ParseError,
    },
    UnsupportedScheme {
        scheme: String,
    },
    Invalid {
        key: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidUrl { value, .. } => {
                write!(f, "OPENCRED_API_URL '{value}' is not a valid URL")
            }
            ConfigError::UnsupportedScheme { scheme } => {
                write!(f, "OPENCRED_API_URL must use http or https, found '{scheme}'")
            }
            ConfigError::Invalid { key, reason } => write!(f, "{key} {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidUrl { source, .. } => Some(source),
            ConfigError::UnsupportedScheme { .. } | ConfigError::Invalid { .. } => None,
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl {
        value: raw.to_string(),
        source,
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme {
            scheme: other.to_string(),
        }),
    }
}

fn parse_var<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
            key,
            reason: "must be a valid number",
        }),
        Err(_) => Ok(default),
    }
}
