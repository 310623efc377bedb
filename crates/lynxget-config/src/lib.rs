//! Environment variable loading for the `lynxget` CLI (spec.md §6), grounded
//! on `riptide-config::env::EnvConfigLoader`'s get/get_bool/get_optional
//! pattern, trimmed to the handful of variables this CLI actually reads.

use std::env;
use std::str::FromStr;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnvError {
    #[error("invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl FromStr for LogLevel {
    type Err = EnvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "fatal" => Ok(LogLevel::Fatal),
            other => Err(EnvError::InvalidValue { var: "LOG_LEVEL".to_string(), reason: format!("unknown level {other:?}") }),
        }
    }
}

impl LogLevel {
    /// `fatal` has no `tracing` equivalent; it maps to `error` since that is
    /// the most severe level `tracing_subscriber::EnvFilter` understands.
    pub fn as_tracing_filter(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error | LogLevel::Fatal => "error",
        }
    }
}

/// Everything the `lynxget` binary needs from the environment, loaded once at
/// startup.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    pub tls_preset: Option<String>,
    pub log_level: LogLevel,
    pub pretty_logs: bool,
    pub telemetry_db_path: Option<String>,
    pub record_html: bool,
    pub cookie_file: Option<String>,
    pub e2e_fixtures_dir: Option<String>,
}

fn get_bool(var: &str) -> bool {
    env::var(var).map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes" | "on")).unwrap_or(false)
}

impl RuntimeConfig {
    /// Reads `LYNXGET_PRESET`, `LOG_LEVEL`, `LYNXGET_ENV` (pretty logs when
    /// set to anything other than `production`), `RECORD_E2E_DB`,
    /// `RECORD_HTML`, `AGENT_FETCH_COOKIE_FILE`, `AGENT_FETCH_E2E_FIXTURES`.
    /// Never fails: an invalid `LOG_LEVEL` falls back to `info` with a
    /// warning rather than aborting startup.
    pub fn from_env() -> Self {
        let log_level = env::var("LOG_LEVEL")
            .ok()
            .and_then(|raw| match raw.parse::<LogLevel>() {
                Ok(level) => Some(level),
                Err(err) => {
                    tracing::warn!(value = %raw, error = %err, "invalid LOG_LEVEL, defaulting to info");
                    None
                }
            })
            .unwrap_or_default();

        let pretty_logs = env::var("LYNXGET_ENV").map(|v| v.to_lowercase() != "production").unwrap_or(true);

        Self {
            tls_preset: env::var("LYNXGET_PRESET").ok(),
            log_level,
            pretty_logs,
            telemetry_db_path: env::var("RECORD_E2E_DB").ok(),
            record_html: get_bool("RECORD_HTML"),
            cookie_file: env::var("AGENT_FETCH_COOKIE_FILE").ok(),
            e2e_fixtures_dir: env::var("AGENT_FETCH_E2E_FIXTURES").ok(),
        }
    }
}
