//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the logger.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::level::{LevelPolicy, Severity, StatusTable};
use crate::middleware::{LogPolicy, RequestPhase};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Logging middleware behavior.
    pub middleware: MiddlewareConfig,

    /// The process's own `tracing` subscriber.
    pub logging: LoggingConfig,

    /// HTTP transport settings.
    pub transport: TransportConfig,
}

/// Which records a request produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogMode {
    /// One terminal record, plus an optional eager request record.
    #[default]
    Standard,
    /// Always a request record and a terminal record.
    MultiPhase,
}

/// Logging middleware configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MiddlewareConfig {
    pub mode: LogMode,

    /// Log the request before it is sent (standard mode only).
    pub eager_request_logging: bool,

    /// Skip the failure record when the request was already logged.
    /// Unset picks the mode's default: on for standard, off for multi-phase.
    pub suppress_duplicate_failure: Option<bool>,

    /// Status code to severity table.
    pub status_table: StatusTable,

    /// Constant level for every record, overriding the status table.
    pub level: Option<Severity>,

    /// Fixed level for the request record (multi-phase, or eager standard mode).
    pub request_level: Option<Severity>,

    /// Preset name (`clf`, `debug`, `short`) or a `{placeholder}` template.
    pub format: String,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            mode: LogMode::Standard,
            eager_request_logging: false,
            suppress_duplicate_failure: None,
            status_table: StatusTable::Coarse,
            level: None,
            request_level: None,
            format: "clf".to_string(),
        }
    }
}

impl MiddlewareConfig {
    /// Phase behavior described by this section.
    pub fn log_policy(&self) -> LogPolicy {
        match self.mode {
            LogMode::MultiPhase => LogPolicy::multi_phase()
                .with_request_phase(RequestPhase::Fixed(self.request_level.unwrap_or(Severity::Debug)))
                .with_suppress_duplicate_failure(self.suppress_duplicate_failure.unwrap_or(false)),
            LogMode::Standard => {
                let phase = match (self.eager_request_logging, self.request_level) {
                    (false, _) => RequestPhase::Off,
                    (true, None) => RequestPhase::Eager,
                    (true, Some(level)) => RequestPhase::Fixed(level),
                };
                LogPolicy::outcome_only()
                    .with_request_phase(phase)
                    .with_suppress_duplicate_failure(self.suppress_duplicate_failure.unwrap_or(true))
            }
        }
    }

    /// Severity rules described by this section.
    pub fn level_policy(&self) -> LevelPolicy {
        LevelPolicy::default()
            .with_table(self.status_table)
            .with_level(self.level)
    }
}

/// Output format of the process's own log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Subscriber configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, used when `RUST_LOG` is unset.
    pub filter: String,

    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// HTTP transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Total request timeout in seconds.
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Treat 4xx/5xx responses as failures carrying the response.
    pub http_errors: bool,

    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 5,
            http_errors: true,
            user_agent: concat!("reqlog/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
