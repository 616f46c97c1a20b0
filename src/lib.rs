//! Outbound HTTP request/response logging middleware.
//!
//! # Architecture Overview
//!
//! ```text
//!  caller ──▶ ┌──────────────────────────────┐ ──▶ ┌────────────────┐
//!             │ middleware::Logger<S>        │     │ transport (S)  │
//!  caller ◀── │  request record (optional)   │ ◀── │ reqwest / any  │
//!             │  terminal record on complete │     │ tower Service  │
//!             └──────────────┬───────────────┘     └────────────────┘
//!                            │
//!             level::LevelPolicy → format::Formatter → sink::Sink
//! ```

pub mod config;
pub mod format;
pub mod level;
pub mod middleware;
pub mod observability;
pub mod sink;
pub mod transport;

pub use config::{AppConfig, ConfigError};
pub use format::{Formatter, MessageFormatter};
pub use level::{LevelOverride, LevelPolicy, Severity, StatusTable};
pub use middleware::{FailureReason, LogPolicy, Logger, LoggerLayer, LoggingFailure};
pub use sink::{LogContext, Sink, TracingSink};
pub use transport::{ReqwestTransport, RequestOptions, TransportError};
