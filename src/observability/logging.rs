//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the process-wide `tracing` subscriber
//! - Pick pretty or JSON output from configuration
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured filter
//! - Installing twice is an error the caller sees, not a panic
//! - Events go to stderr; stdout belongs to the response body

use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

/// Install the global subscriber described by `config`.
pub fn init_logging(config: &LoggingConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.filter));
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Json => registry.with(fmt::layer().json().with_writer(std::io::stderr)).try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().with_writer(std::io::stderr)).try_init(),
    }
}
