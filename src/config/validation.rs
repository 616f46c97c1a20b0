//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the message template and the log filter parse
//! - Validate value ranges (timeouts > 0)
//! - Detect conflicting logging modes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::{AppConfig, LogMode};
use crate::format::{MessageFormatter, TemplateError};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("middleware.format: {0}")]
    Template(TemplateError),

    #[error("logging.filter `{0}` is not a valid filter directive")]
    Filter(String),

    #[error("transport.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("middleware.suppress_duplicate_failure cannot be enabled in multi_phase mode")]
    SuppressInMultiPhase,

    #[error("middleware.request_level has no effect unless eager_request_logging is enabled")]
    RequestLevelWithoutRequestRecord,
}

/// Check everything serde cannot.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = MessageFormatter::named(&config.middleware.format) {
        errors.push(ValidationError::Template(e));
    }

    if EnvFilter::try_new(&config.logging.filter).is_err() {
        errors.push(ValidationError::Filter(config.logging.filter.clone()));
    }

    if config.transport.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeout_secs"));
    }
    if config.transport.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_timeout_secs"));
    }

    if config.middleware.mode == LogMode::MultiPhase
        && config.middleware.suppress_duplicate_failure == Some(true)
    {
        errors.push(ValidationError::SuppressInMultiPhase);
    }

    if config.middleware.mode == LogMode::Standard
        && !config.middleware.eager_request_logging
        && config.middleware.request_level.is_some()
    {
        errors.push(ValidationError::RequestLevelWithoutRequestRecord);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
