//! Sink emitting records as `tracing` events.

use crate::level::Severity;
use crate::sink::{LogContext, Sink, SinkError};

macro_rules! record_event {
    ($severity:expr, $($fields:tt)+) => {
        match $severity {
            Severity::Debug => tracing::debug!($($fields)+),
            Severity::Info | Severity::Notice => tracing::info!($($fields)+),
            Severity::Warning => tracing::warn!($($fields)+),
            Severity::Error | Severity::Critical | Severity::Alert | Severity::Emergency => {
                tracing::error!($($fields)+)
            }
        }
    };
}

/// Default sink: one `tracing` event per record.
///
/// `tracing` has no notice level and nothing above error, so NOTICE is
/// emitted at INFO and CRITICAL/ALERT/EMERGENCY at ERROR. The original
/// severity is kept in the `severity` field.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl Sink for TracingSink {
    fn log(&self, level: Severity, message: &str, context: &LogContext<'_>) -> Result<(), SinkError> {
        let method = context.request.method();
        let uri = context.request.uri();
        let status = context.response.map(|r| r.status().as_u16());
        let error = context.reason.map(|e| e.to_string());

        record_event!(
            level,
            severity = %level,
            method = %method,
            uri = %uri,
            status,
            error = error.as_deref(),
            "{}",
            message
        );
        Ok(())
    }
}
