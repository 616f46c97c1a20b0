//! Log sink subsystem.
//!
//! # Data Flow
//! ```text
//! LogRecord (level, message, context)
//!     → Sink trait
//!         - tracing_sink.rs (TracingSink, events on the `tracing` dispatcher)
//!         - FnSink (any closure taking level, message, context)
//! ```
//!
//! # Design Decisions
//! - One method, one capability; closures are adapted, never inspected
//! - Sinks must be `Send + Sync`: one sink serves every in-flight request
//! - Sink errors are returned, not swallowed; the middleware propagates them

pub mod record;
pub mod tracing_sink;

use std::fmt;

use thiserror::Error;

use crate::level::Severity;

pub use record::{LogContext, LogRecord};
pub use tracing_sink::TracingSink;

/// Accepts finished log records.
pub trait Sink: Send + Sync {
    fn log(&self, level: Severity, message: &str, context: &LogContext<'_>) -> Result<(), SinkError>;
}

/// A sink failed to accept a record.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sink rejected record: {0}")]
    Rejected(String),
}

/// Adapts a plain closure to [`Sink`].
pub struct FnSink<F> {
    f: F,
}

impl<F> FnSink<F>
where
    F: Fn(Severity, &str, &LogContext<'_>) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Sink for FnSink<F>
where
    F: Fn(Severity, &str, &LogContext<'_>) + Send + Sync,
{
    fn log(&self, level: Severity, message: &str, context: &LogContext<'_>) -> Result<(), SinkError> {
        (self.f)(level, message, context);
        Ok(())
    }
}

impl<F> fmt::Debug for FnSink<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnSink")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::Request;
    use std::sync::Mutex;

    #[test]
    fn test_closure_sink_receives_record() {
        let seen = Mutex::new(Vec::new());
        let sink = FnSink::new(|level, message, context| {
            seen.lock()
                .unwrap()
                .push((level, message.to_string(), context.response.is_none()));
        });
        let request = Request::new(Bytes::new());

        let record = LogRecord {
            level: Severity::Info,
            message: "hello".into(),
            context: LogContext::request(&request),
        };
        record.emit(&sink).unwrap();

        assert_eq!(seen.into_inner().unwrap(), vec![(Severity::Info, "hello".to_string(), true)]);
    }
}
