//! Log records handed to sinks.

use std::error::Error;
use std::fmt;

use bytes::Bytes;
use http::{Request, Response};

use crate::level::Severity;
use crate::sink::{Sink, SinkError};

/// Structured context attached to every record.
#[derive(Clone, Copy)]
pub struct LogContext<'a> {
    pub request: &'a Request<Bytes>,
    pub response: Option<&'a Response<Bytes>>,
    pub reason: Option<&'a (dyn Error + 'static)>,
}

impl<'a> LogContext<'a> {
    pub fn request(request: &'a Request<Bytes>) -> Self {
        Self {
            request,
            response: None,
            reason: None,
        }
    }
}

impl fmt::Debug for LogContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogContext")
            .field("method", self.request.method())
            .field("uri", self.request.uri())
            .field("status", &self.response.map(|r| r.status()))
            .field("reason", &self.reason.map(|e| e.to_string()))
            .finish()
    }
}

/// A fully derived record. Built once, emitted once.
#[derive(Debug)]
pub struct LogRecord<'a> {
    pub level: Severity,
    pub message: String,
    pub context: LogContext<'a>,
}

impl LogRecord<'_> {
    pub fn emit(self, sink: &dyn Sink) -> Result<(), SinkError> {
        sink.log(self.level, &self.message, &self.context)
    }
}
