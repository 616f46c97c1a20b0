//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use http::{Request, Response, StatusCode};
use tower::{service_fn, BoxError, Service};

use request_logger::level::Severity;
use request_logger::sink::{LogContext, Sink, SinkError};
use request_logger::TransportError;

/// Message template used by most tests: predictable, no timestamps.
pub const TEMPLATE: &str = "{method} {uri} {code} {error}";

/// One record as seen by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub level: Severity,
    pub message: String,
    pub status: Option<u16>,
    pub reason: Option<String>,
}

/// Sink that keeps every record in memory. Clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingSink {
    entries: Arc<Mutex<Vec<Entry>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn levels(&self) -> Vec<Severity> {
        self.entries().into_iter().map(|e| e.level).collect()
    }
}

impl Sink for RecordingSink {
    fn log(&self, level: Severity, message: &str, context: &LogContext<'_>) -> Result<(), SinkError> {
        self.entries.lock().unwrap().push(Entry {
            level,
            message: message.to_string(),
            status: context.response.map(|r| r.status().as_u16()),
            reason: context.reason.map(|e| e.to_string()),
        });
        Ok(())
    }
}

/// Sink that rejects every record.
pub struct FailingSink;

impl Sink for FailingSink {
    fn log(&self, _level: Severity, _message: &str, _context: &LogContext<'_>) -> Result<(), SinkError> {
        Err(SinkError::Rejected("disk full".into()))
    }
}

pub fn get(uri: &str) -> Request<Bytes> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Bytes::new())
        .unwrap()
}

pub fn response(status: u16, body: &'static str) -> Response<Bytes> {
    let mut response = Response::new(Bytes::from_static(body.as_bytes()));
    *response.status_mut() = StatusCode::from_u16(status).unwrap();
    response
}

/// Transport answering every request with `status` and `body`.
pub fn respond(
    status: u16,
    body: &'static str,
) -> impl Service<Request<Bytes>, Response = Response<Bytes>, Error = BoxError, Future: Send> + Clone {
    service_fn(move |_request: Request<Bytes>| async move {
        Ok::<_, BoxError>(response(status, body))
    })
}

/// Transport failing every request with a plain error.
pub fn fail_with(
    message: &'static str,
) -> impl Service<Request<Bytes>, Response = Response<Bytes>, Error = BoxError> + Clone {
    service_fn(move |_request: Request<Bytes>| async move {
        Err::<Response<Bytes>, BoxError>(message.into())
    })
}

/// Transport failing every request with an error carrying a response.
pub fn fail_with_status(
    status: u16,
    body: &'static str,
) -> impl Service<Request<Bytes>, Response = Response<Bytes>, Error = BoxError> + Clone {
    service_fn(move |request: Request<Bytes>| async move {
        Err::<Response<Bytes>, BoxError>(Box::new(TransportError::Status {
            method: request.method().clone(),
            uri: request.uri().clone(),
            response: Box::new(response(status, body)),
        }))
    })
}

/// Error of a transport whose request was abandoned before a response arrived.
#[derive(Debug, thiserror::Error)]
#[error("request cancelled")]
pub struct Cancelled;

/// Transport cancelling every request.
pub fn cancelled(
) -> impl Service<Request<Bytes>, Response = Response<Bytes>, Error = BoxError> + Clone {
    service_fn(|_request: Request<Bytes>| async move {
        Err::<Response<Bytes>, BoxError>(Box::new(Cancelled))
    })
}

/// Transport answering 200 and counting how often it was called.
pub fn counting(
    calls: Arc<AtomicUsize>,
) -> impl Service<Request<Bytes>, Response = Response<Bytes>, Error = BoxError> + Clone {
    service_fn(move |_request: Request<Bytes>| {
        calls.fetch_add(1, Ordering::SeqCst);
        async move { Ok::<_, BoxError>(response(200, "counted")) }
    })
}
