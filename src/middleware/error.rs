//! Errors raised on the logging path, and what the middleware needs from
//! downstream errors.

use std::error::Error;

use bytes::Bytes;
use http::Response;
use thiserror::Error;
use tower::BoxError;

use crate::format::FormatError;
use crate::sink::SinkError;
use crate::transport::TransportError;

/// The sink or formatter failed while logging a request.
///
/// Surfaces to the caller through the inner service's error type, in
/// place of the outcome being logged.
#[derive(Debug, Error)]
pub enum LoggingFailure {
    #[error("failed to write log record: {0}")]
    Sink(#[from] SinkError),

    #[error("failed to format log record: {0}")]
    Format(#[from] FormatError),
}

/// A downstream failure as seen by the logging middleware.
pub trait FailureReason {
    fn as_error(&self) -> &(dyn Error + 'static);

    /// The response that came with the failure, if the error carries one.
    fn response(&self) -> Option<&Response<Bytes>> {
        None
    }
}

impl FailureReason for BoxError {
    fn as_error(&self) -> &(dyn Error + 'static) {
        &**self
    }

    fn response(&self) -> Option<&Response<Bytes>> {
        self.downcast_ref::<TransportError>()
            .and_then(FailureReason::response)
    }
}

impl FailureReason for LoggingFailure {
    fn as_error(&self) -> &(dyn Error + 'static) {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, StatusCode, Uri};

    #[test]
    fn test_boxed_transport_error_exposes_response() {
        let mut response = Response::new(Bytes::from_static(b"oops"));
        *response.status_mut() = StatusCode::BAD_GATEWAY;
        let err: BoxError = Box::new(TransportError::Status {
            method: Method::GET,
            uri: Uri::from_static("http://example.com/"),
            response: Box::new(response),
        });

        assert_eq!(err.response().map(|r| r.status()), Some(StatusCode::BAD_GATEWAY));
    }

    #[test]
    fn test_other_boxed_errors_have_no_response() {
        let err: BoxError = "plain failure".into();
        assert!(err.response().is_none());
        assert_eq!(err.as_error().to_string(), "plain failure");
    }
}
