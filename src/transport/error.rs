//! Transport error types.

use std::error::Error;

use bytes::Bytes;
use http::{Method, Response, Uri};
use thiserror::Error;

use crate::middleware::{FailureReason, LoggingFailure};

/// Errors returned by [`ReqwestTransport`](crate::transport::ReqwestTransport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// 4xx/5xx response while `http_errors` is on. Carries the response.
    #[error("`{method} {uri}` resulted in a `{}` response", .response.status())]
    Status {
        method: Method,
        uri: Uri,
        response: Box<Response<Bytes>>,
    },

    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("connection failed: {0}")]
    Connect(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// A logging layer above the transport failed.
    #[error(transparent)]
    Logging(#[from] LoggingFailure),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout(e)
        } else if e.is_connect() {
            TransportError::Connect(e)
        } else {
            TransportError::Request(e)
        }
    }
}

impl FailureReason for TransportError {
    fn as_error(&self) -> &(dyn Error + 'static) {
        self
    }

    fn response(&self) -> Option<&Response<Bytes>> {
        match self {
            TransportError::Status { response, .. } => Some(&**response),
            _ => None,
        }
    }
}
