//! Formatter capability and the closure adapter.

use std::error::Error;
use std::fmt;

use bytes::Bytes;
use http::{Request, Response};
use thiserror::Error;

/// Turns a request, its response (if any) and a failure reason (if any)
/// into a log message.
pub trait Formatter: Send + Sync {
    fn format(
        &self,
        request: &Request<Bytes>,
        response: Option<&Response<Bytes>>,
        reason: Option<&(dyn Error + 'static)>,
    ) -> Result<String, FormatError>;
}

/// A formatter could not produce a message.
#[derive(Debug, Error)]
#[error("message formatting failed: {0}")]
pub struct FormatError(pub String);

impl FormatError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Adapts a plain closure to [`Formatter`].
pub struct FnFormatter<F> {
    f: F,
}

impl<F> FnFormatter<F>
where
    F: Fn(&Request<Bytes>, Option<&Response<Bytes>>, Option<&(dyn Error + 'static)>) -> String
        + Send
        + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Formatter for FnFormatter<F>
where
    F: Fn(&Request<Bytes>, Option<&Response<Bytes>>, Option<&(dyn Error + 'static)>) -> String
        + Send
        + Sync,
{
    fn format(
        &self,
        request: &Request<Bytes>,
        response: Option<&Response<Bytes>>,
        reason: Option<&(dyn Error + 'static)>,
    ) -> Result<String, FormatError> {
        Ok((self.f)(request, response, reason))
    }
}

impl<F> fmt::Debug for FnFormatter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnFormatter")
    }
}
