//! Per-request transport options.

use std::time::Duration;

/// Options for a single request, carried as a request extension.
///
/// ```ignore
/// request.extensions_mut().insert(RequestOptions {
///     timeout: Some(Duration::from_secs(2)),
///     http_errors: Some(false),
/// });
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Overrides the client's total timeout.
    pub timeout: Option<Duration>,

    /// Overrides the transport's `http_errors` setting.
    pub http_errors: Option<bool>,
}
