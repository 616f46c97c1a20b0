//! Request/response logging middleware.
//!
//! # Data Flow
//! ```text
//! Logger::call(request)
//!     → policy.rs: request record? ──yes──▶ format + sink (synchronous)
//!     → inner.call(request) → ResponseFuture
//!
//! ResponseFuture::poll
//!     → inner future resolves
//!         Ok(response)  → level(Success) → format + sink → Ok(response)
//!         Err(reason)   → suppressed? ──no──▶ level(Failure) → format + sink
//!                       → Err(reason)
//! ```
//!
//! # Design Decisions
//! - Same `Response` and `Error` as the wrapped service, so layers stack
//! - At most one request record and one terminal record per call
//! - Logging errors are never swallowed; they reach the caller

pub mod error;
pub mod layer;
pub mod policy;
pub mod service;

pub use error::{FailureReason, LoggingFailure};
pub use layer::{LoggerLayer, LoggerLayerBuilder};
pub use policy::{LogPolicy, RequestPhase};
pub use service::{Logger, ResponseFuture};
