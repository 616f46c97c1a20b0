//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Middleware records → TracingSink → tracing events
//! Crate diagnostics  → tracing events
//!     → logging.rs (subscriber: EnvFilter + fmt, pretty or JSON)
//!     → stderr
//! ```

pub mod logging;

pub use logging::init_logging;
