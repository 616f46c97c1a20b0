//! Severity assignment subsystem.
//!
//! # Data Flow
//! ```text
//! Outcome (Dispatched | Success | Failure)
//!     → policy.rs (override? constant / rule : status table)
//!     → Option<Severity> (None = skip the record)
//! ```

pub mod policy;
pub mod severity;

pub use policy::{LevelOverride, LevelPolicy, LevelRule, Outcome, StatusTable};
pub use severity::{ParseSeverityError, Severity};
