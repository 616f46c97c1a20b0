//! Log message formatting subsystem.
//!
//! # Data Flow
//! ```text
//! (request, response?, reason?)
//!     → Formatter trait
//!         - template.rs (MessageFormatter, `{placeholder}` templates)
//!         - formatter.rs (FnFormatter, any closure)
//!     → message String
//! ```
//!
//! # Design Decisions
//! - Formatters borrow the response; they can read the body without
//!   consuming it, so the caller always sees the full body
//! - Templates are validated when built, never while logging

pub mod formatter;
pub mod template;

pub use formatter::{FnFormatter, FormatError, Formatter};
pub use template::{MessageFormatter, TemplateError, CLF, DEBUG, SHORT};
