//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → LoggerLayer::from_config / ReqwestTransport::from_config / init_logging
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; a new layer is built to change it
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{AppConfig, LogFormat, LogMode, LoggingConfig, MiddlewareConfig, TransportConfig};
pub use validation::{validate_config, ValidationError};
