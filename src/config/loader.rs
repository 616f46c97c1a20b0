//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::format::TemplateError;

/// Error type for configuration loading and middleware construction.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),

    #[error("Invalid message template: {0}")]
    Template(#[from] TemplateError),

    #[error("No log sink configured")]
    MissingSink,
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = toml::from_str(content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogMode;
    use crate::level::Severity;
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[middleware]
mode = "multi_phase"
request_level = "info"
format = "short"

[logging]
format = "json"
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.middleware.mode, LogMode::MultiPhase);
        assert_eq!(config.middleware.request_level, Some(Severity::Info));
        assert_eq!(config.middleware.format, "short");
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_unknown_level_is_parse_error() {
        let err = parse_config("[middleware]\nlevel = \"shouty\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_errors_are_joined() {
        let err = parse_config("[transport]\ntimeout_secs = 0\nconnect_timeout_secs = 0\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: transport.timeout_secs must be greater than zero, \
             transport.connect_timeout_secs must be greater than zero"
        );
    }
}
