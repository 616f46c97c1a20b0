//! Log severities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Severity attached to a log record, ordered by increasing urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Notice,
    Warning,
    Error,
    Critical,
    Alert,
    Emergency,
}

impl Severity {
    /// All severities, least urgent first.
    pub const ALL: [Severity; 8] = [
        Severity::Debug,
        Severity::Info,
        Severity::Notice,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
        Severity::Alert,
        Severity::Emergency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Notice => "notice",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
            Severity::Alert => "alert",
            Severity::Emergency => "emergency",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known severity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown severity `{0}`")]
pub struct ParseSeverityError(pub String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Severity::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseSeverityError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_follows_urgency() {
        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Info < Severity::Notice);
        assert!(Severity::Error < Severity::Critical);
        assert_eq!(Severity::ALL.iter().max(), Some(&Severity::Emergency));
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("NOTICE".parse::<Severity>(), Ok(Severity::Notice));
        assert_eq!(" critical ".parse::<Severity>(), Ok(Severity::Critical));
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert!("loud".parse::<Severity>().is_err());
    }
}
