//! Phase policy: which records a request produces.

use crate::level::{LevelPolicy, Outcome, Severity};

/// Whether, and at which level, the request is logged before it is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    /// No request record.
    Off,
    /// Request record at the level the [`LevelPolicy`] gives a dispatched request.
    Eager,
    /// Request record at a fixed level.
    Fixed(Severity),
}

/// Phase behavior of the logging middleware.
///
/// | preset           | request record       | failure after request record |
/// |------------------|----------------------|------------------------------|
/// | `outcome_only()` | none                 | logged                       |
/// | `eager()`        | level policy         | suppressed                   |
/// | `multi_phase()`  | DEBUG                | logged                       |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogPolicy {
    pub request_phase: RequestPhase,

    /// Drop the failure record when a request record was already emitted
    /// for the same call.
    pub suppress_duplicate_failure: bool,
}

impl Default for LogPolicy {
    fn default() -> Self {
        Self::outcome_only()
    }
}

impl LogPolicy {
    /// Terminal record only.
    pub const fn outcome_only() -> Self {
        Self {
            request_phase: RequestPhase::Off,
            suppress_duplicate_failure: true,
        }
    }

    /// Request record up front; a failure is not logged a second time.
    pub const fn eager() -> Self {
        Self {
            request_phase: RequestPhase::Eager,
            suppress_duplicate_failure: true,
        }
    }

    /// Request record at DEBUG and a terminal record, always both.
    pub const fn multi_phase() -> Self {
        Self {
            request_phase: RequestPhase::Fixed(Severity::Debug),
            suppress_duplicate_failure: false,
        }
    }

    pub const fn with_request_phase(mut self, phase: RequestPhase) -> Self {
        self.request_phase = phase;
        self
    }

    pub const fn with_suppress_duplicate_failure(mut self, suppress: bool) -> Self {
        self.suppress_duplicate_failure = suppress;
        self
    }

    /// Level of the request record, `None` when there is none.
    pub fn request_level(&self, levels: &LevelPolicy) -> Option<Severity> {
        match self.request_phase {
            RequestPhase::Off => None,
            RequestPhase::Eager => levels.level(&Outcome::Dispatched),
            RequestPhase::Fixed(level) => Some(level),
        }
    }

    /// Whether the failure record is dropped, given whether a request
    /// record was emitted for this call.
    pub fn suppresses_failure(&self, request_logged: bool) -> bool {
        request_logged && self.suppress_duplicate_failure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LevelOverride;

    #[test]
    fn test_presets() {
        let levels = LevelPolicy::default();

        assert_eq!(LogPolicy::outcome_only().request_level(&levels), None);
        assert_eq!(LogPolicy::eager().request_level(&levels), Some(Severity::Info));
        assert_eq!(LogPolicy::multi_phase().request_level(&levels), Some(Severity::Debug));
    }

    #[test]
    fn test_eager_follows_level_override() {
        let constant = LevelPolicy::default().with_level(Severity::Error);
        assert_eq!(LogPolicy::eager().request_level(&constant), Some(Severity::Error));

        let silent = LevelPolicy::default().with_level(LevelOverride::rule(|_| None));
        assert_eq!(LogPolicy::eager().request_level(&silent), None);
    }

    #[test]
    fn test_suppression_needs_a_request_record() {
        assert!(LogPolicy::eager().suppresses_failure(true));
        assert!(!LogPolicy::eager().suppresses_failure(false));
        assert!(!LogPolicy::multi_phase().suppresses_failure(true));
    }
}
