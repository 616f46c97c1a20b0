//! Outcome to severity mapping.
//!
//! # Responsibilities
//! - Map a response status to a severity through a status table
//! - Apply an explicit override (constant or rule) when configured
//! - Signal "no level" for statuses the table cannot classify
//!
//! # Design Decisions
//! - Pure functions of the outcome; no state, safe to share across requests
//! - `None` means "do not emit", never a guessed severity
//! - The coarse table is the default; the strict table is opt-in

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use http::{Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::level::Severity;

/// Terminal or pre-send state of a single request, as seen by the policy.
#[derive(Debug, Clone, Copy)]
pub enum Outcome<'a> {
    /// The request is about to be sent; nothing is known yet.
    Dispatched,
    /// The downstream service produced a response.
    Success(&'a Response<Bytes>),
    /// The downstream service failed, possibly exposing the response it got.
    Failure { response: Option<&'a Response<Bytes>> },
}

impl<'a> Outcome<'a> {
    pub fn response(&self) -> Option<&'a Response<Bytes>> {
        match *self {
            Outcome::Dispatched => None,
            Outcome::Success(response) => Some(response),
            Outcome::Failure { response } => response,
        }
    }
}

/// Status code to severity tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTable {
    /// Anything >= 300 is NOTICE, the rest INFO.
    #[default]
    Coarse,
    /// 1xx/2xx INFO, 3xx NOTICE, 4xx ERROR, 5xx CRITICAL, other classes unclassified.
    Strict,
}

impl StatusTable {
    pub fn level_for(&self, status: StatusCode) -> Option<Severity> {
        let code = status.as_u16();
        match self {
            StatusTable::Coarse => {
                if code >= 300 {
                    Some(Severity::Notice)
                } else {
                    Some(Severity::Info)
                }
            }
            StatusTable::Strict => match code / 100 {
                1 | 2 => Some(Severity::Info),
                3 => Some(Severity::Notice),
                4 => Some(Severity::Error),
                5 => Some(Severity::Critical),
                _ => None,
            },
        }
    }
}

/// Rule invoked with the response (if any) to pick a level.
pub type LevelRule = Arc<dyn Fn(Option<&Response<Bytes>>) -> Option<Severity> + Send + Sync>;

/// Explicit level configured by the caller.
#[derive(Clone, Default)]
pub enum LevelOverride {
    /// Use the status table.
    #[default]
    Unset,
    /// Always this level, whatever the outcome.
    Constant(Severity),
    /// Whatever the rule returns, verbatim.
    Rule(LevelRule),
}

impl LevelOverride {
    pub fn rule<F>(f: F) -> Self
    where
        F: Fn(Option<&Response<Bytes>>) -> Option<Severity> + Send + Sync + 'static,
    {
        LevelOverride::Rule(Arc::new(f))
    }
}

impl From<Severity> for LevelOverride {
    fn from(level: Severity) -> Self {
        LevelOverride::Constant(level)
    }
}

impl From<Option<Severity>> for LevelOverride {
    fn from(level: Option<Severity>) -> Self {
        level.map_or(LevelOverride::Unset, LevelOverride::Constant)
    }
}

impl fmt::Debug for LevelOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelOverride::Unset => f.write_str("Unset"),
            LevelOverride::Constant(level) => f.debug_tuple("Constant").field(level).finish(),
            LevelOverride::Rule(_) => f.write_str("Rule(..)"),
        }
    }
}

/// Decides the severity of every record the middleware emits.
#[derive(Debug, Clone, Default)]
pub struct LevelPolicy {
    table: StatusTable,
    level: LevelOverride,
}

impl LevelPolicy {
    pub fn new(table: StatusTable, level: LevelOverride) -> Self {
        Self { table, level }
    }

    pub fn table(&self) -> StatusTable {
        self.table
    }

    pub fn with_table(mut self, table: StatusTable) -> Self {
        self.table = table;
        self
    }

    pub fn with_level(mut self, level: impl Into<LevelOverride>) -> Self {
        self.level = level.into();
        self
    }

    /// Level for an outcome, or `None` when the record must not be emitted.
    pub fn level(&self, outcome: &Outcome<'_>) -> Option<Severity> {
        match &self.level {
            LevelOverride::Constant(level) => Some(*level),
            LevelOverride::Rule(rule) => rule(outcome.response()),
            LevelOverride::Unset => self.default_level(outcome),
        }
    }

    fn default_level(&self, outcome: &Outcome<'_>) -> Option<Severity> {
        match outcome {
            Outcome::Dispatched => Some(Severity::Info),
            Outcome::Success(response) => self.table.level_for(response.status()),
            Outcome::Failure { response: Some(response) } => self.table.level_for(response.status()),
            Outcome::Failure { response: None } => Some(Severity::Notice),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(code: u16) -> Response<Bytes> {
        let mut response = Response::new(Bytes::from_static(b"test data"));
        *response.status_mut() = StatusCode::from_u16(code).unwrap();
        response
    }

    #[test]
    fn test_coarse_table() {
        let policy = LevelPolicy::default();
        for (code, expected) in [
            (100, Severity::Info),
            (200, Severity::Info),
            (299, Severity::Info),
            (300, Severity::Notice),
            (404, Severity::Notice),
            (503, Severity::Notice),
        ] {
            let response = response(code);
            assert_eq!(policy.level(&Outcome::Success(&response)), Some(expected), "status {}", code);
        }
    }

    #[test]
    fn test_strict_table() {
        let policy = LevelPolicy::default().with_table(StatusTable::Strict);
        for (code, expected) in [
            (101, Some(Severity::Info)),
            (204, Some(Severity::Info)),
            (302, Some(Severity::Notice)),
            (404, Some(Severity::Error)),
            (500, Some(Severity::Critical)),
            (600, None),
            (999, None),
        ] {
            let response = response(code);
            assert_eq!(policy.level(&Outcome::Success(&response)), expected, "status {}", code);
        }
    }

    #[test]
    fn test_failure_uses_embedded_response() {
        let response = response(500);
        let outcome = Outcome::Failure { response: Some(&response) };

        assert_eq!(LevelPolicy::default().level(&outcome), Some(Severity::Notice));
        assert_eq!(
            LevelPolicy::default().with_table(StatusTable::Strict).level(&outcome),
            Some(Severity::Critical)
        );
    }

    #[test]
    fn test_bare_failure_and_dispatch_defaults() {
        let policy = LevelPolicy::default().with_table(StatusTable::Strict);
        assert_eq!(policy.level(&Outcome::Failure { response: None }), Some(Severity::Notice));
        assert_eq!(policy.level(&Outcome::Dispatched), Some(Severity::Info));
    }

    #[test]
    fn test_constant_override_wins() {
        let policy = LevelPolicy::default().with_level(Severity::Alert);
        let ok = response(200);
        let bad = response(500);

        assert_eq!(policy.level(&Outcome::Dispatched), Some(Severity::Alert));
        assert_eq!(policy.level(&Outcome::Success(&ok)), Some(Severity::Alert));
        assert_eq!(policy.level(&Outcome::Failure { response: Some(&bad) }), Some(Severity::Alert));
        assert_eq!(policy.level(&Outcome::Failure { response: None }), Some(Severity::Alert));
    }

    #[test]
    fn test_rule_override_receives_response() {
        let policy = LevelPolicy::default().with_level(LevelOverride::rule(|response| match response {
            Some(r) if r.status() == StatusCode::IM_A_TEAPOT => Some(Severity::Warning),
            Some(_) => Some(Severity::Debug),
            None => None,
        }));
        let teapot = response(418);
        let ok = response(200);

        assert_eq!(policy.level(&Outcome::Success(&teapot)), Some(Severity::Warning));
        assert_eq!(policy.level(&Outcome::Success(&ok)), Some(Severity::Debug));
        assert_eq!(policy.level(&Outcome::Failure { response: None }), None);
    }

    #[test]
    fn test_unset_override_from_none() {
        let policy = LevelPolicy::default().with_level(None);
        let response = response(302);
        assert_eq!(policy.level(&Outcome::Success(&response)), Some(Severity::Notice));
    }
}
