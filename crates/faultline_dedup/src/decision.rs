//! Dedup and reopen decisions.
//!
//! Given a fingerprint and the collaborator's view of any prior record,
//! decides whether the incoming report creates a new issue, increments an
//! existing one, or additionally reopens a closed one. The decision is a
//! pure function; the issue store applies it.

use crate::error::{Error, Result};
use regex::{Regex, RegexBuilder};

/// The engine's read-only view of an existing issue record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueRecord {
    /// How many occurrences the record has accumulated so far.
    pub occurrences: u64,
    /// Whether the record is in a closed/terminal state.
    pub closed: bool,
}

/// A reopen triggered by the environment matching the reopen policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReopenNote {
    /// The environment name that triggered the reopen.
    pub environment: String,
}

impl ReopenNote {
    /// The journal note recorded on the reopened issue.
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "Issue reopened after occurring again in {} environment.",
            self.environment
        )
    }
}

/// The decided outcome for one fingerprinted report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No prior record exists; create one with the fingerprint as its
    /// identity tag.
    CreateNew {
        /// Identity tag for the new record.
        fingerprint: String,
        /// Initial occurrence count, always 1.
        occurrences: u64,
    },
    /// A prior record exists; bump its occurrence count, and reopen it
    /// when the reopen policy fired.
    IncrementOccurrence {
        /// New occurrence count (prior count + 1).
        occurrences: u64,
        /// Present when a closed record must transition back to open.
        reopen: Option<ReopenNote>,
    },
}

/// Pattern matched against the environment name to decide whether a closed
/// record may be reopened.
#[derive(Debug, Clone)]
pub struct ReopenPolicy {
    pattern: Regex,
}

impl ReopenPolicy {
    /// Compiles a reopen pattern. Matching is case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidReopenPattern`] when the pattern is not a
    /// valid regular expression.
    pub fn new(pattern: &str) -> Result<Self> {
        let compiled = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| Error::InvalidReopenPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { pattern: compiled })
    }

    /// Whether the given environment name matches this policy.
    #[must_use]
    pub fn matches(&self, environment: &str) -> bool {
        self.pattern.is_match(environment)
    }
}

/// Decides the action for a fingerprinted report.
///
/// With no existing record the action is `CreateNew` with an occurrence
/// count of 1. With an existing record the action increments its count; a
/// reopen note is attached only when the record is closed, a policy is
/// configured, and the environment name matches it. Without an environment
/// name or a policy, reopening never happens.
#[must_use]
pub fn decide(
    fingerprint: &str,
    existing: Option<&IssueRecord>,
    environment: Option<&str>,
    policy: Option<&ReopenPolicy>,
) -> Action {
    let Some(record) = existing else {
        return Action::CreateNew {
            fingerprint: fingerprint.to_string(),
            occurrences: 1,
        };
    };

    let reopen = match (record.closed, environment, policy) {
        (true, Some(environment), Some(policy)) if policy.matches(environment) => {
            Some(ReopenNote {
                environment: environment.to_string(),
            })
        }
        _ => None,
    };

    Action::IncrementOccurrence {
        occurrences: record.occurrences + 1,
        reopen,
    }
}
