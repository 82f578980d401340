//! Engine-level error taxonomy.
//!
//! `Parse` and `Config` are fatal and abort the resolution call immediately:
//! retrying cannot fix a static misconfiguration. `ElementNotFound` is
//! produced only after the retry budget is exhausted and carries the full
//! diagnostic payload for test reporting.

use fieldref_core::descriptor::{FieldDescriptor, ParseError};
use fieldref_core::pattern::ConfigError;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{0}")]
    ElementNotFound(Box<NotFoundReport>),
}

impl ResolveError {
    /// Whether the retry loop may keep going for this error kind.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ResolveError::ElementNotFound(_))
    }
}

/// Everything a test report needs when all candidates are exhausted.
#[derive(Debug, Clone)]
pub struct NotFoundReport {
    pub pattern_set: String,
    pub element_type: String,
    pub descriptor: FieldDescriptor,
    /// Every selector tried, in probing order.
    pub candidates: Vec<String>,
    /// Candidates that matched an element which never became visible.
    pub existed_invisible: Vec<String>,
    pub elapsed: Duration,
}

impl fmt::Display for NotFoundReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no visible element for {} '{}' in pattern set '{}' after {:?}; tried {} candidate(s)",
            self.element_type,
            self.descriptor,
            self.pattern_set,
            self.elapsed,
            self.candidates.len(),
        )?;
        for candidate in &self.candidates {
            let note = if self.existed_invisible.contains(candidate) {
                " (existed, not visible)"
            } else {
                ""
            };
            write!(f, "\n  - {}{}", candidate, note)?;
        }
        Ok(())
    }
}
