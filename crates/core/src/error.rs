// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use gigboard_domain::{DomainError, TaskStatus};

/// Errors that can occur during state transitions.
///
/// The engine never panics on bad input: every precondition violation is
/// reported as a structured failure before any mutation is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
}

impl EngineError {
    /// Returns the stable wire code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::DomainViolation(err) => err.code(),
        }
    }

    /// Returns the task status carried by this error, if any.
    #[must_use]
    pub const fn task_status(&self) -> Option<TaskStatus> {
        match self {
            Self::DomainViolation(err) => err.task_status(),
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<DomainError> for EngineError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
