// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use gigboard::EngineError;
use gigboard_domain::{DomainError, TaskStatus};

/// API-level errors.
///
/// Both front ends render these as the shared failure envelope
/// (`{ok:false, error:<code>, status?}`); the HTTP front end additionally
/// maps `task_not_found` to a 404 on direct-resource fetches.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// A lifecycle or validation rule was violated.
    DomainViolation(DomainError),
}

impl ApiError {
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

    /// Returns whether this error means a directly addressed resource does
    /// not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::DomainViolation(DomainError::TaskNotFound(_))
        )
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates an engine error into an API error.
///
/// This translation is explicit so engine internals are not leaked into the
/// front ends.
#[must_use]
pub fn translate_engine_error(err: EngineError) -> ApiError {
    match err {
        EngineError::DomainViolation(domain_err) => ApiError::DomainViolation(domain_err),
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        translate_engine_error(err)
    }
}
