// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{TaskId, TaskStatus};

/// Errors that can occur during domain validation and lifecycle checks.
///
/// Every variant maps to a stable wire code surfaced verbatim by both front
/// ends; see [`DomainError::code`].
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// No task exists with the given identifier.
    TaskNotFound(TaskId),
    /// The task has left the open state and no longer accepts proposals or
    /// interest.
    TaskNotOpen {
        /// The task's current status.
        status: TaskStatus,
    },
    /// The caller is not the task's requester.
    NotRequester,
    /// The caller is not the task's awarded worker.
    NotAwardedWorker,
    /// The task is not in the awarded state.
    TaskNotAwarded {
        /// The task's current status.
        status: TaskStatus,
    },
    /// The task is not in the submitted state.
    TaskNotSubmitted {
        /// The task's current status.
        status: TaskStatus,
    },
    /// The task is neither awarded nor submitted.
    TaskNotInProgress {
        /// The task's current status.
        status: TaskStatus,
    },
    /// The role string is not a recognized role.
    InvalidRole(String),
    /// The budget is negative or not a finite number.
    InvalidBudget(f64),
    /// The proposed price is negative or not a finite number.
    InvalidPrice(f64),
}

impl DomainError {
    /// Returns the stable wire code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::TaskNotFound(_) => "task_not_found",
            Self::TaskNotOpen { .. } => "task_not_open",
            Self::NotRequester => "not_requester",
            Self::NotAwardedWorker => "not_awarded_worker",
            Self::TaskNotAwarded { .. } => "task_not_awarded",
            Self::TaskNotSubmitted { .. } => "task_not_submitted",
            Self::TaskNotInProgress { .. } => "task_not_in_progress",
            Self::InvalidRole(_) => "invalid_role",
            Self::InvalidBudget(_) => "invalid_budget",
            Self::InvalidPrice(_) => "invalid_price",
        }
    }

    /// Returns the task status carried by this error, for failure envelopes
    /// that report the current status alongside the code.
    #[must_use]
    pub const fn task_status(&self) -> Option<TaskStatus> {
        match self {
            Self::TaskNotOpen { status }
            | Self::TaskNotAwarded { status }
            | Self::TaskNotSubmitted { status }
            | Self::TaskNotInProgress { status } => Some(*status),
            _ => None,
        }
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskNotFound(id) => write!(f, "Task {id} not found"),
            Self::TaskNotOpen { status } => {
                write!(f, "Task is not open (status: {status})")
            }
            Self::NotRequester => write!(f, "Caller is not the task's requester"),
            Self::NotAwardedWorker => write!(f, "Caller is not the task's awarded worker"),
            Self::TaskNotAwarded { status } => {
                write!(f, "Task is not awarded (status: {status})")
            }
            Self::TaskNotSubmitted { status } => {
                write!(f, "Task is not submitted (status: {status})")
            }
            Self::TaskNotInProgress { status } => {
                write!(f, "Task is not in progress (status: {status})")
            }
            Self::InvalidRole(role) => write!(f, "Invalid role: '{role}'"),
            Self::InvalidBudget(value) => {
                write!(f, "Budget must be a non-negative number, got {value}")
            }
            Self::InvalidPrice(value) => {
                write!(f, "Price must be a non-negative number, got {value}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
