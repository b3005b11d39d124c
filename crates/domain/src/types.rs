// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::identity::PhoneNumber;
use crate::timestamp::Timestamp;
use gigboard_audit::HistoryEntry;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A participant's declared role in the marketplace.
///
/// The role is informational (last-writer-wins on re-registration) and never
/// gates an operation: access control is per-task, against the task's
/// recorded requester and awarded worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Proposes on, is awarded, and fulfills tasks.
    Worker,
    /// Posts tasks and approves their results.
    Requester,
    /// Acts on both sides of the marketplace.
    #[default]
    Both,
}

impl Role {
    /// Parses a role from its wire representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not `worker`, `requester`, or
    /// `both`.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "worker" => Ok(Self::Worker),
            "requester" => Ok(Self::Requester),
            "both" => Ok(Self::Both),
            _ => Err(DomainError::InvalidRole(s.to_owned())),
        }
    }

    /// Returns the wire representation of this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Worker => "worker",
            Self::Requester => "requester",
            Self::Both => "both",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The lifecycle state of a task.
///
/// A task only ever advances along open → awarded → submitted → approved;
/// no operation regresses the status. Approved is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Accepting proposals and interest.
    Open,
    /// A worker has been selected; the staleness clock is running.
    Awarded,
    /// The awarded worker has delivered a result, pending approval.
    Submitted,
    /// The requester accepted the result. Terminal.
    Approved,
}

impl TaskStatus {
    /// Returns the wire representation of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Awarded => "awarded",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
        }
    }

    /// Checks if a transition from this status to another is valid.
    ///
    /// Valid transitions are:
    /// - Open → Awarded
    /// - Awarded → Submitted
    /// - Submitted → Approved
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Open, Self::Awarded)
                | (Self::Awarded, Self::Submitted)
                | (Self::Submitted, Self::Approved)
        )
    }

    /// Returns whether the awarded worker may still post progress updates.
    #[must_use]
    pub const fn is_in_progress(&self) -> bool {
        matches!(self, Self::Awarded | Self::Submitted)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Derived per-user counters, updated only as a side effect of lifecycle
/// transitions. Monotonically non-decreasing; never reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Reputation {
    /// Tasks this user delivered that were approved.
    pub approved: u64,
    /// Reserved counter; nothing currently increments it.
    pub rejected: u64,
    /// Reserved counter; nothing currently increments it.
    pub on_time: u64,
    /// Reserved counter; nothing currently increments it.
    pub late: u64,
}

impl Reputation {
    /// Records one approval for this user.
    pub const fn record_approval(&mut self) {
        self.approved += 1;
    }
}

/// A marketplace participant.
///
/// Users are created lazily on first reference (registration, availability,
/// task creation, proposal, interest, or award) and never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The normalized phone identity; primary key.
    pub phone: PhoneNumber,
    /// The declared role; last-writer-wins.
    pub role: Role,
    /// Derived lifecycle counters.
    pub reputation: Reputation,
    /// Availability flag; last-writer-wins, unset until first declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    /// Epoch seconds of first registration.
    pub created_at: Timestamp,
    /// Epoch seconds of the most recent mutation of this record.
    pub updated_at: Timestamp,
}

impl User {
    /// Creates a new user record.
    #[must_use]
    pub fn new(phone: PhoneNumber, role: Role, now: Timestamp) -> Self {
        Self {
            phone,
            role,
            reputation: Reputation::default(),
            available: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A task identifier: `T` followed by a zero-padded sequence number.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId {
    /// The identifier value (e.g. `T000001`).
    value: String,
}

impl TaskId {
    /// Creates an identifier from a raw string as supplied by a caller.
    ///
    /// No shape validation happens here: an identifier that matches no task
    /// simply fails the lookup with `task_not_found`.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.trim().to_owned(),
        }
    }

    /// Creates the identifier for a given sequence number.
    #[must_use]
    pub fn from_seq(seq: u64) -> Self {
        Self {
            value: format!("T{seq:06}"),
        }
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A worker's offer on an open task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    /// The proposing worker.
    pub worker: PhoneNumber,
    /// The offered price.
    pub price: f64,
    /// Freeform estimated completion, as supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eta: Option<String>,
    /// Freeform note to the requester.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Epoch seconds at which the proposal was accepted into the task.
    pub at: Timestamp,
}

/// A progress update posted by the awarded worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// The awarded worker.
    pub by: PhoneNumber,
    /// The update text.
    pub message: String,
    /// Revised freeform estimate, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eta: Option<String>,
    /// Epoch seconds at which the update was accepted.
    pub at: Timestamp,
}

/// The delivered result of an awarded task. Set exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    /// The worker who delivered.
    pub worker: PhoneNumber,
    /// The result payload, as supplied.
    pub result: String,
    /// Epoch seconds of delivery.
    pub at: Timestamp,
}

/// A task and its complete lifecycle record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique, monotonically assigned identifier.
    pub id: TaskId,
    /// Current lifecycle state.
    pub status: TaskStatus,
    /// The posting identity; immutable after creation.
    pub requester: PhoneNumber,
    /// Short description of the work.
    pub title: String,
    /// Full instructions for the worker.
    pub instructions: String,
    /// Offered budget; non-negative.
    pub budget: f64,
    /// Freeform category label.
    pub category: String,
    /// Freeform deadline, if any.
    pub deadline: Option<String>,
    /// Worker offers; append-only, frozen once the task leaves open.
    pub proposals: Vec<Proposal>,
    /// Workers that expressed interest while open; set semantics.
    pub accepted_by: Vec<PhoneNumber>,
    /// The selected worker; set exactly once on open → awarded.
    pub awarded_to: Option<PhoneNumber>,
    /// The delivered result; set exactly once on awarded → submitted.
    pub submission: Option<Submission>,
    /// Progress updates; appendable only while in progress, by the awarded
    /// worker.
    pub updates: Vec<ProgressUpdate>,
    /// Epoch seconds of the most recent update, or of the award.
    pub last_update_at: Option<Timestamp>,
    /// Set at most once by the admin scanner; never cleared.
    pub last_nudged_at: Option<Timestamp>,
    /// Append-only log of every accepted event; never rewritten or pruned.
    pub history: Vec<HistoryEntry>,
    /// Epoch seconds of creation.
    pub created_at: Timestamp,
    /// Epoch seconds of the most recent accepted mutation.
    pub updated_at: Timestamp,
}

impl Task {
    /// Creates a new open task with an empty lifecycle record.
    ///
    /// The caller appends the `created` history entry; every accepted
    /// mutation of a task, creation included, records exactly one entry.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: TaskId,
        requester: PhoneNumber,
        title: String,
        instructions: String,
        budget: f64,
        category: String,
        deadline: Option<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            status: TaskStatus::Open,
            requester,
            title,
            instructions,
            budget,
            category,
            deadline,
            proposals: Vec::new(),
            accepted_by: Vec::new(),
            awarded_to: None,
            submission: None,
            updates: Vec::new(),
            last_update_at: None,
            last_nudged_at: None,
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends one history entry.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
    }

    /// Returns whether the given identity is the requester or the awarded
    /// worker of this task.
    #[must_use]
    pub fn is_participant(&self, identity: &PhoneNumber) -> bool {
        if &self.requester == identity {
            return true;
        }
        self.awarded_to.as_ref() == Some(identity)
    }

    /// Returns the reference instant for staleness: the latest of the last
    /// progress update, the last mutation, and creation.
    #[must_use]
    pub fn staleness_reference(&self) -> Timestamp {
        self.last_update_at
            .unwrap_or(self.created_at)
            .max(self.updated_at)
            .max(self.created_at)
    }
}
