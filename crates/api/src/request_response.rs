// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response data transfer objects shared by both front ends.
//!
//! The command front end builds requests from parsed arguments; the HTTP
//! front end deserializes them from JSON bodies. Responses are the exact
//! envelopes both surfaces emit, `ok` flag included.

use crate::error::ApiError;
use crate::redaction::TaskView;
use gigboard::{StaleTask, StoreCounts};
use gigboard_domain::{ProgressUpdate, Proposal, Role, Task, TaskStatus, Timestamp, User};
use serde::{Deserialize, Serialize};

fn default_category() -> String {
    String::from("general")
}

/// Request to register a user or rewrite its role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// The identity to register, as supplied.
    pub phone: String,
    /// The declared role; defaults to `both`.
    #[serde(default)]
    pub role: Role,
}

/// Request to set a user's availability flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRequest {
    /// The identity to update, as supplied.
    pub phone: String,
    /// The new flag value.
    pub available: bool,
}

/// Request to create a new task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    /// The posting identity, as supplied.
    pub requester: String,
    /// Short description of the work.
    pub title: String,
    /// Full instructions for the worker.
    pub instructions: String,
    /// Offered budget; must be non-negative.
    pub budget: f64,
    /// Freeform category label; defaults to `general`.
    #[serde(default = "default_category")]
    pub category: String,
    /// Freeform deadline, if any.
    #[serde(default)]
    pub deadline: Option<String>,
}

/// Request to submit a proposal on an open task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposeRequest {
    /// The task to propose on.
    pub task: String,
    /// The proposing identity, as supplied.
    pub worker: String,
    /// The offered price; must be non-negative.
    pub price: f64,
    /// Freeform estimated completion.
    #[serde(default)]
    pub eta: Option<String>,
    /// Freeform note to the requester.
    #[serde(default)]
    pub note: Option<String>,
}

/// Request to register interest in an open task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptRequest {
    /// The task of interest.
    pub task: String,
    /// The interested identity, as supplied.
    pub worker: String,
}

/// Request to award a task to a worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardRequest {
    /// The task to award.
    pub task: String,
    /// The caller; must be the task's requester.
    pub requester: String,
    /// The selected worker.
    pub worker: String,
}

/// Request to post a progress update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostUpdateRequest {
    /// The task being worked.
    pub task: String,
    /// The caller; must be the awarded worker.
    pub worker: String,
    /// The update text.
    pub message: String,
    /// Revised freeform estimate, if any.
    #[serde(default)]
    pub eta: Option<String>,
}

/// Request to deliver the result of an awarded task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    /// The task being delivered.
    pub task: String,
    /// The caller; must be the awarded worker.
    pub worker: String,
    /// The result payload.
    pub result: String,
}

/// Request to approve a submitted result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveRequest {
    /// The task to approve.
    pub task: String,
    /// The caller; must be the task's requester.
    pub requester: String,
}

/// Request to set the one-shot nudge marker on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkNudgedRequest {
    /// The task that was surfaced to the notifier.
    pub task: String,
}

/// Envelope carrying a user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserReply {
    /// Success flag; always true.
    pub ok: bool,
    /// The user after the operation.
    pub user: User,
}

/// Envelope carrying a task record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskReply {
    /// Success flag; always true.
    pub ok: bool,
    /// The task after the operation.
    pub task: Task,
}

/// Envelope for an accepted proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposeReply {
    /// Success flag; always true.
    pub ok: bool,
    /// The task after the append.
    pub task: Task,
    /// The appended proposal.
    pub proposal: Proposal,
}

/// Envelope for an accepted progress update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateReply {
    /// Success flag; always true.
    pub ok: bool,
    /// The task after the append.
    pub task: Task,
    /// The appended update.
    pub update: ProgressUpdate,
}

/// Envelope for the open-task listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenTasksReply {
    /// Success flag; always true.
    pub ok: bool,
    /// Open tasks, newest-created first.
    pub tasks: Vec<Task>,
}

/// Envelope for a single-task fetch, with viewer-aware redaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskFetchReply {
    /// Success flag; always true.
    pub ok: bool,
    /// The task, possibly redacted for the viewer.
    pub task: TaskView,
    /// Whether sensitive fields were omitted for this viewer.
    pub redacted: bool,
}

/// Envelope for the status surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReply {
    /// Success flag; always true.
    pub ok: bool,
    /// Epoch seconds at which the counts were taken.
    pub time: Timestamp,
    /// Aggregate store counts.
    pub counts: StoreCounts,
}

/// Envelope for the stalled-task scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeedsNudgeReply {
    /// Success flag; always true.
    pub ok: bool,
    /// Stalled awarded tasks not yet nudged, at most `limit` of them.
    pub tasks: Vec<StaleTask>,
}

/// The shared failure envelope.
///
/// Engine-reported failures carry their wire code and, where the original
/// check observed one, the task's current status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReply {
    /// Success flag; always false.
    pub ok: bool,
    /// The stable wire code.
    pub error: String,
    /// The task's current status, for wrong-state rejections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl FailureReply {
    /// Builds the envelope for an arbitrary wire code.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        Self {
            ok: false,
            error: code.to_owned(),
            status: None,
        }
    }
}

impl From<&ApiError> for FailureReply {
    fn from(err: &ApiError) -> Self {
        Self {
            ok: false,
            error: err.code().to_owned(),
            status: err.task_status(),
        }
    }
}
