// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Viewer-aware rendering of a single task.
//!
//! Once a task has been awarded, its parties and negotiation record are
//! private to the requester and the awarded worker. Any other viewer gets a
//! view with those fields omitted and the `redacted` flag set.

use gigboard_audit::HistoryEntry;
use gigboard_domain::{
    PhoneNumber, ProgressUpdate, Proposal, Submission, Task, TaskId, TaskStatus, Timestamp,
};
use serde::Serialize;

/// A task as rendered to a particular viewer.
///
/// The full rendering matches the persisted task shape exactly. The
/// redacted rendering omits `requester`, `awardedTo`, `submission`,
/// `updates`, `proposals`, `acceptedBy`, and the history trail (which
/// embeds the same payloads the other fields carry).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    /// Task identifier.
    pub id: TaskId,
    /// Current lifecycle state.
    pub status: TaskStatus,
    /// Short description of the work.
    pub title: String,
    /// Full instructions for the worker.
    pub instructions: String,
    /// Offered budget.
    pub budget: f64,
    /// Freeform category label.
    pub category: String,
    /// Freeform deadline, if any.
    pub deadline: Option<String>,
    /// The posting identity; omitted when redacted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester: Option<PhoneNumber>,
    /// Worker offers; omitted when redacted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposals: Option<Vec<Proposal>>,
    /// Interested workers; omitted when redacted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_by: Option<Vec<PhoneNumber>>,
    /// The selected worker; omitted entirely when redacted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub awarded_to: Option<Option<PhoneNumber>>,
    /// The delivered result; omitted entirely when redacted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission: Option<Option<Submission>>,
    /// Progress updates; omitted when redacted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updates: Option<Vec<ProgressUpdate>>,
    /// History trail; omitted when redacted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<HistoryEntry>>,
    /// Epoch seconds of the most recent update, or of the award.
    pub last_update_at: Option<Timestamp>,
    /// One-shot nudge marker.
    pub last_nudged_at: Option<Timestamp>,
    /// Epoch seconds of creation.
    pub created_at: Timestamp,
    /// Epoch seconds of the most recent accepted mutation.
    pub updated_at: Timestamp,
}

impl TaskView {
    /// Renders a task for a viewer, returning the view and whether it was
    /// redacted.
    ///
    /// Redaction applies iff a viewer is supplied, the task has left the
    /// open state, and the viewer is neither the requester nor the awarded
    /// worker. An open task is public by definition; a fetch without a
    /// viewer is trusted (the command surface has no viewer concept).
    #[must_use]
    pub fn for_viewer(task: &Task, viewer: Option<&PhoneNumber>) -> (Self, bool) {
        let redacted: bool = match viewer {
            Some(viewer) => task.status != TaskStatus::Open && !task.is_participant(viewer),
            None => false,
        };
        if redacted {
            (Self::redacted(task), true)
        } else {
            (Self::full(task), false)
        }
    }

    /// The complete rendering, matching the persisted shape.
    fn full(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            status: task.status,
            title: task.title.clone(),
            instructions: task.instructions.clone(),
            budget: task.budget,
            category: task.category.clone(),
            deadline: task.deadline.clone(),
            requester: Some(task.requester.clone()),
            proposals: Some(task.proposals.clone()),
            accepted_by: Some(task.accepted_by.clone()),
            awarded_to: Some(task.awarded_to.clone()),
            submission: Some(task.submission.clone()),
            updates: Some(task.updates.clone()),
            history: Some(task.history.clone()),
            last_update_at: task.last_update_at,
            last_nudged_at: task.last_nudged_at,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }

    /// The rendering for an uninvolved viewer of a non-open task.
    fn redacted(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            status: task.status,
            title: task.title.clone(),
            instructions: task.instructions.clone(),
            budget: task.budget,
            category: task.category.clone(),
            deadline: task.deadline.clone(),
            requester: None,
            proposals: None,
            accepted_by: None,
            awarded_to: None,
            submission: None,
            updates: None,
            history: None,
            last_update_at: task.last_update_at,
            last_nudged_at: task.last_nudged_at,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}
