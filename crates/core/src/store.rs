// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use gigboard_domain::{
    PhoneNumber, ProgressUpdate, Proposal, Role, Task, TaskId, TaskStatus, Timestamp, User,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The process-wide persisted aggregate: every user, every task, and the
/// task-id sequence counter, held as one document.
///
/// Every mutating operation reads the whole aggregate, applies one
/// transition, and writes the whole aggregate back; there is no partial
/// update. The document serializes with camelCase keys so the persisted
/// shape matches the wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    /// Schema version of the persisted document.
    pub version: u32,
    /// Epoch seconds at which the store was first created.
    pub created_at: Timestamp,
    /// All known users, keyed by normalized phone identity.
    pub users: BTreeMap<PhoneNumber, User>,
    /// All tasks, keyed by task id.
    pub tasks: BTreeMap<TaskId, Task>,
    /// The task-id sequence counter; strictly increasing, never reused.
    pub seq: u64,
}

impl Store {
    /// The schema version written by this build.
    pub const CURRENT_VERSION: u32 = 1;

    /// Creates a fresh, empty store.
    #[must_use]
    pub const fn new(now: Timestamp) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            created_at: now,
            users: BTreeMap::new(),
            tasks: BTreeMap::new(),
            seq: 0,
        }
    }

    /// Looks up a task by id.
    #[must_use]
    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// Looks up a user by identity.
    #[must_use]
    pub fn user(&self, phone: &PhoneNumber) -> Option<&User> {
        self.users.get(phone)
    }

    /// Assigns the next task id, advancing the sequence counter.
    pub fn next_task_id(&mut self) -> TaskId {
        self.seq += 1;
        TaskId::from_seq(self.seq)
    }

    /// Creates the user if it is not yet known.
    ///
    /// Participants are registered lazily on first reference; an existing
    /// record is left untouched (roles are only rewritten by an explicit
    /// registration).
    pub fn ensure_user(&mut self, phone: &PhoneNumber, role: Role, now: Timestamp) {
        if !self.users.contains_key(phone) {
            self.users
                .insert(phone.clone(), User::new(phone.clone(), role, now));
        }
    }

    /// Returns the aggregate counts reported by the status surface.
    #[must_use]
    pub fn counts(&self) -> StoreCounts {
        StoreCounts {
            users: self.users.len(),
            tasks: self.tasks.len(),
            open_tasks: self
                .tasks
                .values()
                .filter(|task| task.status == TaskStatus::Open)
                .count(),
        }
    }
}

/// Aggregate counts for the status surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreCounts {
    /// Number of known users.
    pub users: usize,
    /// Number of tasks in any state.
    pub tasks: usize,
    /// Number of tasks currently open.
    pub open_tasks: usize,
}

/// The result of a successfully applied command.
///
/// Transitions are atomic: a command either yields a fully updated store or
/// a structured failure, never a partially mutated aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionResult {
    /// The store after the transition.
    pub new_store: Store,
    /// What the transition did, carrying the records the front ends render.
    pub outcome: Outcome,
}

/// The payload of a successful transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A user was registered or re-registered.
    UserUpserted(User),
    /// A new open task was created.
    TaskCreated(Task),
    /// A proposal was appended to an open task.
    ProposalAppended {
        /// The task after the append.
        task: Task,
        /// The appended proposal.
        proposal: Proposal,
    },
    /// A worker's interest was recorded on an open task.
    InterestRecorded(Task),
    /// The task moved open → awarded.
    TaskAwarded(Task),
    /// A progress update was appended to an in-progress task.
    UpdatePosted {
        /// The task after the append.
        task: Task,
        /// The appended update.
        update: ProgressUpdate,
    },
    /// The task moved awarded → submitted.
    ResultSubmitted(Task),
    /// The task moved submitted → approved.
    TaskApproved(Task),
    /// The task's one-shot nudge marker was set.
    NudgeMarked(Task),
}
