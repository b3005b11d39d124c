// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use gigboard_domain::{PhoneNumber, Role, TaskId};

/// A command represents a caller's intent as data only.
///
/// Commands are the only way to request state changes. All identity fields
/// are already normalized: adapters canonicalize raw input before building
/// a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Register a user, or rewrite the role of an existing one.
    Register {
        /// The identity to register.
        phone: PhoneNumber,
        /// The declared role; last-writer-wins.
        role: Role,
    },
    /// Set a user's availability flag, auto-registering if unknown.
    SetAvailability {
        /// The identity to update.
        phone: PhoneNumber,
        /// The new flag value; last-writer-wins.
        available: bool,
    },
    /// Create a new open task.
    CreateTask {
        /// The posting identity; auto-registered if unknown.
        requester: PhoneNumber,
        /// Short description of the work.
        title: String,
        /// Full instructions for the worker.
        instructions: String,
        /// Offered budget; must be non-negative.
        budget: f64,
        /// Freeform category label.
        category: String,
        /// Freeform deadline, if any.
        deadline: Option<String>,
    },
    /// Append a proposal to an open task.
    Propose {
        /// The task to propose on.
        task: TaskId,
        /// The proposing worker; auto-registered if unknown.
        worker: PhoneNumber,
        /// The offered price; must be non-negative.
        price: f64,
        /// Freeform estimated completion.
        eta: Option<String>,
        /// Freeform note to the requester.
        note: Option<String>,
    },
    /// Record a worker's interest in an open task (set semantics).
    Accept {
        /// The task of interest.
        task: TaskId,
        /// The interested worker; auto-registered if unknown.
        worker: PhoneNumber,
    },
    /// Select a worker for an open task, starting the in-progress clock.
    Award {
        /// The task to award.
        task: TaskId,
        /// The caller; must be the task's requester.
        requester: PhoneNumber,
        /// The selected worker; auto-registered if unknown.
        worker: PhoneNumber,
    },
    /// Append a progress update to an in-progress task.
    PostUpdate {
        /// The task being worked.
        task: TaskId,
        /// The caller; must be the awarded worker.
        worker: PhoneNumber,
        /// The update text.
        message: String,
        /// Revised freeform estimate, if any.
        eta: Option<String>,
    },
    /// Deliver the result of an awarded task.
    Submit {
        /// The task being delivered.
        task: TaskId,
        /// The caller; must be the awarded worker.
        worker: PhoneNumber,
        /// The result payload.
        result: String,
    },
    /// Accept the submitted result, crediting the worker's reputation.
    Approve {
        /// The task to approve.
        task: TaskId,
        /// The caller; must be the task's requester.
        requester: PhoneNumber,
    },
    /// Set the one-shot nudge marker on a stalled task.
    MarkNudged {
        /// The task that was surfaced to the notifier.
        task: TaskId,
    },
}
