// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

mod error;
mod redaction;
mod request_response;

#[cfg(test)]
mod tests;

use gigboard::{
    Command, DEFAULT_OPEN_TASK_LIMIT, Outcome, Store, TransitionResult, apply, find_stale,
    open_tasks, status_counts,
};
use gigboard_domain::{PhoneNumber, TaskId, Timestamp};
use tracing::debug;

// Re-export public types
pub use error::{ApiError, translate_engine_error};
pub use redaction::TaskView;
pub use request_response::{
    AcceptRequest, ApproveRequest, AvailabilityRequest, AwardRequest, CreateTaskRequest,
    FailureReply, MarkNudgedRequest, NeedsNudgeReply, OpenTasksReply, PostUpdateRequest,
    ProposeReply, ProposeRequest, RegisterRequest, StatusReply, SubmitRequest, TaskFetchReply,
    TaskReply, UpdateReply, UserReply,
};

/// The result of a successful mutating API call: the envelope to render and
/// the store the caller must persist.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResult<T> {
    /// The response envelope.
    pub response: T,
    /// The store after the transition.
    pub new_store: Store,
}

/// Registers a user or rewrites the role of an existing one.
///
/// # Errors
///
/// Never fails today; the `Result` is the uniform mutating-call contract.
pub fn register_user(
    store: &Store,
    request: &RegisterRequest,
    now: Timestamp,
) -> Result<ApiResult<UserReply>, ApiError> {
    let phone: PhoneNumber = PhoneNumber::normalize(&request.phone);
    let command: Command = Command::Register {
        phone,
        role: request.role,
    };
    let transition: TransitionResult = apply(store, command, now)?;
    let Outcome::UserUpserted(user) = transition.outcome else {
        unreachable!("register produces UserUpserted")
    };
    Ok(ApiResult {
        response: UserReply { ok: true, user },
        new_store: transition.new_store,
    })
}

/// Sets a user's availability flag, auto-registering if unknown.
///
/// # Errors
///
/// Never fails today; the `Result` is the uniform mutating-call contract.
pub fn set_availability(
    store: &Store,
    request: &AvailabilityRequest,
    now: Timestamp,
) -> Result<ApiResult<UserReply>, ApiError> {
    let command: Command = Command::SetAvailability {
        phone: PhoneNumber::normalize(&request.phone),
        available: request.available,
    };
    let transition: TransitionResult = apply(store, command, now)?;
    let Outcome::UserUpserted(user) = transition.outcome else {
        unreachable!("availability produces UserUpserted")
    };
    Ok(ApiResult {
        response: UserReply { ok: true, user },
        new_store: transition.new_store,
    })
}

/// Creates a new open task, auto-registering the requester.
///
/// # Errors
///
/// Returns an error if the budget is negative or not finite.
pub fn create_task(
    store: &Store,
    request: &CreateTaskRequest,
    now: Timestamp,
) -> Result<ApiResult<TaskReply>, ApiError> {
    let command: Command = Command::CreateTask {
        requester: PhoneNumber::normalize(&request.requester),
        title: request.title.clone(),
        instructions: request.instructions.clone(),
        budget: request.budget,
        category: request.category.clone(),
        deadline: request.deadline.clone(),
    };
    let transition: TransitionResult = apply(store, command, now)?;
    let Outcome::TaskCreated(task) = transition.outcome else {
        unreachable!("create produces TaskCreated")
    };
    Ok(ApiResult {
        response: TaskReply { ok: true, task },
        new_store: transition.new_store,
    })
}

/// Appends a proposal to an open task, auto-registering the worker.
///
/// # Errors
///
/// Returns an error if the task is unknown, no longer open, or the price is
/// invalid.
pub fn propose(
    store: &Store,
    request: &ProposeRequest,
    now: Timestamp,
) -> Result<ApiResult<ProposeReply>, ApiError> {
    let command: Command = Command::Propose {
        task: TaskId::new(&request.task),
        worker: PhoneNumber::normalize(&request.worker),
        price: request.price,
        eta: request.eta.clone(),
        note: request.note.clone(),
    };
    let transition: TransitionResult = apply(store, command, now)?;
    let Outcome::ProposalAppended { task, proposal } = transition.outcome else {
        unreachable!("propose produces ProposalAppended")
    };
    Ok(ApiResult {
        response: ProposeReply {
            ok: true,
            task,
            proposal,
        },
        new_store: transition.new_store,
    })
}

/// Records a worker's interest in an open task (set semantics).
///
/// # Errors
///
/// Returns an error if the task is unknown or no longer open.
pub fn accept_task(
    store: &Store,
    request: &AcceptRequest,
    now: Timestamp,
) -> Result<ApiResult<TaskReply>, ApiError> {
    let command: Command = Command::Accept {
        task: TaskId::new(&request.task),
        worker: PhoneNumber::normalize(&request.worker),
    };
    let transition: TransitionResult = apply(store, command, now)?;
    let Outcome::InterestRecorded(task) = transition.outcome else {
        unreachable!("accept produces InterestRecorded")
    };
    Ok(ApiResult {
        response: TaskReply { ok: true, task },
        new_store: transition.new_store,
    })
}

/// Awards a task to a worker on behalf of its requester.
///
/// # Errors
///
/// Returns an error if the task is unknown, the caller is not its
/// requester, or it is no longer open.
pub fn award_task(
    store: &Store,
    request: &AwardRequest,
    now: Timestamp,
) -> Result<ApiResult<TaskReply>, ApiError> {
    let command: Command = Command::Award {
        task: TaskId::new(&request.task),
        requester: PhoneNumber::normalize(&request.requester),
        worker: PhoneNumber::normalize(&request.worker),
    };
    let transition: TransitionResult = apply(store, command, now)?;
    let Outcome::TaskAwarded(task) = transition.outcome else {
        unreachable!("award produces TaskAwarded")
    };
    Ok(ApiResult {
        response: TaskReply { ok: true, task },
        new_store: transition.new_store,
    })
}

/// Posts a progress update as the awarded worker.
///
/// # Errors
///
/// Returns an error if the task is unknown, the caller is not the awarded
/// worker, or the task is not in progress.
pub fn post_update(
    store: &Store,
    request: &PostUpdateRequest,
    now: Timestamp,
) -> Result<ApiResult<UpdateReply>, ApiError> {
    let command: Command = Command::PostUpdate {
        task: TaskId::new(&request.task),
        worker: PhoneNumber::normalize(&request.worker),
        message: request.message.clone(),
        eta: request.eta.clone(),
    };
    let transition: TransitionResult = apply(store, command, now)?;
    let Outcome::UpdatePosted { task, update } = transition.outcome else {
        unreachable!("update produces UpdatePosted")
    };
    Ok(ApiResult {
        response: UpdateReply {
            ok: true,
            task,
            update,
        },
        new_store: transition.new_store,
    })
}

/// Delivers the result of an awarded task.
///
/// # Errors
///
/// Returns an error if the task is unknown, not awarded, or the caller is
/// not the awarded worker.
pub fn submit_result(
    store: &Store,
    request: &SubmitRequest,
    now: Timestamp,
) -> Result<ApiResult<TaskReply>, ApiError> {
    let command: Command = Command::Submit {
        task: TaskId::new(&request.task),
        worker: PhoneNumber::normalize(&request.worker),
        result: request.result.clone(),
    };
    let transition: TransitionResult = apply(store, command, now)?;
    let Outcome::ResultSubmitted(task) = transition.outcome else {
        unreachable!("submit produces ResultSubmitted")
    };
    Ok(ApiResult {
        response: TaskReply { ok: true, task },
        new_store: transition.new_store,
    })
}

/// Approves a submitted result, crediting the worker's reputation.
///
/// # Errors
///
/// Returns an error if the task is unknown, the caller is not its
/// requester, or it is not submitted.
pub fn approve_task(
    store: &Store,
    request: &ApproveRequest,
    now: Timestamp,
) -> Result<ApiResult<TaskReply>, ApiError> {
    let command: Command = Command::Approve {
        task: TaskId::new(&request.task),
        requester: PhoneNumber::normalize(&request.requester),
    };
    let transition: TransitionResult = apply(store, command, now)?;
    let Outcome::TaskApproved(task) = transition.outcome else {
        unreachable!("approve produces TaskApproved")
    };
    Ok(ApiResult {
        response: TaskReply { ok: true, task },
        new_store: transition.new_store,
    })
}

/// Sets the one-shot nudge marker on a task.
///
/// # Errors
///
/// Returns an error if the task is unknown.
pub fn mark_nudged(
    store: &Store,
    request: &MarkNudgedRequest,
    now: Timestamp,
) -> Result<ApiResult<TaskReply>, ApiError> {
    let command: Command = Command::MarkNudged {
        task: TaskId::new(&request.task),
    };
    let transition: TransitionResult = apply(store, command, now)?;
    let Outcome::NudgeMarked(task) = transition.outcome else {
        unreachable!("mark-nudged produces NudgeMarked")
    };
    Ok(ApiResult {
        response: TaskReply { ok: true, task },
        new_store: transition.new_store,
    })
}

/// Lists open tasks, newest first, hiding the viewer's own postings.
#[must_use]
pub fn open_task_listing(
    store: &Store,
    viewer: Option<&str>,
    limit: Option<usize>,
) -> OpenTasksReply {
    let viewer: Option<PhoneNumber> = viewer.map(PhoneNumber::normalize);
    let tasks = open_tasks(
        store,
        viewer.as_ref(),
        limit.unwrap_or(DEFAULT_OPEN_TASK_LIMIT),
    );
    OpenTasksReply { ok: true, tasks }
}

/// Fetches a single task, redacting private fields for uninvolved viewers.
///
/// # Errors
///
/// Returns an error if the task is unknown.
pub fn fetch_task(
    store: &Store,
    id: &str,
    viewer: Option<&str>,
) -> Result<TaskFetchReply, ApiError> {
    let task_id: TaskId = TaskId::new(id);
    let Some(task) = store.task(&task_id) else {
        return Err(ApiError::DomainViolation(
            gigboard_domain::DomainError::TaskNotFound(task_id),
        ));
    };
    let viewer: Option<PhoneNumber> = viewer.map(PhoneNumber::normalize);
    let (view, redacted) = TaskView::for_viewer(task, viewer.as_ref());
    if redacted {
        debug!(task = %task.id, "redacted task for uninvolved viewer");
    }
    Ok(TaskFetchReply {
        ok: true,
        task: view,
        redacted,
    })
}

/// Reports aggregate counts for the status surface.
#[must_use]
pub fn system_status(store: &Store, now: Timestamp) -> StatusReply {
    StatusReply {
        ok: true,
        time: now,
        counts: status_counts(store),
    }
}

/// Scans for stalled awarded tasks that have not been nudged.
#[must_use]
pub fn stale_awarded_tasks(
    store: &Store,
    now: Timestamp,
    silence_seconds: i64,
    limit: usize,
) -> NeedsNudgeReply {
    NeedsNudgeReply {
        ok: true,
        tasks: find_stale(store, now, silence_seconds, limit),
    }
}
