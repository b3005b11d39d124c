// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::EngineError;
use crate::store::{Outcome, Store, TransitionResult};
use gigboard_audit::{HistoryEntry, HistoryEvent};
use gigboard_domain::{
    DomainError, ProgressUpdate, Proposal, Role, Submission, Task, TaskStatus, Timestamp, User,
    validate_budget, validate_price,
};
use serde::Serialize;

/// Renders an event payload for the history trail.
///
/// Serialization of the marketplace record types cannot fail; a `None` here
/// would only mean the payload is unrepresentable, in which case the entry
/// is kept without it.
fn history_data<T: Serialize>(value: &T) -> Option<serde_json::Value> {
    serde_json::to_value(value).ok()
}

/// Applies a command to the current store, producing a new store and an
/// outcome payload.
///
/// This is a pure function: no I/O, no clock access (the caller samples
/// `now` once at the boundary), and no partial application: every
/// precondition is checked before any mutation is built, so a failure
/// leaves nothing to roll back.
///
/// # Arguments
///
/// * `store` - The current aggregate (immutable)
/// * `command` - The command to apply
/// * `now` - The instant the whole transition is stamped with
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new store and outcome
/// * `Err(EngineError)` carrying the wire failure code
///
/// # Errors
///
/// Returns an error if the command violates a lifecycle precondition; see
/// the per-operation contracts on [`Command`].
#[allow(clippy::too_many_lines)]
pub fn apply(store: &Store, command: Command, now: Timestamp) -> Result<TransitionResult, EngineError> {
    match command {
        Command::Register { phone, role } => {
            let mut new_store: Store = store.clone();
            let user: User = match new_store.users.get_mut(&phone) {
                Some(existing) => {
                    existing.role = role;
                    existing.updated_at = now;
                    existing.clone()
                }
                None => {
                    let user: User = User::new(phone.clone(), role, now);
                    new_store.users.insert(phone, user.clone());
                    user
                }
            };

            Ok(TransitionResult {
                new_store,
                outcome: Outcome::UserUpserted(user),
            })
        }
        Command::SetAvailability { phone, available } => {
            let mut new_store: Store = store.clone();
            let user: User = match new_store.users.get_mut(&phone) {
                Some(existing) => {
                    existing.available = Some(available);
                    existing.updated_at = now;
                    existing.clone()
                }
                None => {
                    let mut user: User = User::new(phone.clone(), Role::Both, now);
                    user.available = Some(available);
                    new_store.users.insert(phone, user.clone());
                    user
                }
            };

            Ok(TransitionResult {
                new_store,
                outcome: Outcome::UserUpserted(user),
            })
        }
        Command::CreateTask {
            requester,
            title,
            instructions,
            budget,
            category,
            deadline,
        } => {
            validate_budget(budget)?;

            let mut new_store: Store = store.clone();
            new_store.ensure_user(&requester, Role::Requester, now);

            let id = new_store.next_task_id();
            let mut task: Task = Task::new(
                id.clone(),
                requester.clone(),
                title.trim().to_owned(),
                instructions.trim().to_owned(),
                budget,
                category,
                deadline,
                now,
            );
            task.record(HistoryEntry::new(
                now,
                HistoryEvent::Created,
                requester.to_string(),
            ));

            new_store.tasks.insert(id, task.clone());

            Ok(TransitionResult {
                new_store,
                outcome: Outcome::TaskCreated(task),
            })
        }
        Command::Propose {
            task,
            worker,
            price,
            eta,
            note,
        } => {
            let Some(current) = store.task(&task) else {
                return Err(DomainError::TaskNotFound(task).into());
            };
            if current.status != TaskStatus::Open {
                return Err(DomainError::TaskNotOpen {
                    status: current.status,
                }
                .into());
            }
            validate_price(price)?;

            let proposal: Proposal = Proposal {
                worker: worker.clone(),
                price,
                eta,
                note,
                at: now,
            };

            let mut record: Task = current.clone();
            record.proposals.push(proposal.clone());
            record.updated_at = now;
            let mut entry: HistoryEntry =
                HistoryEntry::new(now, HistoryEvent::Proposal, worker.to_string());
            if let Some(data) = history_data(&proposal) {
                entry = entry.with_data(data);
            }
            record.record(entry);

            let mut new_store: Store = store.clone();
            new_store.ensure_user(&worker, Role::Worker, now);
            new_store.tasks.insert(task, record.clone());

            Ok(TransitionResult {
                new_store,
                outcome: Outcome::ProposalAppended {
                    task: record,
                    proposal,
                },
            })
        }
        Command::Accept { task, worker } => {
            let Some(current) = store.task(&task) else {
                return Err(DomainError::TaskNotFound(task).into());
            };
            if current.status != TaskStatus::Open {
                return Err(DomainError::TaskNotOpen {
                    status: current.status,
                }
                .into());
            }

            let mut record: Task = current.clone();
            // Set semantics: a repeat accept is a no-op on the roster but is
            // still logged.
            if !record.accepted_by.contains(&worker) {
                record.accepted_by.push(worker.clone());
            }
            record.updated_at = now;
            record.record(HistoryEntry::new(
                now,
                HistoryEvent::Accept,
                worker.to_string(),
            ));

            let mut new_store: Store = store.clone();
            new_store.ensure_user(&worker, Role::Worker, now);
            new_store.tasks.insert(task, record.clone());

            Ok(TransitionResult {
                new_store,
                outcome: Outcome::InterestRecorded(record),
            })
        }
        Command::Award {
            task,
            requester,
            worker,
        } => {
            let Some(current) = store.task(&task) else {
                return Err(DomainError::TaskNotFound(task).into());
            };
            if current.requester != requester {
                return Err(DomainError::NotRequester.into());
            }
            if current.status != TaskStatus::Open {
                return Err(DomainError::TaskNotOpen {
                    status: current.status,
                }
                .into());
            }

            let mut record: Task = current.clone();
            record.status = TaskStatus::Awarded;
            record.awarded_to = Some(worker.clone());
            record.updated_at = now;
            // Start the staleness clock.
            record.last_update_at = Some(now);
            record.record(
                HistoryEntry::new(now, HistoryEvent::Award, requester.to_string())
                    .with_target(worker.to_string()),
            );

            let mut new_store: Store = store.clone();
            new_store.ensure_user(&worker, Role::Worker, now);
            new_store.tasks.insert(task, record.clone());

            Ok(TransitionResult {
                new_store,
                outcome: Outcome::TaskAwarded(record),
            })
        }
        Command::PostUpdate {
            task,
            worker,
            message,
            eta,
        } => {
            let Some(current) = store.task(&task) else {
                return Err(DomainError::TaskNotFound(task).into());
            };
            // Only the awarded worker may post updates, and only after award.
            if current.awarded_to.as_ref() != Some(&worker) {
                return Err(DomainError::NotAwardedWorker.into());
            }
            if !current.status.is_in_progress() {
                return Err(DomainError::TaskNotInProgress {
                    status: current.status,
                }
                .into());
            }

            let update: ProgressUpdate = ProgressUpdate {
                by: worker.clone(),
                message,
                eta,
                at: now,
            };

            let mut record: Task = current.clone();
            record.updates.push(update.clone());
            record.last_update_at = Some(update.at);
            record.updated_at = now;
            let mut entry: HistoryEntry =
                HistoryEntry::new(now, HistoryEvent::Update, worker.to_string());
            if let Some(data) = history_data(&update) {
                entry = entry.with_data(data);
            }
            record.record(entry);

            let mut new_store: Store = store.clone();
            new_store.tasks.insert(task, record.clone());

            Ok(TransitionResult {
                new_store,
                outcome: Outcome::UpdatePosted {
                    task: record,
                    update,
                },
            })
        }
        Command::Submit {
            task,
            worker,
            result,
        } => {
            let Some(current) = store.task(&task) else {
                return Err(DomainError::TaskNotFound(task).into());
            };
            if current.status != TaskStatus::Awarded {
                return Err(DomainError::TaskNotAwarded {
                    status: current.status,
                }
                .into());
            }
            if current.awarded_to.as_ref() != Some(&worker) {
                return Err(DomainError::NotAwardedWorker.into());
            }

            let mut record: Task = current.clone();
            record.status = TaskStatus::Submitted;
            record.submission = Some(Submission {
                worker: worker.clone(),
                result,
                at: now,
            });
            record.updated_at = now;
            record.record(HistoryEntry::new(
                now,
                HistoryEvent::Submit,
                worker.to_string(),
            ));

            let mut new_store: Store = store.clone();
            new_store.tasks.insert(task, record.clone());

            Ok(TransitionResult {
                new_store,
                outcome: Outcome::ResultSubmitted(record),
            })
        }
        Command::Approve { task, requester } => {
            let Some(current) = store.task(&task) else {
                return Err(DomainError::TaskNotFound(task).into());
            };
            if current.requester != requester {
                return Err(DomainError::NotRequester.into());
            }
            if current.status != TaskStatus::Submitted {
                return Err(DomainError::TaskNotSubmitted {
                    status: current.status,
                }
                .into());
            }

            let mut record: Task = current.clone();
            record.status = TaskStatus::Approved;
            record.updated_at = now;
            record.record(HistoryEntry::new(
                now,
                HistoryEvent::Approve,
                requester.to_string(),
            ));

            let mut new_store: Store = store.clone();
            // Exactly one reputation credit per approval; the submitted-status
            // guard above makes approval single-shot per task.
            if let Some(worker) = record.awarded_to.clone() {
                if let Some(user) = new_store.users.get_mut(&worker) {
                    user.reputation.record_approval();
                }
            }
            new_store.tasks.insert(task, record.clone());

            Ok(TransitionResult {
                new_store,
                outcome: Outcome::TaskApproved(record),
            })
        }
        Command::MarkNudged { task } => {
            let Some(current) = store.task(&task) else {
                return Err(DomainError::TaskNotFound(task).into());
            };

            let mut record: Task = current.clone();
            record.last_nudged_at = Some(now);
            record.updated_at = now;
            record.record(HistoryEntry::new(
                now,
                HistoryEvent::Nudged,
                HistoryEntry::SYSTEM_ACTOR.to_owned(),
            ));

            let mut new_store: Store = store.clone();
            new_store.tasks.insert(task, record.clone());

            Ok(TransitionResult {
                new_store,
                outcome: Outcome::NudgeMarked(record),
            })
        }
    }
}
