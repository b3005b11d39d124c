// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::store::{Store, StoreCounts};
use gigboard_domain::{PhoneNumber, Task, TaskId, TaskStatus, Timestamp};
use serde::{Deserialize, Serialize};

/// Default cap on open-task listings.
pub const DEFAULT_OPEN_TASK_LIMIT: usize = 50;

/// Lists open tasks, newest-created first.
///
/// Ties on `created_at` keep insertion order: iteration is id-ordered, ids
/// are assigned monotonically, and the sort is stable. When a viewer is
/// given, their own postings are excluded so a user browsing as a
/// prospective worker does not see their own tasks.
#[must_use]
pub fn open_tasks(store: &Store, viewer: Option<&PhoneNumber>, limit: usize) -> Vec<Task> {
    let mut tasks: Vec<Task> = store
        .tasks
        .values()
        .filter(|task| task.status == TaskStatus::Open)
        .filter(|task| viewer.is_none_or(|viewer| &task.requester != viewer))
        .cloned()
        .collect();
    tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    tasks.truncate(limit);
    tasks
}

/// Returns the aggregate counts reported by the status surface.
#[must_use]
pub fn status_counts(store: &Store) -> StoreCounts {
    store.counts()
}

/// One stalled awarded task surfaced to the notifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaleTask {
    /// The stalled task.
    pub task: TaskId,
    /// The task title, for the reminder message.
    pub title: String,
    /// The awarded worker to nudge.
    pub worker: PhoneNumber,
    /// The requester to notify.
    pub requester: PhoneNumber,
}

/// Scans for awarded tasks with no progress for longer than
/// `silence_seconds` that have not been nudged before.
///
/// Staleness is measured against the latest of the last progress update,
/// the last mutation, and creation. Tasks whose one-shot `last_nudged_at`
/// marker is set never reappear, regardless of further elapsed time.
/// Returns at most `limit` entries in store iteration order; callers must
/// not depend on the ordering.
#[must_use]
pub fn find_stale(
    store: &Store,
    now: Timestamp,
    silence_seconds: i64,
    limit: usize,
) -> Vec<StaleTask> {
    let mut stale: Vec<StaleTask> = Vec::new();
    for task in store.tasks.values() {
        if stale.len() >= limit {
            break;
        }
        if task.status != TaskStatus::Awarded || task.last_nudged_at.is_some() {
            continue;
        }
        let Some(worker) = &task.awarded_to else {
            // Unreachable for a well-formed store: awarded implies a worker.
            continue;
        };
        if now - task.staleness_reference() > silence_seconds {
            stale.push(StaleTask {
                task: task.id.clone(),
                title: task.title.clone(),
                worker: worker.clone(),
                requester: task.requester.clone(),
            });
        }
    }
    stale
}
