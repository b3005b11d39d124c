// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Command, Store, TransitionResult, apply};
use gigboard_domain::{PhoneNumber, TaskId};

/// A fixed base instant for deterministic tests.
pub const T0: i64 = 1_700_000_000;

pub fn phone(raw: &str) -> PhoneNumber {
    PhoneNumber::normalize(raw)
}

pub fn requester() -> PhoneNumber {
    phone("+31611111111")
}

pub fn worker() -> PhoneNumber {
    phone("+31622222222")
}

pub fn apply_ok(store: &Store, command: Command, now: i64) -> TransitionResult {
    apply(store, command, now).expect("command should be accepted")
}

/// Creates a store holding one open task posted by [`requester`].
pub fn store_with_open_task() -> (Store, TaskId) {
    let store: Store = Store::new(T0);
    let result: TransitionResult = apply_ok(
        &store,
        Command::CreateTask {
            requester: requester(),
            title: String::from("Paint the fence"),
            instructions: String::from("White, two coats"),
            budget: 20.0,
            category: String::from("general"),
            deadline: None,
        },
        T0,
    );
    let id: TaskId = TaskId::from_seq(1);
    (result.new_store, id)
}

/// Creates a store holding one task awarded to [`worker`] at `awarded_at`.
pub fn store_with_awarded_task(awarded_at: i64) -> (Store, TaskId) {
    let (store, id) = store_with_open_task();
    let result: TransitionResult = apply_ok(
        &store,
        Command::Award {
            task: id.clone(),
            requester: requester(),
            worker: worker(),
        },
        awarded_at,
    );
    (result.new_store, id)
}

/// Creates a store holding one task submitted by [`worker`].
pub fn store_with_submitted_task() -> (Store, TaskId) {
    let (store, id) = store_with_awarded_task(T0 + 10);
    let result: TransitionResult = apply_ok(
        &store,
        Command::Submit {
            task: id.clone(),
            worker: worker(),
            result: String::from("done"),
        },
        T0 + 20,
    );
    (result.new_store, id)
}
