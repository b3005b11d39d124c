// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    AwardRequest, CreateTaskRequest, SubmitRequest, award_task, create_task, submit_result,
};
use gigboard::Store;

pub const T0: i64 = 1_700_000_000;
pub const REQUESTER: &str = "+31611111111";
pub const WORKER: &str = "+31622222222";
pub const STRANGER: &str = "+31633333333";

pub fn create_request(title: &str) -> CreateTaskRequest {
    CreateTaskRequest {
        requester: String::from(REQUESTER),
        title: String::from(title),
        instructions: String::from("..."),
        budget: 20.0,
        category: String::from("general"),
        deadline: None,
    }
}

/// A store with one open task `T000001`.
pub fn store_with_open_task() -> Store {
    let store: Store = Store::new(T0);
    create_task(&store, &create_request("Paint the fence"), T0)
        .expect("create accepted")
        .new_store
}

/// A store with `T000001` awarded to [`WORKER`].
pub fn store_with_awarded_task() -> Store {
    let store: Store = store_with_open_task();
    award_task(
        &store,
        &AwardRequest {
            task: String::from("T000001"),
            requester: String::from(REQUESTER),
            worker: String::from(WORKER),
        },
        T0 + 1,
    )
    .expect("award accepted")
    .new_store
}

/// A store with `T000001` submitted by [`WORKER`].
pub fn store_with_submitted_task() -> Store {
    let store: Store = store_with_awarded_task();
    submit_result(
        &store,
        &SubmitRequest {
            task: String::from("T000001"),
            worker: String::from(WORKER),
            result: String::from("done"),
        },
        T0 + 2,
    )
    .expect("submit accepted")
    .new_store
}
