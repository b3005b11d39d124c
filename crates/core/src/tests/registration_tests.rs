// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for user registration, lazy participant creation, and the
//! availability flag.

use crate::{Command, Outcome, Store, TransitionResult};
use gigboard_domain::{Role, User};

use super::helpers::{T0, apply_ok, phone, requester, store_with_open_task, worker};

#[test]
fn test_register_creates_a_user() {
    let store: Store = Store::new(T0);
    let result: TransitionResult = apply_ok(
        &store,
        Command::Register {
            phone: phone("+31611111111"),
            role: Role::Worker,
        },
        T0,
    );

    let Outcome::UserUpserted(user) = result.outcome else {
        panic!("expected UserUpserted outcome");
    };
    assert_eq!(user.role, Role::Worker);
    assert_eq!(user.created_at, T0);
    assert!(result.new_store.user(&phone("+31611111111")).is_some());
}

#[test]
fn test_reregister_rewrites_role_but_keeps_history() {
    let store: Store = Store::new(T0);
    let store: Store = apply_ok(
        &store,
        Command::Register {
            phone: worker(),
            role: Role::Worker,
        },
        T0,
    )
    .new_store;

    let result: TransitionResult = apply_ok(
        &store,
        Command::Register {
            phone: worker(),
            role: Role::Both,
        },
        T0 + 50,
    );
    let user: User = result
        .new_store
        .user(&worker())
        .expect("user still registered")
        .clone();

    assert_eq!(user.role, Role::Both);
    // First registration instant and counters survive a re-register.
    assert_eq!(user.created_at, T0);
    assert_eq!(user.updated_at, T0 + 50);
    assert_eq!(user.reputation.approved, 0);
}

#[test]
fn test_availability_is_last_writer_wins_and_autoregisters() {
    let store: Store = Store::new(T0);
    let store: Store = apply_ok(
        &store,
        Command::SetAvailability {
            phone: worker(),
            available: true,
        },
        T0,
    )
    .new_store;

    let user: User = store.user(&worker()).expect("auto-registered").clone();
    assert_eq!(user.available, Some(true));
    assert_eq!(user.role, Role::Both);

    let store: Store = apply_ok(
        &store,
        Command::SetAvailability {
            phone: worker(),
            available: false,
        },
        T0 + 1,
    )
    .new_store;
    assert_eq!(
        store.user(&worker()).expect("still registered").available,
        Some(false)
    );
}

#[test]
fn test_create_task_autoregisters_the_requester() {
    let (store, _) = store_with_open_task();
    let user: User = store.user(&requester()).expect("auto-registered").clone();
    assert_eq!(user.role, Role::Requester);
}

#[test]
fn test_propose_autoregisters_the_worker() {
    let (store, id) = store_with_open_task();
    let store: Store = apply_ok(
        &store,
        Command::Propose {
            task: id,
            worker: worker(),
            price: 15.0,
            eta: None,
            note: None,
        },
        T0 + 1,
    )
    .new_store;
    let user: User = store.user(&worker()).expect("auto-registered").clone();
    assert_eq!(user.role, Role::Worker);
}

#[test]
fn test_lazy_creation_does_not_overwrite_existing_users() {
    let store: Store = Store::new(T0);
    let store: Store = apply_ok(
        &store,
        Command::Register {
            phone: requester(),
            role: Role::Both,
        },
        T0,
    )
    .new_store;

    let store: Store = apply_ok(
        &store,
        Command::CreateTask {
            requester: requester(),
            title: String::from("Paint"),
            instructions: String::from("..."),
            budget: 5.0,
            category: String::from("general"),
            deadline: None,
        },
        T0 + 1,
    )
    .new_store;

    // The explicit registration wins over the lazy default.
    assert_eq!(
        store.user(&requester()).expect("registered").role,
        Role::Both
    );
}
