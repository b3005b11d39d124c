// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{PhoneNumber, Role, Task, TaskId, TaskStatus, User};

fn create_test_task(now: i64) -> Task {
    Task::new(
        TaskId::from_seq(1),
        PhoneNumber::normalize("+31611111111"),
        String::from("Paint the fence"),
        String::from("White, two coats"),
        20.0,
        String::from("general"),
        None,
        now,
    )
}

#[test]
fn test_task_id_from_seq_is_zero_padded() {
    assert_eq!(TaskId::from_seq(1).as_str(), "T000001");
    assert_eq!(TaskId::from_seq(42).as_str(), "T000042");
    assert_eq!(TaskId::from_seq(1_234_567).as_str(), "T1234567");
}

#[test]
fn test_task_id_new_trims_input() {
    assert_eq!(TaskId::new(" T000001 ").as_str(), "T000001");
}

#[test]
fn test_status_only_advances_forward() {
    assert!(TaskStatus::Open.can_transition_to(TaskStatus::Awarded));
    assert!(TaskStatus::Awarded.can_transition_to(TaskStatus::Submitted));
    assert!(TaskStatus::Submitted.can_transition_to(TaskStatus::Approved));

    assert!(!TaskStatus::Awarded.can_transition_to(TaskStatus::Open));
    assert!(!TaskStatus::Open.can_transition_to(TaskStatus::Submitted));
    assert!(!TaskStatus::Approved.can_transition_to(TaskStatus::Open));
    assert!(!TaskStatus::Approved.can_transition_to(TaskStatus::Awarded));
}

#[test]
fn test_status_in_progress_window() {
    assert!(!TaskStatus::Open.is_in_progress());
    assert!(TaskStatus::Awarded.is_in_progress());
    assert!(TaskStatus::Submitted.is_in_progress());
    assert!(!TaskStatus::Approved.is_in_progress());
}

#[test]
fn test_status_wire_names() {
    assert_eq!(TaskStatus::Open.as_str(), "open");
    assert_eq!(TaskStatus::Awarded.as_str(), "awarded");
    assert_eq!(TaskStatus::Submitted.as_str(), "submitted");
    assert_eq!(TaskStatus::Approved.as_str(), "approved");
}

#[test]
fn test_role_parse_round_trip() {
    for role in [Role::Worker, Role::Requester, Role::Both] {
        assert_eq!(Role::parse(role.as_str()), Ok(role));
    }
}

#[test]
fn test_role_parse_rejects_unknown() {
    assert!(Role::parse("admin").is_err());
}

#[test]
fn test_role_default_is_both() {
    assert_eq!(Role::default(), Role::Both);
}

#[test]
fn test_new_user_starts_with_zeroed_reputation() {
    let user: User = User::new(PhoneNumber::normalize("+316"), Role::Worker, 100);
    assert_eq!(user.reputation.approved, 0);
    assert_eq!(user.reputation.rejected, 0);
    assert_eq!(user.available, None);
    assert_eq!(user.created_at, 100);
    assert_eq!(user.updated_at, 100);
}

#[test]
fn test_new_task_is_open_and_empty() {
    let task: Task = create_test_task(100);
    assert_eq!(task.status, TaskStatus::Open);
    assert!(task.proposals.is_empty());
    assert!(task.accepted_by.is_empty());
    assert_eq!(task.awarded_to, None);
    assert_eq!(task.submission, None);
    assert!(task.updates.is_empty());
    assert_eq!(task.last_update_at, None);
    assert_eq!(task.last_nudged_at, None);
    assert!(task.history.is_empty());
}

#[test]
fn test_participant_check_covers_requester_and_awarded_worker() {
    let mut task: Task = create_test_task(100);
    let requester: PhoneNumber = PhoneNumber::normalize("+31611111111");
    let worker: PhoneNumber = PhoneNumber::normalize("+31622222222");
    let stranger: PhoneNumber = PhoneNumber::normalize("+31633333333");

    assert!(task.is_participant(&requester));
    assert!(!task.is_participant(&worker));

    task.awarded_to = Some(worker.clone());
    assert!(task.is_participant(&worker));
    assert!(!task.is_participant(&stranger));
}

#[test]
fn test_staleness_reference_takes_latest_instant() {
    let mut task: Task = create_test_task(100);
    assert_eq!(task.staleness_reference(), 100);

    task.updated_at = 150;
    assert_eq!(task.staleness_reference(), 150);

    task.last_update_at = Some(200);
    assert_eq!(task.staleness_reference(), 200);

    // A later bookkeeping touch dominates an older progress update.
    task.updated_at = 250;
    assert_eq!(task.staleness_reference(), 250);
}

#[test]
fn test_task_serializes_with_camel_case_keys() {
    let task: Task = create_test_task(100);
    let value = serde_json::to_value(&task).unwrap();

    assert!(value.get("acceptedBy").is_some());
    assert!(value.get("awardedTo").is_some());
    assert!(value.get("lastUpdateAt").is_some());
    assert!(value.get("lastNudgedAt").is_some());
    assert!(value.get("createdAt").is_some());
    assert_eq!(value["status"], serde_json::json!("open"));
}

#[test]
fn test_reputation_serializes_with_camel_case_keys() {
    let user: User = User::new(PhoneNumber::normalize("+316"), Role::Both, 1);
    let value = serde_json::to_value(&user).unwrap();

    assert!(value["reputation"].get("onTime").is_some());
    // Unset availability is omitted from the document entirely.
    assert!(value.get("available").is_none());
}
