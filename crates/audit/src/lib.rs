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

use serde::{Deserialize, Serialize};

/// The kind of event recorded in a task's history trail.
///
/// Every accepted mutation of a task appends exactly one entry carrying one
/// of these event kinds. The set is closed: there is no free-form event name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryEvent {
    /// The task was created by its requester.
    Created,
    /// A worker submitted a proposal while the task was open.
    Proposal,
    /// A worker registered interest while the task was open.
    Accept,
    /// The requester selected a worker, starting the in-progress clock.
    Award,
    /// The awarded worker posted a progress update.
    Update,
    /// The awarded worker submitted the result.
    Submit,
    /// The requester approved the submitted result.
    Approve,
    /// The admin scanner flagged the task as stalled and marked it nudged.
    Nudged,
}

impl HistoryEvent {
    /// Returns the wire representation of this event kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Proposal => "proposal",
            Self::Accept => "accept",
            Self::Award => "award",
            Self::Update => "update",
            Self::Submit => "submit",
            Self::Approve => "approve",
            Self::Nudged => "nudged",
        }
    }
}

impl std::fmt::Display for HistoryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry in a task's append-only history trail.
///
/// Entries are immutable once appended and are never rewritten or pruned.
/// They capture when the event happened, what it was, which identity caused
/// it, and (for events that carry one) a rendering of the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Epoch seconds at which the event was accepted.
    pub at: i64,
    /// The kind of event.
    pub event: HistoryEvent,
    /// The normalized identity that caused the event, or `system` for
    /// scanner-driven events.
    pub by: String,
    /// The identity the event was directed at (awards only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// A rendering of the event payload (proposals and progress updates).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl HistoryEntry {
    /// The `by` value used for events not caused by a participant.
    pub const SYSTEM_ACTOR: &'static str = "system";

    /// Creates a new entry with no target and no payload.
    #[must_use]
    pub const fn new(at: i64, event: HistoryEvent, by: String) -> Self {
        Self {
            at,
            event,
            by,
            to: None,
            data: None,
        }
    }

    /// Attaches the identity this event was directed at.
    #[must_use]
    pub fn with_target(mut self, to: String) -> Self {
        self.to = Some(to);
        self
    }

    /// Attaches a rendering of the event payload.
    #[must_use]
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation_requires_all_fields() {
        let entry: HistoryEntry =
            HistoryEntry::new(1_700_000_000, HistoryEvent::Created, String::from("+316"));

        assert_eq!(entry.at, 1_700_000_000);
        assert_eq!(entry.event, HistoryEvent::Created);
        assert_eq!(entry.by, "+316");
        assert_eq!(entry.to, None);
        assert_eq!(entry.data, None);
    }

    #[test]
    fn test_entry_with_target() {
        let entry: HistoryEntry =
            HistoryEntry::new(1, HistoryEvent::Award, String::from("+31611111111"))
                .with_target(String::from("+31622222222"));

        assert_eq!(entry.to, Some(String::from("+31622222222")));
    }

    #[test]
    fn test_entry_with_data() {
        let entry: HistoryEntry =
            HistoryEntry::new(1, HistoryEvent::Proposal, String::from("+316"))
                .with_data(serde_json::json!({"price": 15.0}));

        assert_eq!(entry.data, Some(serde_json::json!({"price": 15.0})));
    }

    #[test]
    fn test_event_wire_names_are_lowercase() {
        assert_eq!(HistoryEvent::Created.as_str(), "created");
        assert_eq!(HistoryEvent::Proposal.as_str(), "proposal");
        assert_eq!(HistoryEvent::Accept.as_str(), "accept");
        assert_eq!(HistoryEvent::Award.as_str(), "award");
        assert_eq!(HistoryEvent::Update.as_str(), "update");
        assert_eq!(HistoryEvent::Submit.as_str(), "submit");
        assert_eq!(HistoryEvent::Approve.as_str(), "approve");
        assert_eq!(HistoryEvent::Nudged.as_str(), "nudged");
    }

    #[test]
    fn test_entry_serializes_without_empty_optionals() {
        let entry: HistoryEntry =
            HistoryEntry::new(42, HistoryEvent::Submit, String::from("+316"));
        let value = serde_json::to_value(&entry).unwrap();

        assert_eq!(
            value,
            serde_json::json!({"at": 42, "event": "submit", "by": "+316"})
        );
    }

    #[test]
    fn test_entry_round_trips_through_json() {
        let entry: HistoryEntry =
            HistoryEntry::new(7, HistoryEvent::Award, String::from("+31611111111"))
                .with_target(String::from("+31622222222"));

        let encoded = serde_json::to_string(&entry).unwrap();
        let decoded: HistoryEntry = serde_json::from_str(&encoded).unwrap();

        assert_eq!(entry, decoded);
    }
}
