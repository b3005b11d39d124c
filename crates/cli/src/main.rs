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
#![allow(clippy::multiple_crate_versions)]

use clap::error::ErrorKind;
use clap::{ArgAction, Parser, Subcommand};
use gigboard::Store;
use gigboard_api::{
    AcceptRequest, ApiError, ApiResult, ApproveRequest, AvailabilityRequest, AwardRequest,
    CreateTaskRequest, FailureReply, MarkNudgedRequest, PostUpdateRequest, ProposeRequest,
    RegisterRequest, SubmitRequest, accept_task, approve_task, award_task, create_task,
    fetch_task, mark_nudged, open_task_listing, post_update, propose, register_user,
    set_availability, stale_awarded_tasks, submit_result, system_status,
};
use gigboard_domain::{Role, now};
use gigboard_persistence::FileStore;
use serde::Serialize;
use std::path::PathBuf;
use tracing::error;

/// gigboard - command front end for the gigboard task marketplace
///
/// Every subcommand prints a single JSON envelope to stdout. Lifecycle
/// rejections are part of the protocol and still exit 0; only operational
/// faults (unreadable store, failed write) exit non-zero.
#[derive(Parser, Debug)]
#[command(name = "gigboard", author, version, about, long_about = None)]
struct Args {
    /// Path to the JSON store document
    #[arg(short, long, default_value = "state/gigboard.json", global = true)]
    store: PathBuf,

    #[command(subcommand)]
    command: CliCommand,
}

/// Parses a role argument through the domain rule.
fn parse_role(raw: &str) -> Result<Role, String> {
    Role::parse(raw).map_err(|err| err.to_string())
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Create the store document if it does not exist yet
    Init,
    /// Register a user, or rewrite the role of an existing one
    Register {
        /// Phone identity, normalized before use
        #[arg(long)]
        phone: String,
        /// Declared role: worker, requester, or both
        #[arg(long, default_value = "both", value_parser = parse_role)]
        role: Role,
    },
    /// Set a user's availability flag
    Availability {
        /// Phone identity, normalized before use
        #[arg(long)]
        phone: String,
        /// The flag value
        #[arg(long, action = ArgAction::Set)]
        available: bool,
    },
    /// Create a new open task
    CreateTask {
        /// The posting identity
        #[arg(long)]
        requester: String,
        /// Short description of the work
        #[arg(long)]
        title: String,
        /// Full instructions for the worker
        #[arg(long)]
        instructions: String,
        /// Offered budget; must be non-negative
        #[arg(long)]
        budget: f64,
        /// Category label
        #[arg(long, default_value = "general")]
        category: String,
        /// Freeform deadline
        #[arg(long)]
        deadline: Option<String>,
    },
    /// List open tasks, newest first
    OpenTasks {
        /// Maximum number of tasks to print
        #[arg(long)]
        limit: Option<usize>,
        /// Exclude this identity's own postings
        #[arg(long)]
        viewer: Option<String>,
    },
    /// Fetch one task, redacted for uninvolved viewers
    Task {
        /// The task id
        #[arg(long)]
        task: String,
        /// Identity reading the task
        #[arg(long)]
        viewer: Option<String>,
    },
    /// Submit a proposal on an open task
    Propose {
        /// The task id
        #[arg(long)]
        task: String,
        /// The proposing identity
        #[arg(long)]
        worker: String,
        /// Offered price; must be non-negative
        #[arg(long)]
        price: f64,
        /// Estimated completion
        #[arg(long)]
        eta: Option<String>,
        /// Note to the requester
        #[arg(long)]
        note: Option<String>,
    },
    /// Register interest in an open task
    Accept {
        /// The task id
        #[arg(long)]
        task: String,
        /// The interested identity
        #[arg(long)]
        worker: String,
    },
    /// Award a task to a worker
    Award {
        /// The task id
        #[arg(long)]
        task: String,
        /// The caller; must be the task's requester
        #[arg(long)]
        requester: String,
        /// The selected worker
        #[arg(long)]
        worker: String,
    },
    /// Post a progress update as the awarded worker
    Update {
        /// The task id
        #[arg(long)]
        task: String,
        /// The caller; must be the awarded worker
        #[arg(long)]
        worker: String,
        /// The update text
        #[arg(long)]
        message: String,
        /// Revised estimate
        #[arg(long)]
        eta: Option<String>,
    },
    /// Deliver the result of an awarded task
    Submit {
        /// The task id
        #[arg(long)]
        task: String,
        /// The caller; must be the awarded worker
        #[arg(long)]
        worker: String,
        /// The result payload
        #[arg(long)]
        result: String,
    },
    /// Approve a submitted result
    Approve {
        /// The task id
        #[arg(long)]
        task: String,
        /// The caller; must be the task's requester
        #[arg(long)]
        requester: String,
    },
    /// Print store counts
    Status,
    /// List stalled awarded tasks that have not been nudged
    NeedsNudge {
        /// Silence threshold in seconds
        #[arg(long, default_value_t = 86_400)]
        silence_seconds: i64,
        /// Maximum number of tasks to print
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Set the one-shot nudge marker on a task
    MarkNudged {
        /// The task id
        #[arg(long)]
        task: String,
    },
}

/// Envelope for `init`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InitReply {
    /// Success flag; always true.
    ok: bool,
    /// Where the store document lives.
    state_path: String,
}

/// Runs one mutating operation under the load-apply-save cycle.
///
/// Lifecycle rejections become the shared failure envelope; only load/save
/// faults propagate.
fn mutate<T: Serialize>(
    file_store: &FileStore,
    op: impl FnOnce(&Store) -> Result<ApiResult<T>, ApiError>,
) -> Result<String, Box<dyn std::error::Error>> {
    let store: Store = file_store.load()?;
    match op(&store) {
        Ok(result) => {
            file_store.save(&result.new_store)?;
            Ok(serde_json::to_string(&result.response)?)
        }
        Err(err) => Ok(serde_json::to_string(&FailureReply::from(&err))?),
    }
}

/// Executes a subcommand and returns the JSON envelope to print.
fn execute(
    command: CliCommand,
    file_store: &FileStore,
) -> Result<String, Box<dyn std::error::Error>> {
    let ts: i64 = now();
    match command {
        CliCommand::Init => {
            let store: Store = file_store.load()?;
            file_store.save(&store)?;
            Ok(serde_json::to_string(&InitReply {
                ok: true,
                state_path: file_store.path().display().to_string(),
            })?)
        }
        CliCommand::Register { phone, role } => mutate(file_store, |store| {
            register_user(store, &RegisterRequest { phone, role }, ts)
        }),
        CliCommand::Availability { phone, available } => mutate(file_store, |store| {
            set_availability(store, &AvailabilityRequest { phone, available }, ts)
        }),
        CliCommand::CreateTask {
            requester,
            title,
            instructions,
            budget,
            category,
            deadline,
        } => mutate(file_store, |store| {
            create_task(
                store,
                &CreateTaskRequest {
                    requester,
                    title,
                    instructions,
                    budget,
                    category,
                    deadline,
                },
                ts,
            )
        }),
        CliCommand::OpenTasks { limit, viewer } => {
            let store: Store = file_store.load()?;
            Ok(serde_json::to_string(&open_task_listing(
                &store,
                viewer.as_deref(),
                limit,
            ))?)
        }
        CliCommand::Task { task, viewer } => {
            let store: Store = file_store.load()?;
            match fetch_task(&store, &task, viewer.as_deref()) {
                Ok(reply) => Ok(serde_json::to_string(&reply)?),
                Err(err) => Ok(serde_json::to_string(&FailureReply::from(&err))?),
            }
        }
        CliCommand::Propose {
            task,
            worker,
            price,
            eta,
            note,
        } => mutate(file_store, |store| {
            propose(
                store,
                &ProposeRequest {
                    task,
                    worker,
                    price,
                    eta,
                    note,
                },
                ts,
            )
        }),
        CliCommand::Accept { task, worker } => mutate(file_store, |store| {
            accept_task(store, &AcceptRequest { task, worker }, ts)
        }),
        CliCommand::Award {
            task,
            requester,
            worker,
        } => mutate(file_store, |store| {
            award_task(
                store,
                &AwardRequest {
                    task,
                    requester,
                    worker,
                },
                ts,
            )
        }),
        CliCommand::Update {
            task,
            worker,
            message,
            eta,
        } => mutate(file_store, |store| {
            post_update(
                store,
                &PostUpdateRequest {
                    task,
                    worker,
                    message,
                    eta,
                },
                ts,
            )
        }),
        CliCommand::Submit {
            task,
            worker,
            result,
        } => mutate(file_store, |store| {
            submit_result(
                store,
                &SubmitRequest {
                    task,
                    worker,
                    result,
                },
                ts,
            )
        }),
        CliCommand::Approve { task, requester } => mutate(file_store, |store| {
            approve_task(store, &ApproveRequest { task, requester }, ts)
        }),
        CliCommand::Status => {
            let store: Store = file_store.load()?;
            Ok(serde_json::to_string(&system_status(&store, ts))?)
        }
        CliCommand::NeedsNudge {
            silence_seconds,
            limit,
        } => {
            let store: Store = file_store.load()?;
            Ok(serde_json::to_string(&stale_awarded_tasks(
                &store,
                ts,
                silence_seconds,
                limit,
            ))?)
        }
        CliCommand::MarkNudged { task } => mutate(file_store, |store| {
            mark_nudged(store, &MarkNudgedRequest { task }, ts)
        }),
    }
}

fn main() {
    // Logs go to stderr; stdout carries exactly one JSON document.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if err.kind() == ErrorKind::InvalidSubcommand => {
            // Unknown subcommands are part of the protocol surface.
            println!("{}", r#"{"ok":false,"error":"unknown_cmd"}"#);
            std::process::exit(2);
        }
        Err(err) => err.exit(),
    };

    let file_store: FileStore = FileStore::new(args.store);
    match execute(args.command, &file_store) {
        Ok(output) => println!("{output}"),
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::TempDir;

    fn test_store(dir: &TempDir) -> FileStore {
        FileStore::new(dir.path().join("gigboard.json"))
    }

    fn run(command: CliCommand, file_store: &FileStore) -> Value {
        let output: String = execute(command, file_store).expect("command executes");
        serde_json::from_str(&output).expect("output is one JSON document")
    }

    #[test]
    fn test_init_creates_the_store_document() {
        let dir: TempDir = TempDir::new().unwrap();
        let file_store: FileStore = test_store(&dir);

        let value: Value = run(CliCommand::Init, &file_store);
        assert_eq!(value["ok"], serde_json::json!(true));
        assert!(dir.path().join("gigboard.json").exists());
    }

    #[test]
    fn test_register_prints_the_user_envelope() {
        let dir: TempDir = TempDir::new().unwrap();
        let file_store: FileStore = test_store(&dir);

        let value: Value = run(
            CliCommand::Register {
                phone: String::from("316 1111 1111"),
                role: Role::Worker,
            },
            &file_store,
        );
        assert_eq!(value["ok"], serde_json::json!(true));
        assert_eq!(value["user"]["phone"], serde_json::json!("+31611111111"));
        assert_eq!(value["user"]["role"], serde_json::json!("worker"));
    }

    #[test]
    fn test_full_lifecycle_through_the_command_surface() {
        let dir: TempDir = TempDir::new().unwrap();
        let file_store: FileStore = test_store(&dir);

        let created: Value = run(
            CliCommand::CreateTask {
                requester: String::from("+31611111111"),
                title: String::from("Paint the fence"),
                instructions: String::from("White, two coats"),
                budget: 20.0,
                category: String::from("general"),
                deadline: None,
            },
            &file_store,
        );
        assert_eq!(created["task"]["id"], serde_json::json!("T000001"));
        assert_eq!(created["task"]["status"], serde_json::json!("open"));

        let proposed: Value = run(
            CliCommand::Propose {
                task: String::from("T000001"),
                worker: String::from("+31622222222"),
                price: 15.0,
                eta: Some(String::from("2h")),
                note: None,
            },
            &file_store,
        );
        assert_eq!(proposed["proposal"]["price"], serde_json::json!(15.0));

        let awarded: Value = run(
            CliCommand::Award {
                task: String::from("T000001"),
                requester: String::from("+31611111111"),
                worker: String::from("+31622222222"),
            },
            &file_store,
        );
        assert_eq!(awarded["task"]["status"], serde_json::json!("awarded"));

        let submitted: Value = run(
            CliCommand::Submit {
                task: String::from("T000001"),
                worker: String::from("+31622222222"),
                result: String::from("done"),
            },
            &file_store,
        );
        assert_eq!(submitted["task"]["status"], serde_json::json!("submitted"));

        let approved: Value = run(
            CliCommand::Approve {
                task: String::from("T000001"),
                requester: String::from("+31611111111"),
            },
            &file_store,
        );
        assert_eq!(approved["task"]["status"], serde_json::json!("approved"));

        let status: Value = run(CliCommand::Status, &file_store);
        assert_eq!(status["counts"]["open_tasks"], serde_json::json!(0));
        assert_eq!(status["counts"]["users"], serde_json::json!(2));
    }

    #[test]
    fn test_lifecycle_rejection_prints_the_failure_envelope() {
        let dir: TempDir = TempDir::new().unwrap();
        let file_store: FileStore = test_store(&dir);

        let value: Value = run(
            CliCommand::Approve {
                task: String::from("T999999"),
                requester: String::from("+31611111111"),
            },
            &file_store,
        );
        assert_eq!(
            value,
            serde_json::json!({"ok": false, "error": "task_not_found"})
        );
    }

    #[test]
    fn test_open_tasks_and_task_fetch() {
        let dir: TempDir = TempDir::new().unwrap();
        let file_store: FileStore = test_store(&dir);
        run(
            CliCommand::CreateTask {
                requester: String::from("+31611111111"),
                title: String::from("Walk the dog"),
                instructions: String::from("Twice"),
                budget: 5.0,
                category: String::from("general"),
                deadline: None,
            },
            &file_store,
        );

        let listing: Value = run(
            CliCommand::OpenTasks {
                limit: None,
                viewer: None,
            },
            &file_store,
        );
        assert_eq!(listing["tasks"].as_array().unwrap().len(), 1);

        let fetched: Value = run(
            CliCommand::Task {
                task: String::from("T000001"),
                viewer: None,
            },
            &file_store,
        );
        assert_eq!(fetched["task"]["title"], serde_json::json!("Walk the dog"));
        assert_eq!(fetched["redacted"], serde_json::json!(false));
    }

    #[test]
    fn test_needs_nudge_scan_and_mark() {
        let dir: TempDir = TempDir::new().unwrap();
        let file_store: FileStore = test_store(&dir);
        run(
            CliCommand::CreateTask {
                requester: String::from("+31611111111"),
                title: String::from("Stalls"),
                instructions: String::from("..."),
                budget: 5.0,
                category: String::from("general"),
                deadline: None,
            },
            &file_store,
        );
        run(
            CliCommand::Award {
                task: String::from("T000001"),
                requester: String::from("+31611111111"),
                worker: String::from("+31622222222"),
            },
            &file_store,
        );

        // Nothing has stalled yet against a day-long threshold.
        let scan: Value = run(
            CliCommand::NeedsNudge {
                silence_seconds: 86_400,
                limit: 20,
            },
            &file_store,
        );
        assert_eq!(scan["tasks"].as_array().unwrap().len(), 0);

        let marked: Value = run(
            CliCommand::MarkNudged {
                task: String::from("T000001"),
            },
            &file_store,
        );
        assert_eq!(marked["ok"], serde_json::json!(true));
        assert!(marked["task"]["lastNudgedAt"].is_i64());
    }
}
