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

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use gigboard::Store;
use gigboard_api::{
    AcceptRequest, ApproveRequest, AvailabilityRequest, AwardRequest, CreateTaskRequest,
    FailureReply, MarkNudgedRequest, NeedsNudgeReply, OpenTasksReply, PostUpdateRequest,
    ProposeRequest, RegisterRequest, StatusReply, SubmitRequest, accept_task, approve_task,
    award_task, create_task, fetch_task, mark_nudged, open_task_listing, post_update, propose,
    register_user, set_availability, stale_awarded_tasks, submit_result, system_status,
};
use gigboard_domain::now;
use gigboard_persistence::{FileStore, PersistenceError};
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter, clock::DefaultClock};
use serde::Deserialize;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Keyless per-route rate limiter.
type RouteLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// gigboard server - HTTP front end for the gigboard task marketplace
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSON store document. Created on first mutation.
    #[arg(short, long, default_value = "state/gigboard.json")]
    store: PathBuf,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Allowed registrations per minute before 429
    #[arg(long, default_value_t = 5)]
    register_rate: u32,

    /// Allowed task creations per minute before 429
    #[arg(long, default_value_t = 10)]
    create_rate: u32,
}

/// Application state shared across handlers.
///
/// The file store sits behind a Mutex held for the full read-modify-write
/// cycle of every mutating handler; that single-writer discipline is what
/// prevents two concurrent mutations from losing each other's writes.
#[derive(Clone)]
struct AppState {
    /// The whole-document store.
    store: Arc<Mutex<FileStore>>,
    /// Write throttle for user registration.
    register_limiter: Arc<RouteLimiter>,
    /// Write throttle for task creation.
    create_limiter: Arc<RouteLimiter>,
}

impl AppState {
    /// Creates app state over the given store with per-minute write quotas.
    fn new(file_store: FileStore, register_rate: u32, create_rate: u32) -> Self {
        Self {
            store: Arc::new(Mutex::new(file_store)),
            register_limiter: Arc::new(RateLimiter::direct(Quota::per_minute(
                NonZeroU32::new(register_rate).unwrap_or(NonZeroU32::MIN),
            ))),
            create_limiter: Arc::new(RateLimiter::direct(Quota::per_minute(
                NonZeroU32::new(create_rate).unwrap_or(NonZeroU32::MIN),
            ))),
        }
    }
}

/// Query parameters for the open-task listing.
#[derive(Debug, Deserialize)]
struct OpenTasksQuery {
    /// Maximum number of tasks to return.
    limit: Option<usize>,
    /// Identity browsing the listing; their own postings are excluded.
    viewer: Option<String>,
}

/// Query parameters for a single-task fetch.
#[derive(Debug, Deserialize)]
struct TaskFetchQuery {
    /// Identity reading the task; uninvolved viewers get a redacted view.
    viewer: Option<String>,
}

/// Query parameters for the stalled-task scan.
#[derive(Debug, Deserialize)]
struct NeedsNudgeQuery {
    /// Silence threshold in seconds before an awarded task counts as
    /// stalled.
    #[serde(rename = "silenceSeconds", default = "default_silence_seconds")]
    silence_seconds: i64,
    /// Maximum number of tasks to return.
    #[serde(default = "default_nudge_limit")]
    limit: usize,
}

const fn default_silence_seconds() -> i64 {
    86_400
}

const fn default_nudge_limit() -> usize {
    20
}

/// HTTP error wrapper that implements `IntoResponse`.
///
/// Engine-reported failures are normally 200 envelopes (see the handlers);
/// this type carries the cases that do map to an HTTP status: not-found on
/// direct-resource fetches, rate limiting, and persistence faults.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The failure envelope body.
    body: FailureReply,
}

impl HttpError {
    /// 404 carrying the `task_not_found` envelope.
    fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: FailureReply::from_code("task_not_found"),
        }
    }

    /// 429 carrying the `rate_limited` envelope.
    fn rate_limited() -> Self {
        Self {
            status: StatusCode::TOO_MANY_REQUESTS,
            body: FailureReply::from_code("rate_limited"),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        error!(error = %err, "Persistence error");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: FailureReply::from_code("internal"),
        }
    }
}

/// Renders an engine-reported failure as a 200 envelope.
///
/// Kept for compatibility with the command surface: collection endpoints
/// report domain failures in the body, not the status line.
fn domain_failure(err: &gigboard_api::ApiError) -> Response {
    warn!(code = err.code(), "request rejected");
    Json(FailureReply::from(err)).into_response()
}

/// Handler for GET /status.
async fn handle_status(
    AxumState(state): AxumState<AppState>,
) -> Result<Json<StatusReply>, HttpError> {
    let guard = state.store.lock().await;
    let store: Store = guard.load()?;
    drop(guard);

    Ok(Json(system_status(&store, now())))
}

/// Handler for POST /users/register.
async fn handle_register(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Response, HttpError> {
    if state.register_limiter.check().is_err() {
        warn!(phone = %req.phone, "register rate limited");
        return Err(HttpError::rate_limited());
    }
    info!(phone = %req.phone, role = %req.role, "Handling register request");

    let guard = state.store.lock().await;
    let store: Store = guard.load()?;
    match register_user(&store, &req, now()) {
        Ok(result) => {
            guard.save(&result.new_store)?;
            drop(guard);
            Ok(Json(result.response).into_response())
        }
        Err(err) => {
            drop(guard);
            Ok(domain_failure(&err))
        }
    }
}

/// Handler for POST /users/availability.
async fn handle_availability(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<AvailabilityRequest>,
) -> Result<Response, HttpError> {
    info!(phone = %req.phone, available = req.available, "Handling availability request");

    let guard = state.store.lock().await;
    let store: Store = guard.load()?;
    match set_availability(&store, &req, now()) {
        Ok(result) => {
            guard.save(&result.new_store)?;
            drop(guard);
            Ok(Json(result.response).into_response())
        }
        Err(err) => {
            drop(guard);
            Ok(domain_failure(&err))
        }
    }
}

/// Handler for GET /tasks/open.
async fn handle_open_tasks(
    AxumState(state): AxumState<AppState>,
    Query(query): Query<OpenTasksQuery>,
) -> Result<Json<OpenTasksReply>, HttpError> {
    let guard = state.store.lock().await;
    let store: Store = guard.load()?;
    drop(guard);

    Ok(Json(open_task_listing(
        &store,
        query.viewer.as_deref(),
        query.limit,
    )))
}

/// Handler for GET /tasks/{id}.
///
/// Unlike the collection endpoints, a missing task here is a 404: the
/// resource itself is addressed by the path.
async fn handle_get_task(
    AxumState(state): AxumState<AppState>,
    Path(task_id): Path<String>,
    Query(query): Query<TaskFetchQuery>,
) -> Result<Response, HttpError> {
    let guard = state.store.lock().await;
    let store: Store = guard.load()?;
    drop(guard);

    match fetch_task(&store, &task_id, query.viewer.as_deref()) {
        Ok(reply) => Ok(Json(reply).into_response()),
        Err(err) if err.is_not_found() => Err(HttpError::not_found()),
        Err(err) => Ok(domain_failure(&err)),
    }
}

/// Handler for POST /tasks.
async fn handle_create_task(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<Response, HttpError> {
    if state.create_limiter.check().is_err() {
        warn!(requester = %req.requester, "task creation rate limited");
        return Err(HttpError::rate_limited());
    }
    info!(requester = %req.requester, title = %req.title, "Handling create_task request");

    let guard = state.store.lock().await;
    let store: Store = guard.load()?;
    match create_task(&store, &req, now()) {
        Ok(result) => {
            guard.save(&result.new_store)?;
            drop(guard);
            info!(task = %result.response.task.id, "Task created");
            Ok(Json(result.response).into_response())
        }
        Err(err) => {
            drop(guard);
            Ok(domain_failure(&err))
        }
    }
}

/// Handler for POST /tasks/propose.
async fn handle_propose(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<ProposeRequest>,
) -> Result<Response, HttpError> {
    info!(task = %req.task, worker = %req.worker, "Handling propose request");

    let guard = state.store.lock().await;
    let store: Store = guard.load()?;
    match propose(&store, &req, now()) {
        Ok(result) => {
            guard.save(&result.new_store)?;
            drop(guard);
            Ok(Json(result.response).into_response())
        }
        Err(err) => {
            drop(guard);
            Ok(domain_failure(&err))
        }
    }
}

/// Handler for POST /tasks/accept.
async fn handle_accept(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<AcceptRequest>,
) -> Result<Response, HttpError> {
    info!(task = %req.task, worker = %req.worker, "Handling accept request");

    let guard = state.store.lock().await;
    let store: Store = guard.load()?;
    match accept_task(&store, &req, now()) {
        Ok(result) => {
            guard.save(&result.new_store)?;
            drop(guard);
            Ok(Json(result.response).into_response())
        }
        Err(err) => {
            drop(guard);
            Ok(domain_failure(&err))
        }
    }
}

/// Handler for POST /tasks/award.
async fn handle_award(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<AwardRequest>,
) -> Result<Response, HttpError> {
    info!(task = %req.task, worker = %req.worker, "Handling award request");

    let guard = state.store.lock().await;
    let store: Store = guard.load()?;
    match award_task(&store, &req, now()) {
        Ok(result) => {
            guard.save(&result.new_store)?;
            drop(guard);
            info!(task = %req.task, worker = %req.worker, "Task awarded");
            Ok(Json(result.response).into_response())
        }
        Err(err) => {
            drop(guard);
            Ok(domain_failure(&err))
        }
    }
}

/// Handler for POST /tasks/update.
async fn handle_update(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<PostUpdateRequest>,
) -> Result<Response, HttpError> {
    info!(task = %req.task, worker = %req.worker, "Handling update request");

    let guard = state.store.lock().await;
    let store: Store = guard.load()?;
    match post_update(&store, &req, now()) {
        Ok(result) => {
            guard.save(&result.new_store)?;
            drop(guard);
            Ok(Json(result.response).into_response())
        }
        Err(err) => {
            drop(guard);
            Ok(domain_failure(&err))
        }
    }
}

/// Handler for POST /tasks/submit.
async fn handle_submit(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<SubmitRequest>,
) -> Result<Response, HttpError> {
    info!(task = %req.task, worker = %req.worker, "Handling submit request");

    let guard = state.store.lock().await;
    let store: Store = guard.load()?;
    match submit_result(&store, &req, now()) {
        Ok(result) => {
            guard.save(&result.new_store)?;
            drop(guard);
            Ok(Json(result.response).into_response())
        }
        Err(err) => {
            drop(guard);
            Ok(domain_failure(&err))
        }
    }
}

/// Handler for POST /tasks/approve.
async fn handle_approve(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<ApproveRequest>,
) -> Result<Response, HttpError> {
    info!(task = %req.task, "Handling approve request");

    let guard = state.store.lock().await;
    let store: Store = guard.load()?;
    match approve_task(&store, &req, now()) {
        Ok(result) => {
            guard.save(&result.new_store)?;
            drop(guard);
            info!(task = %req.task, "Task approved");
            Ok(Json(result.response).into_response())
        }
        Err(err) => {
            drop(guard);
            Ok(domain_failure(&err))
        }
    }
}

/// Handler for GET /admin/needs-nudge.
async fn handle_needs_nudge(
    AxumState(state): AxumState<AppState>,
    Query(query): Query<NeedsNudgeQuery>,
) -> Result<Json<NeedsNudgeReply>, HttpError> {
    let guard = state.store.lock().await;
    let store: Store = guard.load()?;
    drop(guard);

    let reply: NeedsNudgeReply =
        stale_awarded_tasks(&store, now(), query.silence_seconds, query.limit);
    if !reply.tasks.is_empty() {
        info!(stalled = reply.tasks.len(), "stalled tasks surfaced");
    }
    Ok(Json(reply))
}

/// Handler for POST /admin/mark-nudged.
///
/// Like the direct fetch, an unknown task here is a 404.
async fn handle_mark_nudged(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<MarkNudgedRequest>,
) -> Result<Response, HttpError> {
    info!(task = %req.task, "Handling mark-nudged request");

    let guard = state.store.lock().await;
    let store: Store = guard.load()?;
    match mark_nudged(&store, &req, now()) {
        Ok(result) => {
            guard.save(&result.new_store)?;
            drop(guard);
            Ok(Json(result.response).into_response())
        }
        Err(err) if err.is_not_found() => {
            drop(guard);
            Err(HttpError::not_found())
        }
        Err(err) => {
            drop(guard);
            Ok(domain_failure(&err))
        }
    }
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/status", get(handle_status))
        .route("/users/register", post(handle_register))
        .route("/users/availability", post(handle_availability))
        .route("/tasks/open", get(handle_open_tasks))
        .route("/tasks/{id}", get(handle_get_task))
        .route("/tasks", post(handle_create_task))
        .route("/tasks/propose", post(handle_propose))
        .route("/tasks/accept", post(handle_accept))
        .route("/tasks/award", post(handle_award))
        .route("/tasks/update", post(handle_update))
        .route("/tasks/submit", post(handle_submit))
        .route("/tasks/approve", post(handle_approve))
        .route("/admin/needs-nudge", get(handle_needs_nudge))
        .route("/admin/mark-nudged", post(handle_mark_nudged))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing gigboard server");
    info!(store = %args.store.display(), "Using JSON document store");

    let app_state: AppState = AppState::new(
        FileStore::new(args.store),
        args.register_rate,
        args.create_rate,
    );

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
