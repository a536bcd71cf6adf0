//! HTTP trigger service.
//!
//! A network front door for the build pipeline: `POST /build` validates the
//! request, records a job, and enqueues it for the background worker; the
//! HTTP response never blocks on pipeline completion. Job progress is
//! queried via `GET /jobs/{id}`.

pub mod error;
pub mod job;
pub mod worker;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;

use crate::pipeline::{PipelineRequest, DEFAULT_GIT_REF};
use error::{ApiError, ApiResult};
use job::{BuildJob, JobStore};

/// Accepted builds waiting for the worker. Requests past this are rejected
/// with 503 rather than queued without bound.
pub const QUEUE_CAPACITY: usize = 32;

/// One accepted build on its way to the worker.
pub struct QueuedBuild {
    pub job_id: String,
    pub request: PipelineRequest,
}

/// Shared state: the job records and the sending half of the build queue.
pub struct AppState {
    pub jobs: Arc<JobStore>,
    pub queue: mpsc::Sender<QueuedBuild>,
    /// Deploy root for builds that do not specify one.
    pub web_root: PathBuf,
}

impl AppState {
    /// Build the state plus the receiving half the worker loop consumes.
    pub fn new(web_root: PathBuf) -> (Arc<AppState>, mpsc::Receiver<QueuedBuild>) {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        let state = Arc::new(AppState {
            jobs: Arc::new(JobStore::new()),
            queue: tx,
            web_root,
        });
        (state, rx)
    }
}

/// Create the service router with all endpoints.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/build", post(trigger_build))
        .route("/jobs/{id}", get(get_job))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// GET /
/// Liveness greeting.
async fn index() -> &'static str {
    "welcome to gitstatic"
}

/// Build trigger parameters, accepted as query string or form body.
#[derive(Debug, Default, Clone, Deserialize)]
struct BuildParams {
    git_url: Option<String>,
    git_ref: Option<String>,
    web_root: Option<String>,
}

impl BuildParams {
    /// Form fields win over query parameters; either source is accepted.
    fn merge(form: BuildParams, query: BuildParams) -> BuildParams {
        BuildParams {
            git_url: form.git_url.or(query.git_url),
            git_ref: form.git_ref.or(query.git_ref),
            web_root: form.web_root.or(query.web_root),
        }
    }
}

#[derive(Debug, Serialize)]
struct TriggerResponse {
    msg: &'static str,
    job_id: String,
}

/// POST /build
/// Validate the request, record a queued job, and hand it to the worker.
async fn trigger_build(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BuildParams>,
    body: String,
) -> ApiResult<impl IntoResponse> {
    // A urlencoded form body and the query string are both accepted; a
    // missing or non-form body simply contributes nothing.
    let form: BuildParams = serde_urlencoded::from_str(&body).unwrap_or_default();
    let params = BuildParams::merge(form, query);

    let git_url = params
        .git_url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("missing required parameter: git_url".to_string()))?;

    let git_ref = params
        .git_ref
        .unwrap_or_else(|| DEFAULT_GIT_REF.to_string());
    let web_root = params
        .web_root
        .map(PathBuf::from)
        .unwrap_or_else(|| state.web_root.clone());

    let job_id = uuid::Uuid::new_v4().to_string();
    let job = BuildJob::new(job_id.clone(), git_url.clone(), git_ref.clone());
    state.jobs.create(job).await;

    let queued = QueuedBuild {
        job_id: job_id.clone(),
        request: PipelineRequest {
            git_url: git_url.clone(),
            git_ref,
            web_root,
            keep_workdir: false,
        },
    };

    if let Err(e) = state.queue.try_send(queued) {
        tracing::warn!(job_id = %job_id, "Build queue rejected job: {}", e);
        state
            .jobs
            .finish_failure(&job_id, "build queue is full".to_string())
            .await;
        return Err(ApiError::Unavailable("build queue is full".to_string()));
    }

    tracing::info!(job_id = %job_id, git_url = %git_url, "Build queued");

    Ok((
        StatusCode::ACCEPTED,
        Json(TriggerResponse {
            msg: "git url received",
            job_id,
        }),
    ))
}

/// GET /jobs/{id}
/// Job status query; also how pipeline failures surface asynchronously.
async fn get_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<BuildJob>> {
    let job = state
        .jobs
        .get(&id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("job {} not found", id)))?;
    Ok(Json(job))
}

/// Serve the trigger service until the process is terminated.
///
/// Binds the listener, spawns the worker loop, and runs axum.
pub async fn serve(bind: &str, web_root: PathBuf) -> std::io::Result<()> {
    let (state, rx) = AppState::new(web_root);

    tokio::spawn(worker::run(rx, state.jobs.clone()));

    let app = router(state);
    tracing::info!("Listening on {}", bind);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    axum::serve(listener, app).await
}
