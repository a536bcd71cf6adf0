//! Background worker that drains the build queue.

use std::sync::Arc;
use tokio::sync::mpsc;

use super::job::JobStore;
use super::QueuedBuild;
use crate::pipeline;

/// Dequeue accepted builds and run the pipeline for each, one at a time.
///
/// The pipeline itself is synchronous and blocking, so each run is pushed
/// onto a blocking thread; the single recv loop is what keeps builds
/// strictly sequential.
pub async fn run(mut rx: mpsc::Receiver<QueuedBuild>, jobs: Arc<JobStore>) {
    while let Some(queued) = rx.recv().await {
        let job_id = queued.job_id;
        jobs.mark_running(&job_id).await;
        tracing::info!(job_id = %job_id, git_url = %queued.request.git_url, "Starting build");

        let request = queued.request;
        let result = tokio::task::spawn_blocking(move || pipeline::run(&request)).await;

        match result {
            Ok(Ok(report)) => {
                tracing::info!(
                    job_id = %job_id,
                    cname = %report.cname,
                    deploy_path = %report.deploy_path.display(),
                    "Build succeeded"
                );
                jobs.finish_success(&job_id, report.deploy_path).await;
            }
            Ok(Err(e)) => {
                tracing::warn!(job_id = %job_id, error = %e, "Build failed");
                jobs.finish_failure(&job_id, format!("{}: {}", e.code(), e)).await;
            }
            Err(join_err) => {
                tracing::error!(job_id = %job_id, error = %join_err, "Build task panicked");
                jobs.finish_failure(&job_id, format!("build task panicked: {}", join_err))
                    .await;
            }
        }
    }
}
