//! In-memory build job records.
//!
//! Jobs exist so the HTTP layer can answer "what happened to my build"
//! without blocking on pipeline completion. Records live for the process
//! lifetime only; nothing is persisted.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Queued,
    Running,
    Succeeded,
    Failed,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Succeeded | JobState::Failed)
    }
}

/// One accepted build request and its progress.
#[derive(Clone, Debug, Serialize)]
pub struct BuildJob {
    pub id: String,
    pub git_url: String,
    pub git_ref: String,
    pub state: JobState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deploy_path: Option<PathBuf>,
    pub queued_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl BuildJob {
    pub fn new(id: String, git_url: String, git_ref: String) -> Self {
        Self {
            id,
            git_url,
            git_ref,
            state: JobState::Queued,
            error: None,
            deploy_path: None,
            queued_at: Utc::now(),
            started_at: None,
            finished_at: None,
        }
    }
}

/// Shared store of every job this process has accepted.
#[derive(Default)]
pub struct JobStore {
    jobs: RwLock<HashMap<String, BuildJob>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, job: BuildJob) {
        let mut jobs = self.jobs.write().await;
        jobs.insert(job.id.clone(), job);
    }

    pub async fn get(&self, job_id: &str) -> Option<BuildJob> {
        let jobs = self.jobs.read().await;
        jobs.get(job_id).cloned()
    }

    pub async fn mark_running(&self, job_id: &str) {
        let mut jobs = self.jobs.write().await;
        if let Some(job) = jobs.get_mut(job_id) {
            job.state = JobState::Running;
            job.started_at = Some(Utc::now());
        }
    }

    pub async fn finish_success(&self, job_id: &str, deploy_path: PathBuf) {
        let mut jobs = self.jobs.write().await;
        if let Some(job) = jobs.get_mut(job_id) {
            job.state = JobState::Succeeded;
            job.deploy_path = Some(deploy_path);
            job.finished_at = Some(Utc::now());
        }
    }

    pub async fn finish_failure(&self, job_id: &str, error: String) {
        let mut jobs = self.jobs.write().await;
        if let Some(job) = jobs.get_mut(job_id) {
            job.state = JobState::Failed;
            job.error = Some(error);
            job.finished_at = Some(Utc::now());
        }
    }
}
