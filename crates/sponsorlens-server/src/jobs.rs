//! In-process table of analysis jobs.
//!
//! A job moves `pending → processing → completed | failed` and never back.
//! Every read and write goes through one async mutex; callers receive
//! snapshots, never references into the table.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sponsorlens_analysis::ProgressUpdate;
use sponsorlens_core::{AnalysisReport, CombinedReport};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    fn rank(self) -> u8 {
        match self {
            JobStatus::Pending => 0,
            JobStatus::Processing => 1,
            JobStatus::Completed | JobStatus::Failed => 2,
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Final payload of a completed job.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum JobResult {
    Single(Box<AnalysisReport>),
    Combined(Box<CombinedReport>),
}

#[derive(Debug, Clone, Serialize)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    pub progress: u8,
    pub stage: Option<String>,
    pub message: String,
    pub details: Option<String>,
    pub brands_found: Vec<String>,
    pub result: Option<JobResult>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    fn queued(id: &str) -> Self {
        let now = Utc::now();
        Self {
            id: id.to_owned(),
            status: JobStatus::Pending,
            progress: 0,
            stage: None,
            message: "Analysis queued".to_owned(),
            details: None,
            brands_found: Vec::new(),
            result: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A partial change to a job. Unset fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct JobUpdate {
    pub status: Option<JobStatus>,
    pub progress: Option<u8>,
    pub stage: Option<String>,
    pub message: Option<String>,
    pub details: Option<String>,
    pub brands_found: Option<Vec<String>>,
    pub result: Option<JobResult>,
    pub error: Option<String>,
}

impl JobUpdate {
    #[must_use]
    pub fn processing(stage: &str, progress: u8, message: impl Into<String>) -> Self {
        Self {
            status: Some(JobStatus::Processing),
            progress: Some(progress),
            stage: Some(stage.to_owned()),
            message: Some(message.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn completed(message: impl Into<String>, result: JobResult) -> Self {
        Self {
            status: Some(JobStatus::Completed),
            progress: Some(100),
            stage: Some("completed".to_owned()),
            message: Some(message.into()),
            result: Some(result),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failed(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            status: Some(JobStatus::Failed),
            message: Some(message.into()),
            error: Some(error.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl From<ProgressUpdate> for JobUpdate {
    fn from(update: ProgressUpdate) -> Self {
        Self {
            status: Some(JobStatus::Processing),
            progress: Some(update.progress),
            stage: Some(update.stage.to_owned()),
            message: Some(update.message),
            details: update.details,
            brands_found: update.brands_found,
            ..Self::default()
        }
    }
}

/// Outcome of [`JobTracker::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied,
    UnknownJob,
    /// The job is terminal or the update would move its status backwards.
    Rejected,
}

#[derive(Debug, Clone, Default)]
pub struct JobTracker {
    jobs: Arc<Mutex<HashMap<String, Job>>>,
}

impl JobTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `id` as a pending job, replacing any job with the same id.
    pub async fn create(&self, id: &str) -> Job {
        let job = Job::queued(id);
        let mut jobs = self.jobs.lock().await;
        if jobs.insert(id.to_owned(), job.clone()).is_some() {
            tracing::warn!(job_id = id, "job id reused; previous job replaced");
        }
        job
    }

    pub async fn update(&self, id: &str, update: JobUpdate) -> UpdateOutcome {
        let mut jobs = self.jobs.lock().await;
        let Some(job) = jobs.get_mut(id) else {
            return UpdateOutcome::UnknownJob;
        };
        if job.status.is_terminal() {
            tracing::debug!(job_id = id, status = ?job.status, "ignoring update to finished job");
            return UpdateOutcome::Rejected;
        }

        let status = update.status.unwrap_or(job.status);
        if status.rank() < job.status.rank() {
            tracing::warn!(job_id = id, from = ?job.status, to = ?status, "ignoring status regression");
            return UpdateOutcome::Rejected;
        }

        job.status = status;
        if let Some(progress) = update.progress {
            job.progress = job.progress.max(progress.min(100));
        }
        if let Some(stage) = update.stage {
            job.stage = Some(stage);
        }
        if let Some(message) = update.message {
            job.message = message;
        }
        if update.details.is_some() {
            job.details = update.details;
        }
        if let Some(brands) = update.brands_found {
            job.brands_found = brands;
        }
        match status {
            JobStatus::Completed => job.result = update.result,
            JobStatus::Failed => {
                job.error = Some(
                    update
                        .error
                        .unwrap_or_else(|| "analysis failed without a reported error".to_owned()),
                );
            }
            JobStatus::Pending | JobStatus::Processing => {}
        }
        job.updated_at = Utc::now();
        UpdateOutcome::Applied
    }

    pub async fn get(&self, id: &str) -> Option<Job> {
        self.jobs.lock().await.get(id).cloned()
    }

    /// Drops every job created before `cutoff` and returns how many went.
    pub async fn purge(&self, cutoff: DateTime<Utc>) -> usize {
        let mut jobs = self.jobs.lock().await;
        let before = jobs.len();
        jobs.retain(|_, job| job.created_at >= cutoff);
        before - jobs.len()
    }
}

#[cfg(test)]
#[path = "jobs_test.rs"]
mod tests;
