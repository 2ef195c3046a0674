//! Background execution of single- and multi-video analysis jobs.
//!
//! Each video runs as its own spawned task so one failure never aborts the
//! rest. Multi-video jobs draw tasks through a bounded stream, report
//! `completed / total × 80` as progress, and reserve the final stretch for
//! the temporal merge.

use std::sync::Arc;
use std::time::Duration;

use futures::{stream, StreamExt};
use sponsorlens_analysis::{
    merge_analyses, AnalysisError, AnalysisMode, AnalysisPipeline, BoxFuture, NoProgress,
    ProgressSink, ProgressUpdate,
};
use sponsorlens_core::{AnalysisReport, AppConfig, MAX_CONCURRENT_VIDEOS_CEILING};

use crate::jobs::{JobResult, JobTracker, JobUpdate};

/// Share of multi-video progress spent on per-video analysis.
const ANALYSIS_PROGRESS_SHARE: usize = 80;

/// Forwards pipeline stage reports into one job.
struct JobProgress {
    tracker: JobTracker,
    job_id: String,
}

impl ProgressSink for JobProgress {
    fn report(&self, update: ProgressUpdate) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            self.tracker.update(&self.job_id, update.into()).await;
        })
    }
}

#[derive(Clone)]
pub struct Orchestrator {
    pipeline: AnalysisPipeline,
    tracker: JobTracker,
    max_concurrent: usize,
    video_timeout: Duration,
}

impl Orchestrator {
    #[must_use]
    pub fn new(
        pipeline: AnalysisPipeline,
        tracker: JobTracker,
        max_concurrent: usize,
        video_timeout: Duration,
    ) -> Self {
        Self {
            pipeline,
            tracker,
            max_concurrent: max_concurrent.clamp(1, MAX_CONCURRENT_VIDEOS_CEILING),
            video_timeout,
        }
    }

    #[must_use]
    pub fn from_config(pipeline: AnalysisPipeline, tracker: JobTracker, config: &AppConfig) -> Self {
        Self::new(
            pipeline,
            tracker,
            config.max_concurrent_videos,
            Duration::from_secs(config.video_timeout_secs),
        )
    }

    #[must_use]
    pub fn pipeline(&self) -> &AnalysisPipeline {
        &self.pipeline
    }

    #[must_use]
    pub fn tracker(&self) -> &JobTracker {
        &self.tracker
    }

    pub fn spawn_single(&self, job_id: String, video_id: String, brands: Vec<String>) {
        let this = self.clone();
        tokio::spawn(async move { this.run_single(&job_id, &video_id, &brands).await });
    }

    pub fn spawn_multi(&self, job_id: String, video_ids: Vec<String>, brands: Vec<String>) {
        let this = self.clone();
        tokio::spawn(async move { this.run_multi(&job_id, &video_ids, &brands).await });
    }

    /// Runs one video with stage reporting into `job_id`.
    pub async fn run_single(&self, job_id: &str, video_id: &str, brands: &[String]) {
        let sink = JobProgress {
            tracker: self.tracker.clone(),
            job_id: job_id.to_owned(),
        };
        let outcome = run_unit(
            &self.pipeline,
            video_id,
            brands,
            self.video_timeout,
            &sink,
        )
        .await;

        let update = match outcome {
            Ok(report) => {
                tracing::info!(job_id, video_id, "analysis job completed");
                JobUpdate::completed(
                    "Analysis completed successfully",
                    JobResult::Single(Box::new(report)),
                )
            }
            Err(e) => {
                tracing::error!(job_id, video_id, error = %e, "analysis job failed");
                JobUpdate::failed("Analysis failed", e.to_string())
            }
        };
        self.tracker.update(job_id, update).await;
    }

    /// Analyzes every video concurrently and merges the successes.
    pub async fn run_multi(&self, job_id: &str, video_ids: &[String], brands: &[String]) {
        let total = video_ids.len();
        tracing::info!(job_id, videos = total, "starting multi-video analysis");
        self.tracker
            .update(
                job_id,
                JobUpdate::processing(
                    "initialization",
                    0,
                    format!("Starting parallel analysis of {total} videos..."),
                )
                .details("Initializing parallel multi-video analysis"),
            )
            .await;

        let width = self.max_concurrent.min(total).max(1);
        let brands: Arc<[String]> = brands.into();
        let mut units = stream::iter(video_ids.iter().cloned().enumerate())
            .map(|(index, video_id)| {
                let pipeline = self.pipeline.clone();
                let brands = Arc::clone(&brands);
                let timeout = self.video_timeout;
                async move {
                    let unit_id = video_id.clone();
                    let handle = tokio::spawn(async move {
                        run_unit(&pipeline, &unit_id, &brands, timeout, &NoProgress).await
                    });
                    let outcome = match handle.await {
                        Ok(result) => result.map_err(|e| e.to_string()),
                        Err(e) => Err(format!("analysis task aborted: {e}")),
                    };
                    (index, video_id, outcome)
                }
            })
            .buffer_unordered(width);

        let mut completed = 0usize;
        let mut successes: Vec<(usize, AnalysisReport)> = Vec::with_capacity(total);
        while let Some((index, video_id, outcome)) = units.next().await {
            completed += 1;
            match outcome {
                Ok(report) => {
                    tracing::info!(job_id, %video_id, completed, total, "video analyzed");
                    successes.push((index, report));
                }
                Err(e) => {
                    tracing::error!(job_id, %video_id, error = %e, "video analysis failed");
                }
            }
            let progress = u8::try_from(completed * ANALYSIS_PROGRESS_SHARE / total).unwrap_or(80);
            self.tracker
                .update(
                    job_id,
                    JobUpdate::processing(
                        "brand_analysis",
                        progress,
                        format!("Completed {completed} of {total} videos..."),
                    )
                    .details(format!("Last completed: {video_id}")),
                )
                .await;
        }

        successes.sort_by_key(|(index, _)| *index);
        let reports: Vec<AnalysisReport> = successes.into_iter().map(|(_, r)| r).collect();
        let analyzed = reports.len();

        self.tracker
            .update(
                job_id,
                JobUpdate::processing("finalizing", 85, "Combining analysis results...").details(
                    format!("Merging data from {analyzed} successfully analyzed videos"),
                ),
            )
            .await;

        let update = match merge_analyses(&reports, video_ids) {
            Ok(combined) => {
                tracing::info!(job_id, analyzed, total, "multi-video analysis completed");
                JobUpdate::completed(
                    format!(
                        "Parallel multi-video analysis completed successfully ({analyzed}/{total} videos)"
                    ),
                    JobResult::Combined(Box::new(combined)),
                )
            }
            Err(e) => {
                tracing::error!(job_id, error = %e, "multi-video analysis failed");
                JobUpdate::failed("Parallel multi-video analysis failed", e.to_string())
            }
        };
        self.tracker.update(job_id, update).await;
    }
}

async fn run_unit(
    pipeline: &AnalysisPipeline,
    video_id: &str,
    brands: &[String],
    timeout: Duration,
    progress: &dyn ProgressSink,
) -> Result<AnalysisReport, AnalysisError> {
    tokio::time::timeout(
        timeout,
        pipeline.analyze_video(video_id, brands, AnalysisMode::Progressive, progress),
    )
    .await
    .map_err(|_| AnalysisError::Timeout {
        video_id: video_id.to_owned(),
        secs: timeout.as_secs(),
    })?
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
