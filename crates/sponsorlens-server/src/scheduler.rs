//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the
//! recurring purge of expired analysis jobs.

use chrono::{DateTime, Duration, Utc};
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::jobs::JobTracker;

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process. Dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the purge job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    tracker: JobTracker,
    purge_cron: &str,
    retention_hours: u64,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;
    register_purge_job(&scheduler, tracker, purge_cron, retention_hours).await?;
    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the expired-job purge on `cron` (default hourly, `0 0 * * * *`).
async fn register_purge_job(
    scheduler: &JobScheduler,
    tracker: JobTracker,
    cron: &str,
    retention_hours: u64,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(cron, move |_uuid, _lock| {
        let tracker = tracker.clone();
        Box::pin(async move {
            let removed = purge_expired(&tracker, retention_hours).await;
            tracing::info!(removed, retention_hours, "scheduler: expired jobs purged");
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

async fn purge_expired(tracker: &JobTracker, retention_hours: u64) -> usize {
    let hours = i64::try_from(retention_hours).unwrap_or(i64::MAX);
    let cutoff = Duration::try_hours(hours)
        .and_then(|d| Utc::now().checked_sub_signed(d))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    tracker.purge(cutoff).await
}
