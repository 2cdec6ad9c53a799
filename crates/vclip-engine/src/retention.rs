//! Retention sweep: periodically destroys jobs (and their clip files)
//! older than `retentionDays`, per §4.J.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use tracing::{info, warn};

use vclip_models::{Job, JobId, JobState};

/// A job eligible for the sweep: old enough and in a terminal state.
/// Jobs still running are never swept, regardless of age.
pub fn is_expired(job: &Job, now: DateTime<Utc>, retention_days: i64) -> bool {
    if !job.status.is_terminal() {
        return false;
    }
    let cutoff = now - ChronoDuration::days(retention_days);
    job.updated_at < cutoff
}

/// Delete a job's clip files from disk. Never raises — failures are
/// logged and skipped, per §7's "the retention sweep never raises."
pub async fn delete_job_files(job: &Job) -> (usize, u64) {
    let mut deleted_clips = 0usize;
    let mut freed_space = 0u64;

    for clip in &job.clips {
        match tokio::fs::metadata(&clip.file_path).await {
            Ok(meta) => {
                if tokio::fs::remove_file(&clip.file_path).await.is_ok() {
                    deleted_clips += 1;
                    freed_space += meta.len();
                }
            }
            Err(e) => {
                warn!(job_id = %job.id, clip_id = %clip.definition.clip_id, error = %e, "clip file missing during sweep");
            }
        }
    }

    (deleted_clips, freed_space)
}

/// Identify which jobs in `job_ids` are expired as of `now`. Pure
/// decision function so the Engine can hold its job-map lock for the
/// shortest possible window while actually removing entries.
pub fn expired_job_ids(jobs: &[&Job], now: DateTime<Utc>, retention_days: i64) -> Vec<JobId> {
    jobs.iter()
        .filter(|j| is_expired(j, now, retention_days))
        .map(|j| j.id.clone())
        .collect()
}

/// Log a summary of one sweep pass.
pub fn log_sweep_result(swept: usize, freed_space: u64) {
    info!(swept, freed_space, "retention sweep complete");
}

#[cfg(test)]
mod tests {
    use super::*;
    use vclip_models::{VideoAnalysisInput, VideoAnalysisOptions, VideoSource};

    fn sample_job() -> Job {
        Job::new(VideoAnalysisInput {
            source: VideoSource::Upload {
                path: "/tmp/video.mp4".to_string(),
            },
            options: VideoAnalysisOptions::default(),
        })
    }

    #[test]
    fn running_job_is_never_expired() {
        let mut job = sample_job();
        job.transition(JobState::Downloading);
        job.updated_at = Utc::now() - ChronoDuration::days(30);
        assert!(!is_expired(&job, Utc::now(), 7));
    }

    #[test]
    fn completed_job_older_than_retention_is_expired() {
        let mut job = sample_job();
        job.complete(vec![]);
        job.updated_at = Utc::now() - ChronoDuration::days(8);
        assert!(is_expired(&job, Utc::now(), 7));
    }

    #[test]
    fn completed_job_within_retention_is_kept() {
        let mut job = sample_job();
        job.complete(vec![]);
        job.updated_at = Utc::now() - ChronoDuration::days(1);
        assert!(!is_expired(&job, Utc::now(), 7));
    }

    #[test]
    fn expired_job_ids_filters_correctly() {
        let mut expired_job = sample_job();
        expired_job.complete(vec![]);
        expired_job.updated_at = Utc::now() - ChronoDuration::days(10);

        let fresh_job = sample_job();

        let jobs = vec![&expired_job, &fresh_job];
        let ids = expired_job_ids(&jobs, Utc::now(), 7);
        assert_eq!(ids, vec![expired_job.id.clone()]);
    }
}
