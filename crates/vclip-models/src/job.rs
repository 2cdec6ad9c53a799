//! Job definitions for the engine's in-process job map.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::source::VideoAnalysisInput;
use crate::GeneratedClip;

/// Unique identifier for a job, unique process-wide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Job lifecycle state, per the state machine in §4.J:
/// `pending -> downloading -> transcribing -> analyzing -> generating -> completed`,
/// with `failed` reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    #[default]
    Pending,
    Downloading,
    Transcribing,
    Analyzing,
    Generating,
    Completed,
    Failed,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Downloading => "downloading",
            JobState::Transcribing => "transcribing",
            JobState::Analyzing => "analyzing",
            JobState::Generating => "generating",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
        }
    }

    /// The baseline progress value associated with entering this state,
    /// per the table in §4.J. `Generating` starts at 70 and is bumped to
    /// 75 once selection completes — that bump is applied by the caller,
    /// not by this lookup.
    pub fn baseline_progress(&self) -> u8 {
        match self {
            JobState::Pending => 0,
            JobState::Downloading => 10,
            JobState::Transcribing => 20,
            JobState::Analyzing => 50,
            JobState::Generating => 70,
            JobState::Completed => 100,
            JobState::Failed => 0,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Descriptive metadata accumulated as a job progresses.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct JobMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clips_generated: Option<usize>,
}

/// A mutable, process-local job record. Owned exclusively by the engine;
/// mutated only by the worker running it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Job {
    pub id: JobId,
    pub status: JobState,
    /// 0..=100, non-decreasing until a terminal state.
    pub progress: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub input: VideoAnalysisInput,
    pub metadata: JobMetadata,
    /// Set only when `status == Failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Empty until `status == Completed`.
    pub clips: Vec<GeneratedClip>,
    /// Set by `Engine::delete` when the job is currently executing; the
    /// worker checks this on its next terminal transition and drops the
    /// job's outputs instead of registering them. See DESIGN.md for the
    /// rationale (resolves the §9 "deletion races" open question).
    #[serde(skip)]
    pub tombstoned: bool,
}

impl Job {
    pub fn new(input: VideoAnalysisInput) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            status: JobState::Pending,
            progress: 0,
            created_at: now,
            updated_at: now,
            completed_at: None,
            input,
            metadata: JobMetadata::default(),
            error: None,
            clips: Vec::new(),
            tombstoned: false,
        }
    }

    /// Transition to a new non-terminal/terminal state, updating progress
    /// to that state's baseline and bumping `updated_at`. Does not touch
    /// `completed_at` — callers set that explicitly on the `Completed`
    /// transition so it is always paired with `clips`/`metadata` being
    /// populated.
    pub fn transition(&mut self, next: JobState) {
        self.status = next;
        self.progress = self.progress.max(next.baseline_progress());
        self.updated_at = Utc::now();
    }

    pub fn set_progress(&mut self, progress: u8) {
        self.progress = progress.min(100);
        self.updated_at = Utc::now();
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = JobState::Failed;
        self.error = Some(error.into());
        self.updated_at = Utc::now();
    }

    pub fn complete(&mut self, clips: Vec<GeneratedClip>) {
        self.status = JobState::Completed;
        self.progress = 100;
        self.clips = clips;
        let now = Utc::now();
        self.updated_at = now;
        self.completed_at = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{VideoAnalysisOptions, VideoSource};

    fn sample_input() -> VideoAnalysisInput {
        VideoAnalysisInput {
            source: VideoSource::Upload {
                path: "/tmp/video.mp4".to_string(),
            },
            options: VideoAnalysisOptions::default(),
        }
    }

    #[test]
    fn new_job_is_pending_with_zero_progress() {
        let job = Job::new(sample_input());
        assert_eq!(job.status, JobState::Pending);
        assert_eq!(job.progress, 0);
        assert!(job.clips.is_empty());
    }

    #[test]
    fn transition_bumps_progress_monotonically() {
        let mut job = Job::new(sample_input());
        job.transition(JobState::Downloading);
        assert_eq!(job.progress, 10);
        job.transition(JobState::Transcribing);
        assert_eq!(job.progress, 20);
    }

    #[test]
    fn fail_sets_error_and_terminal_state() {
        let mut job = Job::new(sample_input());
        job.transition(JobState::Downloading);
        job.fail("boom");
        assert_eq!(job.status, JobState::Failed);
        assert_eq!(job.error.as_deref(), Some("boom"));
        assert!(job.status.is_terminal());
    }

    #[test]
    fn complete_sets_progress_to_100_and_completed_at() {
        let mut job = Job::new(sample_input());
        job.complete(vec![]);
        assert_eq!(job.progress, 100);
        assert!(job.completed_at.is_some());
    }
}
