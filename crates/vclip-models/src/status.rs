//! External-facing poll views, per §6. These are intentionally narrower
//! than `Job`/`GeneratedClip` — they never leak internal fields like
//! `tombstoned` or local file paths outside of what the caller needs to
//! retrieve a clip.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analysis::ModalityScores;
use crate::clip::{ClipVideoInfo, GeneratedClip};
use crate::job::{Job, JobId, JobMetadata, JobState};

const TRANSCRIPT_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusView {
    pub job_id: JobId,
    pub status: JobState,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub metadata: JobMetadata,
}

impl From<&Job> for JobStatusView {
    fn from(job: &Job) -> Self {
        Self {
            job_id: job.id.clone(),
            status: job.status,
            progress: job.progress,
            error: job.error.clone(),
            created_at: job.created_at,
            updated_at: job.updated_at,
            completed_at: job.completed_at,
            metadata: job.metadata.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClipView {
    pub clip_id: String,
    pub start_time: f64,
    pub end_time: f64,
    pub duration: f64,
    pub score: f64,
    /// Truncated to the first 100 characters of the clip's covered
    /// transcript text, with a trailing `…` when truncated.
    pub transcript_preview: String,
    pub file_size: u64,
    pub download_url: String,
    pub scores: ModalityScores,
    pub video_info: ClipVideoInfo,
    pub created_at: DateTime<Utc>,
}

impl ClipView {
    pub fn from_generated(clip: &GeneratedClip, download_url: String) -> Self {
        Self {
            clip_id: clip.definition.clip_id.clone(),
            start_time: clip.definition.start_time,
            end_time: clip.definition.end_time,
            duration: clip.definition.duration,
            score: clip.definition.score,
            transcript_preview: truncate_preview(&clip.definition.text),
            file_size: clip.file_size,
            download_url,
            scores: clip.scores,
            video_info: clip.video_info.clone(),
            created_at: clip.created_at,
        }
    }
}

fn truncate_preview(text: &str) -> String {
    if text.chars().count() <= TRANSCRIPT_PREVIEW_CHARS {
        return text.to_string();
    }
    let truncated: String = text.chars().take(TRANSCRIPT_PREVIEW_CHARS).collect();
    format!("{truncated}\u{2026}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_not_truncated() {
        assert_eq!(truncate_preview("hello"), "hello");
    }

    #[test]
    fn long_text_is_truncated_with_ellipsis() {
        let text = "a".repeat(150);
        let preview = truncate_preview(&text);
        assert_eq!(preview.chars().count(), TRANSCRIPT_PREVIEW_CHARS + 1);
        assert!(preview.ends_with('\u{2026}'));
    }
}
