//! Clip definitions and the final generated-clip record.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analysis::ModalityScores;
use crate::job::JobId;

/// A selected time range to render as a clip, before encoding happens.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClipDefinition {
    pub clip_id: String,
    pub start_time: f64,
    pub end_time: f64,
    pub duration: f64,
    pub score: f64,
    /// The transcript text covered by this clip's range.
    pub text: String,
}

/// Technical properties of an encoded clip's video stream, probed via
/// ffprobe after encoding to confirm the encoder produced what was asked.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClipVideoInfo {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub codec: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u64>,
}

/// A fully encoded clip ready to be reported to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedClip {
    pub job_id: JobId,
    #[serde(flatten)]
    pub definition: ClipDefinition,
    pub file_path: String,
    pub file_size: u64,
    pub scores: ModalityScores,
    pub video_info: ClipVideoInfo,
    pub created_at: DateTime<Utc>,
}
