//! Machine-readable error taxonomy surfaced to callers, per §7.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidInput,
    VideoTooLong,
    FileTooLarge,
    DownloadFailed,
    TranscriptionFailed,
    AnalysisFailed,
    ClipGenerationFailed,
    InsufficientSegments,
    JobNotFound,
    ClipNotFound,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::VideoTooLong => "VIDEO_TOO_LONG",
            ErrorCode::FileTooLarge => "FILE_TOO_LARGE",
            ErrorCode::DownloadFailed => "DOWNLOAD_FAILED",
            ErrorCode::TranscriptionFailed => "TRANSCRIPTION_FAILED",
            ErrorCode::AnalysisFailed => "ANALYSIS_FAILED",
            ErrorCode::ClipGenerationFailed => "CLIP_GENERATION_FAILED",
            ErrorCode::InsufficientSegments => "INSUFFICIENT_SEGMENTS",
            ErrorCode::JobNotFound => "JOB_NOT_FOUND",
            ErrorCode::ClipNotFound => "CLIP_NOT_FOUND",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
