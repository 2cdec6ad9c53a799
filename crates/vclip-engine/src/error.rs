//! Engine error types and the machine-readable code each one carries.

use thiserror::Error;
use vclip_models::ErrorCode;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("asset duration exceeds the configured maximum")]
    VideoTooLong,

    #[error("asset size exceeds the configured maximum")]
    FileTooLarge,

    #[error("download failed: {0}")]
    DownloadFailed(String),

    #[error("transcription failed: {0}")]
    TranscriptionFailed(String),

    #[error("analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("clip generation failed: {0}")]
    ClipGenerationFailed(String),

    #[error("no segments met the minimum score")]
    InsufficientSegments,

    #[error("job not found: {0}")]
    JobNotFound(String),

    #[error("clip not found: {0}")]
    ClipNotFound(String),

    #[error(transparent)]
    Media(#[from] vclip_media::MediaError),

    #[error(transparent)]
    Transcribe(#[from] vclip_transcribe::TranscribeError),

    #[error(transparent)]
    Analysis(#[from] vclip_analysis::AnalysisError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// The machine-readable code surfaced to callers, per spec.md §7.
    pub fn code(&self) -> ErrorCode {
        match self {
            EngineError::InvalidInput(_) => ErrorCode::InvalidInput,
            EngineError::VideoTooLong => ErrorCode::VideoTooLong,
            EngineError::FileTooLarge => ErrorCode::FileTooLarge,
            EngineError::DownloadFailed(_) => ErrorCode::DownloadFailed,
            EngineError::TranscriptionFailed(_) => ErrorCode::TranscriptionFailed,
            EngineError::AnalysisFailed(_) => ErrorCode::AnalysisFailed,
            EngineError::ClipGenerationFailed(_) => ErrorCode::ClipGenerationFailed,
            EngineError::InsufficientSegments => ErrorCode::InsufficientSegments,
            EngineError::JobNotFound(_) => ErrorCode::JobNotFound,
            EngineError::ClipNotFound(_) => ErrorCode::ClipNotFound,
            EngineError::Analysis(vclip_analysis::AnalysisError::InsufficientSegments) => {
                ErrorCode::InsufficientSegments
            }
            EngineError::Media(vclip_media::MediaError::InvalidVideo(_))
            | EngineError::Media(vclip_media::MediaError::UnsupportedFormat(_))
            | EngineError::Media(vclip_media::MediaError::FileNotFound(_)) => {
                ErrorCode::InvalidInput
            }
            EngineError::Media(vclip_media::MediaError::FfprobeFailed { .. })
            | EngineError::Media(vclip_media::MediaError::FfprobeNotFound) => {
                ErrorCode::AnalysisFailed
            }
            EngineError::Media(_) => ErrorCode::DownloadFailed,
            EngineError::Transcribe(_) => ErrorCode::TranscriptionFailed,
            EngineError::Analysis(_) => ErrorCode::AnalysisFailed,
            EngineError::Io(_) => ErrorCode::InvalidInput,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_segments_from_analysis_maps_through() {
        let err = EngineError::Analysis(vclip_analysis::AnalysisError::InsufficientSegments);
        assert_eq!(err.code(), ErrorCode::InsufficientSegments);
    }

    #[test]
    fn no_video_stream_maps_to_invalid_input() {
        let err = EngineError::Media(vclip_media::MediaError::InvalidVideo(
            "No video stream found".to_string(),
        ));
        assert_eq!(err.code(), ErrorCode::InvalidInput);
    }

    #[test]
    fn ffprobe_failure_maps_to_analysis_failed() {
        let err = EngineError::Media(vclip_media::MediaError::FfprobeFailed {
            message: "ffprobe crashed".to_string(),
            stderr: None,
        });
        assert_eq!(err.code(), ErrorCode::AnalysisFailed);
    }

    #[test]
    fn video_too_long_maps_to_its_own_code() {
        assert_eq!(EngineError::VideoTooLong.code(), ErrorCode::VideoTooLong);
    }
}
