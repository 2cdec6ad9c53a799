//! Analysis error types.

use thiserror::Error;

pub type AnalysisResult<T> = Result<T, AnalysisError>;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("media probe failed: {0}")]
    MediaProbeFailed(#[from] vclip_media::MediaError),

    #[error("no segments met the minimum score")]
    InsufficientSegments,

    #[error("invalid analyzer weights: {0}")]
    InvalidWeights(String),
}
