//! Transcriber error types.

use thiserror::Error;

pub type TranscribeResult<T> = Result<T, TranscribeError>;

#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("transcriber binary not found in PATH")]
    BinaryNotFound,

    #[error("transcriber requires an absolute path, got: {0}")]
    RelativePath(String),

    #[error("transcriber process failed: {message}")]
    ProcessFailed { message: String },

    #[error("transcriber timed out after {0} seconds")]
    Timeout(u64),

    #[error("failed to parse transcriber output: {0}")]
    ParseFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TranscribeError {
    pub fn process_failed(message: impl Into<String>) -> Self {
        Self::ProcessFailed {
            message: message.into(),
        }
    }
}
