//! AI co-processor error types.
//!
//! Per spec.md §4.K/§7, none of these are meant to reach the Engine —
//! callers (the audio/visual analyzers) catch them and substitute a
//! neutral or heuristic score. The type exists so callers can log the
//! real cause before discarding it.

use thiserror::Error;

pub type AiResult<T> = Result<T, AiError>;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI co-processor not configured")]
    NotConfigured,

    #[error("request to {model} failed: {message}")]
    RequestFailed { model: String, message: String },

    #[error("all models exhausted, last error: {0}")]
    AllModelsFailed(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to parse model response: {0}")]
    ParseFailed(String),
}
