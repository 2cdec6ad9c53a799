//! Speech-to-text transcription.
//!
//! Defines the `Transcriber` trait contract (§4.C: given an absolute path
//! to a 16 kHz mono PCM WAV, return a time-stamped segment list) and a
//! `WhisperCliTranscriber` implementation that shells out to an external
//! CLI binary.

pub mod error;
pub mod whisper_cli;

pub use error::{TranscribeError, TranscribeResult};
pub use whisper_cli::WhisperCliTranscriber;

use std::path::Path;

use async_trait::async_trait;
use vclip_models::TranscriptResult;

/// Contract: given an absolute path to a 16 kHz mono PCM WAV, produce a
/// transcript. Implementations must reject relative paths up front —
/// the underlying binary typically changes its working directory, so a
/// relative path silently resolves against the wrong directory instead
/// of failing loudly.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, wav_path: &Path) -> TranscribeResult<TranscriptResult>;
}

pub(crate) fn require_absolute(path: &Path) -> TranscribeResult<()> {
    if path.is_absolute() {
        Ok(())
    } else {
        Err(TranscribeError::RelativePath(path.display().to_string()))
    }
}
