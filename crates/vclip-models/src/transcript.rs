//! The transcript produced by the transcription stage and consumed by the
//! text analyzer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single timed segment of speech.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptSegment {
    /// Monotonically increasing from 0 within a transcript.
    pub id: u32,
    /// Seconds from the start of the asset. `start < end`.
    pub start: f64,
    pub end: f64,
    /// May be empty for a segment with no recognized speech.
    pub text: String,
}

impl TranscriptSegment {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Full transcription result for one asset.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptResult {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub duration: f64,
    pub segments: Vec<TranscriptSegment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_duration_is_end_minus_start() {
        let seg = TranscriptSegment {
            id: 0,
            start: 1.5,
            end: 4.0,
            text: "hello".into(),
        };
        assert!((seg.duration() - 2.5).abs() < 1e-9);
    }
}
