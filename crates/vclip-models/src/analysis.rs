//! Per-segment modality scores produced by the analysis stage.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::transcript::TranscriptSegment;

/// The three independently-computed modality scores plus their weighted
/// combination, each in `[0.0, 1.0]`. See §4.H for the combination formula.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct ModalityScores {
    pub text: f64,
    pub audio: f64,
    pub visual: f64,
    pub combined: f64,
}

/// A transcript segment enriched with its modality scores. This is the
/// unit the segment scorer and clip selector operate on.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedSegment {
    #[serde(flatten)]
    pub segment: TranscriptSegment,
    pub scores: ModalityScores,
}

impl AnalyzedSegment {
    pub fn start(&self) -> f64 {
        self.segment.start
    }

    pub fn end(&self) -> f64 {
        self.segment.end
    }
}
