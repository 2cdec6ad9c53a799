//! Weighting configuration for combining modality scores.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Weights `wT`, `wA`, `wV` used to combine per-modality scores into a
/// single `combined` score: `combined = wT*text + wA*audio + wV*visual`.
/// Must be non-negative and sum to 1.0 within a small epsilon.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzerWeights {
    pub text: f64,
    pub audio: f64,
    pub visual: f64,
}

impl Default for AnalyzerWeights {
    fn default() -> Self {
        Self {
            text: 0.4,
            audio: 0.3,
            visual: 0.3,
        }
    }
}

impl AnalyzerWeights {
    const EPSILON: f64 = 1e-9;

    pub fn validate(&self) -> Result<(), String> {
        if self.text < 0.0 || self.audio < 0.0 || self.visual < 0.0 {
            return Err("analyzer weights must be non-negative".into());
        }
        let sum = self.text + self.audio + self.visual;
        if (sum - 1.0).abs() > Self::EPSILON {
            return Err(format!("analyzer weights must sum to 1.0, got {sum}"));
        }
        Ok(())
    }

    pub fn combine(&self, text: f64, audio: f64, visual: f64) -> f64 {
        self.text * text + self.audio * audio + self.visual * visual
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_are_valid() {
        assert!(AnalyzerWeights::default().validate().is_ok());
    }

    #[test]
    fn weights_not_summing_to_one_are_rejected() {
        let w = AnalyzerWeights {
            text: 0.5,
            audio: 0.5,
            visual: 0.5,
        };
        assert!(w.validate().is_err());
    }

    #[test]
    fn negative_weight_is_rejected() {
        let w = AnalyzerWeights {
            text: -0.1,
            audio: 0.6,
            visual: 0.5,
        };
        assert!(w.validate().is_err());
    }

    #[test]
    fn combine_computes_weighted_sum() {
        let w = AnalyzerWeights::default();
        let combined = w.combine(1.0, 0.0, 0.0);
        assert!((combined - 0.4).abs() < 1e-9);
    }
}
