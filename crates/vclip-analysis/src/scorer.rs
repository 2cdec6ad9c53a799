//! Segment scorer: combines the three independently-computed modality
//! scores into a single ranked list, per §4.G.

use std::cmp::Ordering;

use vclip_models::{AnalyzedSegment, AnalyzerWeights, ModalityScores, TranscriptSegment};

/// Combine per-modality scores for each segment and sort the result
/// descending by `combined`, breaking ties by ascending `start`.
///
/// `text_scores`, `audio_scores`, and `visual_scores` must each have the
/// same length as `segments`; scores at the same index describe the
/// same segment.
pub fn score_segments(
    segments: &[TranscriptSegment],
    text_scores: &[f64],
    audio_scores: &[f64],
    visual_scores: &[f64],
    weights: &AnalyzerWeights,
) -> Vec<AnalyzedSegment> {
    let mut analyzed: Vec<AnalyzedSegment> = segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            let text = text_scores.get(i).copied().unwrap_or(0.0);
            let audio = audio_scores.get(i).copied().unwrap_or(0.0);
            let visual = visual_scores.get(i).copied().unwrap_or(0.0);
            let combined = weights.combine(text, audio, visual);
            AnalyzedSegment {
                segment: segment.clone(),
                scores: ModalityScores {
                    text,
                    audio,
                    visual,
                    combined,
                },
            }
        })
        .collect();

    analyzed.sort_by(|a, b| {
        b.scores
            .combined
            .partial_cmp(&a.scores.combined)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.start().partial_cmp(&b.start()).unwrap_or(Ordering::Equal))
    });

    analyzed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(id: u32, start: f64, end: f64) -> TranscriptSegment {
        TranscriptSegment {
            id,
            start,
            end,
            text: String::new(),
        }
    }

    #[test]
    fn sorts_descending_by_combined_score() {
        let segments = vec![segment(0, 0.0, 5.0), segment(1, 5.0, 10.0)];
        let weights = AnalyzerWeights::default();
        let scored = score_segments(&segments, &[0.1, 0.9], &[0.1, 0.9], &[0.1, 0.9], &weights);
        assert_eq!(scored[0].segment.id, 1);
        assert_eq!(scored[1].segment.id, 0);
    }

    #[test]
    fn ties_break_by_ascending_start() {
        let segments = vec![segment(0, 10.0, 15.0), segment(1, 0.0, 5.0)];
        let weights = AnalyzerWeights::default();
        let scored = score_segments(&segments, &[0.5, 0.5], &[0.5, 0.5], &[0.5, 0.5], &weights);
        assert_eq!(scored[0].start(), 0.0);
        assert_eq!(scored[1].start(), 10.0);
    }

    #[test]
    fn combined_matches_weighted_formula() {
        let segments = vec![segment(0, 0.0, 5.0)];
        let weights = AnalyzerWeights {
            text: 0.5,
            audio: 0.3,
            visual: 0.2,
        };
        let scored = score_segments(&segments, &[1.0], &[0.0], &[0.0], &weights);
        assert!((scored[0].scores.combined - 0.5).abs() < 1e-9);
    }
}
