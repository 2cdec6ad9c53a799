//! Clip selector: filter, expand, and de-duplicate scored segments into
//! a final list of `ClipDefinition`s, per §4.H.

use vclip_models::{AnalyzedSegment, ClipDefinition, ModalityScores};

use crate::error::{AnalysisError, AnalysisResult};

/// Select and expand clips from a descending-`combined`-sorted, tie-broken
/// list of analyzed segments (the output of [`crate::scorer::score_segments`]).
///
/// Returns each accepted clip paired with the full per-modality score
/// tuple of the segment it was expanded from, since `ClipDefinition`
/// itself only carries the combined score — the Engine attaches the
/// tuple to the final `GeneratedClip`.
///
/// Returns `InsufficientSegments` if no candidate survives filtering and
/// de-duplication.
pub fn select_clips(
    scored: &[AnalyzedSegment],
    min_score: f64,
    clip_count: usize,
    clip_duration: f64,
    asset_duration: f64,
) -> AnalysisResult<Vec<(ClipDefinition, ModalityScores)>> {
    let candidates: Vec<&AnalyzedSegment> = scored
        .iter()
        .filter(|s| s.scores.combined >= min_score)
        .take(clip_count)
        .collect();

    let mut accepted: Vec<(f64, f64)> = Vec::new();
    let mut clips = Vec::new();

    for segment in candidates {
        let (start, end) = expand_to_duration(
            segment.start(),
            segment.end(),
            clip_duration,
            asset_duration,
        );

        if accepted.iter().any(|&(a_start, a_end)| overlaps(a_start, a_end, start, end)) {
            continue;
        }

        accepted.push((start, end));
        clips.push((
            ClipDefinition {
                clip_id: format!("clip-{:03}", clips.len()),
                start_time: start,
                end_time: end,
                duration: end - start,
                score: segment.scores.combined,
                text: segment.segment.text.clone(),
            },
            segment.scores,
        ));
    }

    if clips.is_empty() {
        return Err(AnalysisError::InsufficientSegments);
    }

    Ok(clips)
}

fn overlaps(a_start: f64, a_end: f64, b_start: f64, b_end: f64) -> bool {
    !(a_end <= b_start || b_end <= a_start)
}

fn expand_to_duration(s: f64, e: f64, target: f64, asset_duration: f64) -> (f64, f64) {
    if e - s >= target {
        return (s, s + target);
    }

    let p = (target - (e - s)) / 2.0;
    let mut s_prime = (s - p).max(0.0);
    let mut e_prime = (e + p).min(asset_duration);

    if e_prime - s_prime < target {
        if s_prime == 0.0 {
            e_prime = target.min(asset_duration);
        } else if e_prime == asset_duration {
            s_prime = (asset_duration - target).max(0.0);
        }
    }

    (s_prime, e_prime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vclip_models::{ModalityScores, TranscriptSegment};

    fn analyzed(id: u32, start: f64, end: f64, combined: f64) -> AnalyzedSegment {
        AnalyzedSegment {
            segment: TranscriptSegment {
                id,
                start,
                end,
                text: format!("segment {id}"),
            },
            scores: ModalityScores {
                text: combined,
                audio: combined,
                visual: combined,
                combined,
            },
        }
    }

    #[test]
    fn filters_out_segments_below_min_score() {
        let scored = vec![analyzed(0, 0.0, 5.0, 0.9), analyzed(1, 10.0, 15.0, 0.2)];
        let clips = select_clips(&scored, 0.5, 5, 5.0, 100.0).unwrap();
        assert_eq!(clips.len(), 1);
        assert_eq!(clips[0].0.clip_id, "clip-000");
    }

    #[test]
    fn insufficient_segments_when_all_filtered_out() {
        let scored = vec![analyzed(0, 0.0, 5.0, 0.1)];
        let err = select_clips(&scored, 0.5, 5, 5.0, 100.0).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientSegments));
    }

    #[test]
    fn expands_short_segment_symmetrically() {
        let (s, e) = expand_to_duration(10.0, 12.0, 10.0, 100.0);
        assert!((e - s - 10.0).abs() < 1e-9);
        assert!((s - 7.0).abs() < 1e-9);
        assert!((e - 17.0).abs() < 1e-9);
    }

    #[test]
    fn pushes_to_unconstrained_end_at_start_boundary() {
        let (s, e) = expand_to_duration(0.0, 2.0, 10.0, 100.0);
        assert_eq!(s, 0.0);
        assert!((e - 10.0).abs() < 1e-9);
    }

    #[test]
    fn pushes_to_unconstrained_end_at_asset_end_boundary() {
        let (s, e) = expand_to_duration(98.0, 100.0, 10.0, 100.0);
        assert!((e - 100.0).abs() < 1e-9);
        assert!((s - 90.0).abs() < 1e-9);
    }

    #[test]
    fn already_long_enough_segment_is_truncated_not_padded() {
        let (s, e) = expand_to_duration(5.0, 20.0, 10.0, 100.0);
        assert_eq!(s, 5.0);
        assert_eq!(e, 15.0);
    }

    #[test]
    fn overlapping_candidates_are_discarded_not_replaced() {
        let scored = vec![
            analyzed(0, 0.0, 5.0, 0.9),
            analyzed(1, 3.0, 8.0, 0.8),
            analyzed(2, 20.0, 25.0, 0.7),
        ];
        let clips = select_clips(&scored, 0.5, 5, 5.0, 100.0).unwrap();
        assert_eq!(clips.len(), 2);
        assert_eq!(clips[0].0.start_time, 0.0);
        assert_eq!(clips[1].0.start_time, 20.0);
    }

    #[test]
    fn clip_ids_are_assigned_in_acceptance_order() {
        let scored = vec![analyzed(0, 0.0, 5.0, 0.9), analyzed(1, 20.0, 25.0, 0.8)];
        let clips = select_clips(&scored, 0.5, 5, 5.0, 100.0).unwrap();
        assert_eq!(clips[0].0.clip_id, "clip-000");
        assert_eq!(clips[1].0.clip_id, "clip-001");
    }
}
