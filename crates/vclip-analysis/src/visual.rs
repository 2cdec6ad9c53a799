//! Visual analyzer: MVP scene-change heuristic plus an optional AI
//! face-score pass, per §4.F.

use rand::Rng;
use vclip_ai::AiClient;
use vclip_models::TranscriptSegment;

const SCENE_CHANGE_INTERVAL_SECS: f64 = 10.0;
const SCENE_CHANGE_JITTER_SECS: f64 = 2.0;

const VISION_PROMPT: &str = "How many distinct human faces are clearly visible in this frame? \
     Answer with a single integer.";

/// Score every segment of one asset's visual track.
///
/// `asset_duration` drives the synthetic scene-change timeline (§4.F's
/// MVP heuristic: roughly one scene change every 10s, jittered). If
/// `ai` and a representative frame URL supplier are both available, a
/// single availability probe on the first segment decides whether the
/// whole asset uses AI face counts or falls back to the positional
/// heuristic — a failure partway through never produces a mixed result.
pub async fn score_segments_visual(
    segments: &[TranscriptSegment],
    asset_duration: f64,
    ai: Option<&dyn AiClient>,
    frame_url_for: impl Fn(f64) -> String,
) -> Vec<f64> {
    if segments.is_empty() {
        return Vec::new();
    }

    let scene_changes = synthetic_scene_changes(asset_duration);
    let use_ai = probe_vision_availability(ai, segments, &frame_url_for).await;

    let mut scores = Vec::with_capacity(segments.len());
    for segment in segments {
        let face_score = if use_ai {
            ai_face_score(ai.unwrap(), segment, &frame_url_for).await
        } else {
            positional_face_score(segment, asset_duration)
        };
        scores.push(score_segment(segment, &scene_changes, face_score));
    }
    scores
}

async fn probe_vision_availability(
    ai: Option<&dyn AiClient>,
    segments: &[TranscriptSegment],
    frame_url_for: &impl Fn(f64) -> String,
) -> bool {
    let Some(ai) = ai else { return false };
    let Some(first) = segments.first() else {
        return false;
    };
    let midpoint = (first.start + first.end) / 2.0;
    ai.vision(VISION_PROMPT, &frame_url_for(midpoint)).await.is_ok()
}

async fn ai_face_score(
    ai: &dyn AiClient,
    segment: &TranscriptSegment,
    frame_url_for: &impl Fn(f64) -> String,
) -> f64 {
    let midpoint = (segment.start + segment.end) / 2.0;
    let url = frame_url_for(midpoint);
    match ai.vision(VISION_PROMPT, &url).await {
        Ok(response) => face_count_to_score(parse_face_count(&response)),
        Err(_) => positional_face_score(segment, segment.end.max(1.0)),
    }
}

fn parse_face_count(response: &str) -> u32 {
    response
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}

fn face_count_to_score(count: u32) -> f64 {
    match count {
        0 => 0.3,
        1 | 2 => 0.7,
        _ => 1.0,
    }
}

/// Heuristic fallback when no vision model is available: faces are
/// assumed more likely in the middle of the asset (interview/subject
/// framing) than in cold opens or outros, with a little noise to avoid
/// ties.
fn positional_face_score(segment: &TranscriptSegment, asset_duration: f64) -> f64 {
    if asset_duration <= 0.0 {
        return 0.5;
    }
    let midpoint = (segment.start + segment.end) / 2.0;
    let position = (midpoint / asset_duration).clamp(0.0, 1.0);

    let base = if position < 0.2 {
        0.5
    } else if position < 0.8 {
        0.7
    } else {
        0.6
    };

    let noise = rand::thread_rng().gen_range(-0.1..=0.1);
    (base + noise).clamp(0.3, 1.0)
}

fn synthetic_scene_changes(asset_duration: f64) -> Vec<f64> {
    if asset_duration <= 0.0 {
        return Vec::new();
    }
    let mut rng = rand::thread_rng();
    let mut changes = Vec::new();
    let mut t = 0.0;
    while t < asset_duration {
        let jitter = rng.gen_range(-SCENE_CHANGE_JITTER_SECS..=SCENE_CHANGE_JITTER_SECS);
        let change_at = (t + jitter).clamp(0.0, asset_duration);
        changes.push(change_at);
        t += SCENE_CHANGE_INTERVAL_SECS;
    }
    changes
}

fn score_segment(segment: &TranscriptSegment, scene_changes: &[f64], face_score: f64) -> f64 {
    let duration = (segment.end - segment.start).max(0.001);
    let scene_count = scene_changes
        .iter()
        .filter(|&&t| t >= segment.start && t < segment.end)
        .count() as f64;

    let scene_score = (scene_count / (duration / SCENE_CHANGE_INTERVAL_SECS).max(1.0)).min(1.0);
    let motion_score = ((scene_count / duration) * 10.0).min(1.0);

    (0.3 * scene_score + 0.3 * motion_score + 0.4 * face_score).clamp(0.0, 1.0)
}
