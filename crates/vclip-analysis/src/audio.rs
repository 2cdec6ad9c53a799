//! Audio analyzer: two whole-asset `ffmpeg` passes (volume + silence),
//! then a pure per-segment scoring function, per §4.E.

use std::path::Path;

use vclip_ai::AiClient;
use vclip_media::{overlap_with_silence, probe_silence, probe_volume, SilenceRange, VolumeProfile};
use vclip_models::TranscriptSegment;

use crate::error::AnalysisResult;

/// Segments are batched to the AI co-processor in groups of at most this
/// size, per §4.E.
const AI_BATCH_SIZE: usize = 10;

const EMOTION_SYSTEM_PROMPT: &str = "You are scoring how emotionally engaging each transcript \
     segment sounds, as a number from 0 (flat/neutral) to 1 (highly emotional).";

/// Score every segment of one asset's audio track.
///
/// Runs exactly two media-tool invocations total (`probe_volume`,
/// `probe_silence`) regardless of segment count. If `ai` is provided,
/// emotion scores are requested in batches of at most [`AI_BATCH_SIZE`];
/// a batch failure falls back to the neutral value `0.5` for that batch
/// only, never aborting the analysis.
pub async fn score_segments_audio(
    media_path: impl AsRef<Path>,
    segments: &[TranscriptSegment],
    ai: Option<&dyn AiClient>,
) -> AnalysisResult<Vec<f64>> {
    if segments.is_empty() {
        return Ok(Vec::new());
    }

    let volume = probe_volume(media_path.as_ref()).await?;
    let silence = probe_silence(media_path.as_ref()).await?;

    let emotion_scores = fetch_emotion_scores(segments, ai).await;

    Ok(segments
        .iter()
        .zip(emotion_scores)
        .map(|(segment, emotion)| score_segment(segment, &volume, &silence, emotion))
        .collect())
}

async fn fetch_emotion_scores(segments: &[TranscriptSegment], ai: Option<&dyn AiClient>) -> Vec<f64> {
    let Some(ai) = ai else {
        return vec![0.5; segments.len()];
    };

    let mut scores = Vec::with_capacity(segments.len());
    for chunk in segments.chunks(AI_BATCH_SIZE) {
        let prompt = build_batch_prompt(chunk);
        match ai.text_batch(EMOTION_SYSTEM_PROMPT, &prompt, chunk.len()).await {
            Ok(batch) => scores.extend(batch),
            Err(_) => scores.extend(std::iter::repeat(0.5).take(chunk.len())),
        }
    }
    scores
}

fn build_batch_prompt(chunk: &[TranscriptSegment]) -> String {
    let mut prompt = String::from("Segments:\n");
    for (i, segment) in chunk.iter().enumerate() {
        let text = if segment.text.trim().is_empty() {
            "(no speech)"
        } else {
            segment.text.as_str()
        };
        prompt.push_str(&format!("{}. {}\n", i + 1, text));
    }
    prompt
}

fn score_segment(
    segment: &TranscriptSegment,
    volume: &VolumeProfile,
    silence: &[SilenceRange],
    emotion: f64,
) -> f64 {
    let duration = segment.end - segment.start;
    if duration <= 0.0 {
        return 0.5;
    }

    let energy = ((volume.mean_db + 60.0) / 50.0).clamp(0.0, 1.0);
    let dynamic_range = ((volume.max_db - volume.mean_db) / 25.0).clamp(0.0, 1.0);

    let overlap = overlap_with_silence(silence, segment.start, segment.end);
    let non_silence = (1.0 - overlap / duration).clamp(0.0, 1.0);

    let speech_rate = speech_rate_score(&segment.text, duration);
    let emotion = emotion.clamp(0.0, 1.0);

    0.3 * energy + 0.2 * dynamic_range + 0.2 * non_silence + 0.1 * speech_rate + 0.2 * emotion
}

/// Map words-per-minute to a `[0, 1]` score via the piecewise-linear
/// table in §4.E. An empty segment has no speech rate signal and falls
/// back to `0.3`.
fn speech_rate_score(text: &str, duration_secs: f64) -> f64 {
    let word_count = text.split_whitespace().count();
    if word_count == 0 {
        return 0.3;
    }

    let wpm = word_count as f64 / (duration_secs / 60.0);

    if wpm < 100.0 {
        lerp(wpm, 0.0, 100.0, 0.2, 0.4)
    } else if wpm < 120.0 {
        lerp(wpm, 100.0, 120.0, 0.4, 0.5)
    } else if wpm < 160.0 {
        lerp(wpm, 120.0, 160.0, 0.5, 0.7)
    } else if wpm < 200.0 {
        lerp(wpm, 160.0, 200.0, 0.7, 0.9)
    } else {
        (0.9 + (wpm - 200.0) / 100.0 * 0.1).min(1.0)
    }
}

fn lerp(x: f64, x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
    let t = ((x - x0) / (x1 - x0)).clamp(0.0, 1.0);
    (y0 + t * (y1 - y0)).clamp(0.0, 1.0)
}
