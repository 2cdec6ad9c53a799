//! End-to-end pipeline scenarios from spec.md §8, driven through the
//! public `Engine` API. Requires `ffmpeg`/`ffprobe` on `PATH` — the test
//! fixture synthesizes its own short clip with `ffmpeg`'s `lavfi` input
//! rather than checking in a binary asset.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::{sleep, timeout};

use vclip_ai::{AiClient, AiResult};
use vclip_engine::{Engine, EngineConfig};
use vclip_models::{
    JobState, JobStatusView, TranscriptResult, TranscriptSegment, VideoAnalysisInput,
    VideoAnalysisOptions, VideoSource,
};
use vclip_transcribe::{TranscribeResult, Transcriber};

/// Produces a fixed transcript regardless of the audio it's handed, so
/// tests can control segment scoring deterministically.
struct FixedTranscriber {
    segments: Vec<TranscriptSegment>,
    duration: f64,
}

#[async_trait]
impl Transcriber for FixedTranscriber {
    async fn transcribe(&self, _wav_path: &Path) -> TranscribeResult<TranscriptResult> {
        Ok(TranscriptResult {
            text: self
                .segments
                .iter()
                .map(|s| s.text.as_str())
                .collect::<Vec<_>>()
                .join(" "),
            language: Some("en".to_string()),
            duration: self.duration,
            segments: self.segments.clone(),
        })
    }
}

/// Never actually reachable in these tests (`ai_enabled` stays false), but
/// a `None` `AiClient` still exercises the heuristic fallback paths.
struct UnreachableAi;

#[async_trait]
impl AiClient for UnreachableAi {
    async fn text_batch(&self, _system: &str, _prompt: &str, _len: usize) -> AiResult<Vec<f64>> {
        Err(vclip_ai::AiError::NotConfigured)
    }

    async fn vision(&self, _prompt: &str, _image_url: &str) -> AiResult<String> {
        Err(vclip_ai::AiError::NotConfigured)
    }
}

async fn ffmpeg_available() -> bool {
    which::which("ffmpeg").is_ok() && which::which("ffprobe").is_ok()
}

/// Generate a short synthetic H.264 clip with a test-pattern video track
/// and a sine-wave audio track, long enough to exercise segment
/// expansion/selection with a realistic `clipDuration`.
async fn synthesize_clip(path: &Path, duration_secs: u32) {
    let status = Command::new("ffmpeg")
        .args(["-y", "-f", "lavfi", "-i"])
        .arg(format!("testsrc=duration={duration_secs}:size=640x360:rate=30"))
        .args(["-f", "lavfi", "-i"])
        .arg(format!("sine=frequency=440:duration={duration_secs}"))
        .args(["-shortest", "-pix_fmt", "yuv420p", "-c:v", "libx264", "-c:a", "aac"])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .expect("failed to spawn ffmpeg");
    assert!(status.success(), "ffmpeg failed to synthesize test clip");
}

fn segments_covering(duration: f64, texts: &[&str]) -> Vec<TranscriptSegment> {
    let step = duration / texts.len() as f64;
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| TranscriptSegment {
            id: i as u32,
            start: step * i as f64,
            end: step * (i as f64 + 1.0),
            text: text.to_string(),
        })
        .collect()
}

async fn wait_for_terminal(engine: &Engine, job_id: &vclip_models::JobId) -> JobStatusView {
    timeout(Duration::from_secs(60), async {
        loop {
            let status = engine.status(job_id).await.expect("job disappeared");
            if matches!(status.status, JobState::Completed | JobState::Failed) {
                return status;
            }
            sleep(Duration::from_millis(50)).await;
        }
    })
    .await
    .expect("job did not reach a terminal state in time")
}

#[tokio::test]
async fn completes_with_at_least_one_clip_on_a_short_asset() {
    if !ffmpeg_available().await {
        eprintln!("skipping: ffmpeg/ffprobe not on PATH");
        return;
    }

    let storage = tempfile::tempdir().unwrap();
    let asset_dir = tempfile::tempdir().unwrap();
    let asset_path = asset_dir.path().join("source.mp4");
    synthesize_clip(&asset_path, 40).await;

    let segments = segments_covering(
        40.0,
        &[
            "this is an exciting and thrilling moment you will not believe",
            "plain filler text with nothing remarkable happening here",
            "what an incredible shocking twist, can you believe what just happened",
            "more ordinary narration continuing along without much energy",
        ],
    );
    let transcriber = Arc::new(FixedTranscriber {
        segments,
        duration: 40.0,
    });

    let config = EngineConfig {
        storage_dir: storage.path().to_string_lossy().to_string(),
        ..EngineConfig::default()
    };
    let engine = Engine::start(config, transcriber, None);

    let job_id = engine
        .submit(VideoAnalysisInput {
            source: VideoSource::Upload {
                path: asset_path.to_string_lossy().to_string(),
            },
            options: VideoAnalysisOptions {
                clip_duration: 30,
                clip_count: 3,
                min_score: 0.0,
                ..VideoAnalysisOptions::default()
            },
        })
        .await
        .unwrap();

    let status = wait_for_terminal(&engine, &job_id).await;
    assert_eq!(status.status, JobState::Completed);
    assert_eq!(status.progress, 100);

    let clips = engine.clips(&job_id).await.unwrap();
    assert!(!clips.is_empty());
    for clip in &clips {
        assert!(clip.start_time < clip.end_time);
        assert!(clip.end_time <= 41.0);
    }

    engine.shutdown();
}

#[tokio::test]
async fn fails_with_insufficient_segments_when_min_score_is_unreachable() {
    if !ffmpeg_available().await {
        eprintln!("skipping: ffmpeg/ffprobe not on PATH");
        return;
    }

    let storage = tempfile::tempdir().unwrap();
    let asset_dir = tempfile::tempdir().unwrap();
    let asset_path = asset_dir.path().join("source.mp4");
    synthesize_clip(&asset_path, 20).await;

    let segments = segments_covering(20.0, &["dull flat text", "more dull flat text"]);
    let transcriber = Arc::new(FixedTranscriber {
        segments,
        duration: 20.0,
    });

    let config = EngineConfig {
        storage_dir: storage.path().to_string_lossy().to_string(),
        ..EngineConfig::default()
    };
    let engine = Engine::start(config, transcriber, None);

    let job_id = engine
        .submit(VideoAnalysisInput {
            source: VideoSource::Upload {
                path: asset_path.to_string_lossy().to_string(),
            },
            options: VideoAnalysisOptions {
                min_score: 0.999,
                ..VideoAnalysisOptions::default()
            },
        })
        .await
        .unwrap();

    let status = wait_for_terminal(&engine, &job_id).await;
    assert_eq!(status.status, JobState::Failed);
    assert!(status.error.is_some());

    let clips_dir = PathBuf::from(storage.path()).join("clips");
    if clips_dir.exists() {
        let mut entries = tokio::fs::read_dir(&clips_dir).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    engine.shutdown();
}

#[tokio::test]
async fn rejects_an_asset_longer_than_the_configured_maximum() {
    if !ffmpeg_available().await {
        eprintln!("skipping: ffmpeg/ffprobe not on PATH");
        return;
    }

    let storage = tempfile::tempdir().unwrap();
    let asset_dir = tempfile::tempdir().unwrap();
    let asset_path = asset_dir.path().join("source.mp4");
    synthesize_clip(&asset_path, 10).await;

    let transcriber = Arc::new(FixedTranscriber {
        segments: vec![],
        duration: 10.0,
    });

    let config = EngineConfig {
        storage_dir: storage.path().to_string_lossy().to_string(),
        max_duration_secs: 1.0,
        ..EngineConfig::default()
    };
    let engine = Engine::start(config, transcriber, None);

    let job_id = engine
        .submit(VideoAnalysisInput {
            source: VideoSource::Upload {
                path: asset_path.to_string_lossy().to_string(),
            },
            options: VideoAnalysisOptions::default(),
        })
        .await
        .unwrap();

    let status = wait_for_terminal(&engine, &job_id).await;
    assert_eq!(status.status, JobState::Failed);

    engine.shutdown();
}

#[tokio::test]
async fn completes_via_heuristics_when_no_ai_client_is_configured() {
    if !ffmpeg_available().await {
        eprintln!("skipping: ffmpeg/ffprobe not on PATH");
        return;
    }

    let storage = tempfile::tempdir().unwrap();
    let asset_dir = tempfile::tempdir().unwrap();
    let asset_path = asset_dir.path().join("source.mp4");
    synthesize_clip(&asset_path, 35).await;

    let segments = segments_covering(
        35.0,
        &[
            "why does this matter, what happens next is unbelievable",
            "a calm explanation of the background context here",
            "an amazing question worth asking right now",
        ],
    );
    let transcriber = Arc::new(FixedTranscriber {
        segments,
        duration: 35.0,
    });

    let config = EngineConfig {
        storage_dir: storage.path().to_string_lossy().to_string(),
        ..EngineConfig::default()
    };
    // `ai_client` is `None` below, so `UnreachableAi` is never actually
    // invoked; it documents that even a configured-but-failing client
    // would be caught entirely inside `vclip-analysis` and never surface
    // here.
    let _ = UnreachableAi;
    let engine = Engine::start(config, transcriber, None);

    let job_id = engine
        .submit(VideoAnalysisInput {
            source: VideoSource::Upload {
                path: asset_path.to_string_lossy().to_string(),
            },
            options: VideoAnalysisOptions {
                min_score: 0.0,
                ..VideoAnalysisOptions::default()
            },
        })
        .await
        .unwrap();

    let status = wait_for_terminal(&engine, &job_id).await;
    assert_eq!(status.status, JobState::Completed);

    engine.shutdown();
}
