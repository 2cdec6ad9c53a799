//! Single-worker pipeline: acquire → transcribe → analyze (parallel) →
//! score → select → encode, per §4.J's control flow. Runs strictly one
//! job at a time; the caller (`engine.rs`) enforces that via a FIFO
//! channel with a single consumer task.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use vclip_ai::AiClient;
use vclip_analysis::{score_segments, score_segments_audio, score_segments_visual, select_clips, score_text, TextAnalyzerConfig};
use vclip_media::{extract_speech_audio, probe_video, EncodingConfig};
use vclip_models::{Job, JobId, JobState, VideoSource};
use vclip_transcribe::Transcriber;

use crate::acquisition::acquirer_for;
use crate::clip_encoder::encode_clips;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::logging::JobLogger;

type JobMap = Mutex<HashMap<JobId, Job>>;

/// Run one job to a terminal state. Mutates the shared job map in place
/// at each stage transition so concurrent `status` polls observe
/// progress. Never panics: all stage errors are converted to
/// `EngineError` and the job is marked `failed` by the caller.
pub async fn run_job(
    job_id: JobId,
    jobs: Arc<JobMap>,
    config: Arc<EngineConfig>,
    transcriber: Arc<dyn Transcriber>,
    ai_client: Option<Arc<dyn AiClient>>,
) {
    let logger = JobLogger::new(&job_id, "pipeline");
    logger.log_start("worker picked up job");

    let result = run_pipeline(&job_id, &jobs, &config, transcriber.as_ref(), ai_client.as_deref()).await;

    let mut map = jobs.lock().await;
    let Some(job) = map.get_mut(&job_id) else {
        return;
    };

    if job.tombstoned {
        if let Ok(clips) = &result {
            for clip in clips {
                let _ = tokio::fs::remove_file(&clip.file_path);
            }
        }
        map.remove(&job_id);
        logger.log_completion("tombstoned job dropped without registering outputs");
        return;
    }

    match result {
        Ok(clips) => {
            let top_score = clips.iter().map(|c| c.definition.score).fold(0.0_f64, f64::max);
            job.metadata.clips_generated = Some(clips.len());
            job.metadata.top_score = if clips.is_empty() { None } else { Some(top_score) };
            job.complete(clips);
            logger.log_completion("job completed");
        }
        Err(e) => {
            warn!(job_id = %job_id, error = %e, "job failed");
            job.fail(e.to_string());
        }
    }
}

async fn set_state(jobs: &JobMap, job_id: &JobId, state: JobState) {
    let mut map = jobs.lock().await;
    if let Some(job) = map.get_mut(job_id) {
        job.transition(state);
    }
}

async fn run_pipeline(
    job_id: &JobId,
    jobs: &JobMap,
    config: &EngineConfig,
    transcriber: &dyn Transcriber,
    ai_client: Option<&dyn AiClient>,
) -> EngineResult<Vec<vclip_models::GeneratedClip>> {
    let input = {
        let map = jobs.lock().await;
        map.get(job_id)
            .ok_or_else(|| EngineError::JobNotFound(job_id.to_string()))?
            .input
            .clone()
    };

    let uploads_dir = PathBuf::from(&config.storage_dir).join("uploads");
    let processing_dir = PathBuf::from(&config.storage_dir).join("processing");
    let clips_dir = PathBuf::from(&config.storage_dir).join("clips");
    for dir in [&uploads_dir, &processing_dir, &clips_dir] {
        tokio::fs::create_dir_all(dir).await?;
    }

    // --- A: acquisition ---
    set_state(jobs, job_id, JobState::Downloading).await;
    let acquirer = acquirer_for(
        &input.source,
        config.hosted_cookies_file.as_deref(),
        config.max_file_size_bytes,
    );
    let source_path = acquirer.acquire(job_id, &uploads_dir).await?;

    // --- B: probe + validate + extract speech audio ---
    let info = probe_video(&source_path).await?;
    if info.duration > config.max_duration_secs {
        return Err(EngineError::VideoTooLong);
    }
    if info.size > config.max_file_size_bytes {
        return Err(EngineError::FileTooLarge);
    }

    {
        let mut map = jobs.lock().await;
        if let Some(job) = map.get_mut(job_id) {
            job.metadata.duration = Some(info.duration);
            job.metadata.file_size = Some(info.size);
            job.metadata.source_type = Some(source_type_tag(&input.source));
            job.metadata.source_url = source_url(&input.source);
        }
    }

    let wav_path = processing_dir.join(format!("{}.wav", job_id.as_str()));
    extract_speech_audio(source_path.clone(), wav_path.clone()).await?;

    // --- C: transcribe ---
    set_state(jobs, job_id, JobState::Transcribing).await;
    let absolute_wav_path = tokio::fs::canonicalize(&wav_path).await?;
    let transcript = transcriber
        .transcribe(&absolute_wav_path)
        .await
        .map_err(|e| EngineError::TranscriptionFailed(e.to_string()))?;

    // --- D/E/F: three modality analyzers run in parallel ---
    set_state(jobs, job_id, JobState::Analyzing).await;
    let segments = transcript.segments;
    let asset_duration = info.duration.max(transcript.duration);

    let text_config = TextAnalyzerConfig::default();
    let text_future = async {
        segments
            .iter()
            .map(|s| score_text(&s.text, &text_config))
            .collect::<Vec<_>>()
    };
    let audio_future = score_segments_audio(&source_path, &segments, ai_client);
    let frame_url_for = |t: f64| format!("frame://{}/{:.3}", job_id.as_str(), t);
    let visual_future = score_segments_visual(&segments, asset_duration, ai_client, frame_url_for);

    let (text_scores, audio_scores, visual_scores) =
        tokio::join!(text_future, audio_future, visual_future);
    let audio_scores = audio_scores?;

    // --- G: combine ---
    let scored = score_segments(&segments, &text_scores, &audio_scores, &visual_scores, &config.analyzer_weights);

    // --- H: select ---
    set_state(jobs, job_id, JobState::Generating).await;
    let clip_duration = input.options.clip_duration as f64;
    let definitions = select_clips(
        &scored,
        input.options.min_score,
        input.options.clip_count as usize,
        clip_duration,
        asset_duration,
    )?;
    {
        let mut map = jobs.lock().await;
        if let Some(job) = map.get_mut(job_id) {
            job.set_progress(75);
        }
    }

    // --- I: encode ---
    let encoding = EncodingConfig {
        preset: config.processing.ffmpeg_preset.clone(),
        crf: config.processing.output_crf,
        audio_bitrate: config.processing.audio_bitrate.clone(),
    };
    let clips = encode_clips(
        job_id,
        &source_path,
        &clips_dir,
        definitions,
        input.options.orientation,
        &encoding,
        config.processing.max_concurrent_clips,
    )
    .await?;

    info!(job_id = %job_id, clip_count = clips.len(), "pipeline finished");
    Ok(clips)
}

fn source_type_tag(source: &VideoSource) -> String {
    match source {
        VideoSource::HostedUrl { .. } => "hosted-url".to_string(),
        VideoSource::HttpUrl { .. } => "http-url".to_string(),
        VideoSource::Upload { .. } => "upload".to_string(),
    }
}

fn source_url(source: &VideoSource) -> Option<String> {
    match source {
        VideoSource::HostedUrl { url } | VideoSource::HttpUrl { url } => Some(url.clone()),
        VideoSource::Upload { .. } => None,
    }
}
