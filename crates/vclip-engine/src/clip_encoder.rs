//! Clip encoder: bounded-concurrency fan-out over accepted `ClipDefinition`s,
//! per §4.I. On any encoder error the whole job fails and partial outputs
//! are deleted.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use vclip_media::{cut_clip, probe_video, EncodingConfig};
use vclip_models::{ClipDefinition, ClipVideoInfo, GeneratedClip, JobId, ModalityScores, Orientation};

use crate::error::{EngineError, EngineResult};

/// Encode every accepted clip definition, bounded to `max_concurrency`
/// simultaneous FFmpeg processes. Returns clips in the same order as
/// `definitions` (the selector's score-descending acceptance order).
pub async fn encode_clips(
    job_id: &JobId,
    source_path: &Path,
    clips_dir: &Path,
    definitions: Vec<(ClipDefinition, ModalityScores)>,
    orientation: Orientation,
    encoding: &EncodingConfig,
    max_concurrency: usize,
) -> EngineResult<Vec<GeneratedClip>> {
    tokio::fs::create_dir_all(clips_dir).await?;

    let semaphore = Arc::new(Semaphore::new(max_concurrency.max(1)));
    let mut tasks = Vec::with_capacity(definitions.len());

    for (definition, scores) in definitions {
        let semaphore = Arc::clone(&semaphore);
        let source_path = source_path.to_path_buf();
        let clips_dir = clips_dir.to_path_buf();
        let job_id = job_id.clone();
        let encoding = encoding.clone();

        tasks.push(tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
            encode_one_clip(&job_id, &source_path, &clips_dir, definition, scores, orientation, &encoding).await
        }));
    }

    let mut clips = Vec::with_capacity(tasks.len());
    let mut produced_paths = Vec::with_capacity(tasks.len());
    let mut first_error: Option<EngineError> = None;

    for task in tasks {
        match task.await {
            Ok(Ok(clip)) => {
                produced_paths.push(PathBuf::from(&clip.file_path));
                clips.push(clip);
            }
            Ok(Err(e)) => {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
            Err(join_err) => {
                if first_error.is_none() {
                    first_error = Some(EngineError::ClipGenerationFailed(join_err.to_string()));
                }
            }
        }
    }

    if let Some(err) = first_error {
        warn!(job_id = %job_id, error = %err, "clip encoding failed, deleting partial outputs");
        for path in &produced_paths {
            let _ = tokio::fs::remove_file(path).await;
        }
        return Err(err);
    }

    Ok(clips)
}

async fn encode_one_clip(
    job_id: &JobId,
    source_path: &Path,
    clips_dir: &Path,
    definition: ClipDefinition,
    scores: ModalityScores,
    orientation: Orientation,
    encoding: &EncodingConfig,
) -> EngineResult<GeneratedClip> {
    let file_name = format!(
        "{}_{}_{}.mp4",
        job_id.as_str(),
        definition.clip_id,
        uuid::Uuid::new_v4()
    );
    let output_path = clips_dir.join(&file_name);

    info!(job_id = %job_id, clip_id = %definition.clip_id, "encoding clip");

    cut_clip(
        source_path.to_path_buf(),
        output_path.clone(),
        definition.start_time,
        definition.end_time,
        orientation,
        encoding,
        |_progress| {},
    )
    .await
    .map_err(|e| EngineError::ClipGenerationFailed(e.to_string()))?;

    let metadata = tokio::fs::metadata(&output_path).await?;
    let probed = probe_video(&output_path)
        .await
        .map_err(|e| EngineError::ClipGenerationFailed(e.to_string()))?;

    Ok(GeneratedClip {
        job_id: job_id.clone(),
        definition,
        file_path: output_path.to_string_lossy().to_string(),
        file_size: metadata.len(),
        scores,
        video_info: ClipVideoInfo {
            width: probed.width,
            height: probed.height,
            fps: probed.fps,
            codec: probed.codec,
            bitrate: Some(probed.bitrate),
        },
        created_at: Utc::now(),
    })
}
