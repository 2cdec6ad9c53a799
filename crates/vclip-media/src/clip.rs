//! Speech-audio extraction and clip cutting/encoding.

use std::path::Path;
use tracing::info;

use vclip_models::Orientation;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;
use crate::filters::build_orientation_filter;
use crate::progress::FfmpegProgress;

/// Encoder quality knobs, configured per `EngineConfig::processing`.
#[derive(Debug, Clone)]
pub struct EncodingConfig {
    pub preset: String,
    pub crf: u8,
    pub audio_bitrate: String,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            preset: "veryfast".to_string(),
            crf: 23,
            audio_bitrate: "128k".to_string(),
        }
    }
}

/// Extract a single-channel, 16 kHz, 16-bit PCM WAV suitable for the
/// transcriber. Any deviation from these parameters causes the
/// transcriber to reject the file, so the flags are not configurable.
pub async fn extract_speech_audio<P: AsRef<Path>>(input: P, output: P) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    info!(
        "Extracting speech audio: {} -> {}",
        input.display(),
        output.display()
    );

    let cmd = FfmpegCommand::new(input, output)
        .output_arg("-vn")
        .output_arg("-ac")
        .output_arg("1")
        .output_arg("-ar")
        .output_arg("16000")
        .output_arg("-sample_fmt")
        .output_arg("s16")
        .output_arg("-f")
        .output_arg("wav");

    FfmpegRunner::new().run(&cmd).await
}

/// Cut `[start, end)` from `input`, scale-and-center-crop to the requested
/// orientation, and encode as H.264/yuv420p + AAC MP4 with faststart.
pub async fn cut_clip<P, F>(
    input: P,
    output: P,
    start: f64,
    end: f64,
    orientation: Orientation,
    encoding: &EncodingConfig,
    progress_callback: F,
) -> MediaResult<()>
where
    P: AsRef<Path>,
    F: Fn(FfmpegProgress) + Send + 'static,
{
    let input = input.as_ref();
    let output = output.as_ref();
    let duration = end - start;

    info!(
        "Cutting clip: {} [{:.3}, {:.3}) -> {}",
        input.display(),
        start,
        end,
        output.display()
    );

    let filter = build_orientation_filter(orientation);

    let cmd = FfmpegCommand::new(input, output)
        .seek(start)
        .duration(duration)
        .video_filter(filter)
        .video_codec("libx264")
        .output_arg("-pix_fmt")
        .output_arg("yuv420p")
        .preset(&encoding.preset)
        .crf(encoding.crf)
        .audio_codec("aac")
        .audio_bitrate(&encoding.audio_bitrate)
        .output_arg("-movflags")
        .output_arg("+faststart");

    FfmpegRunner::new()
        .run_with_progress(&cmd, progress_callback)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_encoding_config_is_sane() {
        let cfg = EncodingConfig::default();
        assert_eq!(cfg.preset, "veryfast");
        assert!(cfg.crf > 0);
    }
}
