//! FFmpeg/yt-dlp CLI wrapper for video acquisition, probing, and clip
//! encoding.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building
//! - Progress parsing from `-progress pipe:2`
//! - Cancellation support via tokio
//! - Hosted-platform and direct-HTTP video acquisition
//! - Speech-audio extraction and orientation-aware clip cutting

pub mod audio;
pub mod clip;
pub mod command;
pub mod download;
pub mod error;
pub mod filters;
pub mod fs_utils;
pub mod probe;
pub mod progress;

pub use audio::{overlap_with_silence, probe_silence, probe_volume, SilenceRange, VolumeProfile};
pub use clip::{cut_clip, extract_speech_audio, EncodingConfig};
pub use command::{check_ffmpeg, check_ffprobe, check_ytdlp, FfmpegCommand, FfmpegRunner};
pub use download::{
    download_hosted, download_http, is_hosted_platform_url, probe_hosted_metadata, HostedMetadata,
};
pub use error::{MediaError, MediaResult};
pub use fs_utils::move_file;
pub use probe::{probe_video, VideoInfo};
pub use progress::{FfmpegProgress, ProgressCallback};
