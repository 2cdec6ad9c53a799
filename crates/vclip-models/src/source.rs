//! Request types: where the source video comes from and how to process it.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Where to acquire the source video from. Tagged by `type` in JSON so
/// callers can discriminate without probing fields.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum VideoSource {
    /// A platform URL resolved through the hosted-video acquirer (yt-dlp).
    HostedUrl { url: String },
    /// A direct HTTP(S) URL to a video file, fetched with a plain GET.
    HttpUrl { url: String },
    /// A file already present on local disk (e.g. a completed upload).
    Upload { path: String },
}

/// Target clip orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// User-tunable knobs for a single analysis request, per §3.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VideoAnalysisOptions {
    #[validate(range(min = 30, max = 180))]
    #[serde(default = "default_clip_duration")]
    pub clip_duration: u32,

    #[validate(range(min = 1, max = 20))]
    #[serde(default = "default_clip_count")]
    pub clip_count: u32,

    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_min_score")]
    pub min_score: f64,

    #[serde(default)]
    pub orientation: Orientation,
}

fn default_clip_duration() -> u32 {
    60
}

fn default_clip_count() -> u32 {
    5
}

fn default_min_score() -> f64 {
    0.6
}

impl Default for VideoAnalysisOptions {
    fn default() -> Self {
        Self {
            clip_duration: default_clip_duration(),
            clip_count: default_clip_count(),
            min_score: default_min_score(),
            orientation: Orientation::default(),
        }
    }
}

/// The full, immutable request that kicks off a job.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VideoAnalysisInput {
    pub source: VideoSource,
    #[validate(nested)]
    #[serde(default)]
    pub options: VideoAnalysisOptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_validate() {
        let opts = VideoAnalysisOptions::default();
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn clip_duration_out_of_range_fails_validation() {
        let mut opts = VideoAnalysisOptions::default();
        opts.clip_duration = 10;
        assert!(opts.validate().is_err());
    }

    #[test]
    fn min_score_out_of_range_fails_validation() {
        let mut opts = VideoAnalysisOptions::default();
        opts.min_score = 1.5;
        assert!(opts.validate().is_err());
    }
}
