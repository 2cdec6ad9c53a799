//! Engine configuration, per the enumerated config keys in spec.md §6.

use std::time::Duration;

use vclip_ai::AiConfig;
use vclip_models::AnalyzerWeights;

/// FFmpeg encoder quality knobs, per §6's `processing.*` keys.
#[derive(Debug, Clone)]
pub struct ProcessingConfig {
    pub max_concurrent_clips: usize,
    pub ffmpeg_preset: String,
    pub output_crf: u8,
    pub audio_bitrate: String,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            max_concurrent_clips: 3,
            ffmpeg_preset: "veryfast".to_string(),
            output_crf: 23,
            audio_bitrate: "128k".to_string(),
        }
    }
}

/// Root configuration for the Engine, assembled once at startup and
/// shared read-only across the worker loop and the retention sweep.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub storage_dir: String,
    pub max_duration_secs: f64,
    pub max_file_size_bytes: u64,
    pub retention_days: i64,
    pub retention_sweep_interval: Duration,
    pub analyzer_weights: AnalyzerWeights,
    pub processing: ProcessingConfig,
    pub hosted_cookies_file: Option<String>,
    pub ai: AiConfig,
    pub ai_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage_dir: "/tmp/vclip-engine".to_string(),
            max_duration_secs: 3600.0,
            max_file_size_bytes: 2 * 1024 * 1024 * 1024,
            retention_days: 7,
            retention_sweep_interval: Duration::from_secs(24 * 60 * 60),
            analyzer_weights: AnalyzerWeights::default(),
            processing: ProcessingConfig::default(),
            hosted_cookies_file: None,
            ai: AiConfig::default(),
            ai_enabled: false,
        }
    }
}

impl EngineConfig {
    /// Build a config from environment variables, falling back to
    /// [`EngineConfig::default`] for anything unset. Weight validation
    /// happens here per the §9 design note ("validation at config-load
    /// time"), not lazily on first use.
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let analyzer_weights = AnalyzerWeights {
            text: env_f64("ANALYZER_WEIGHT_TEXT", defaults.analyzer_weights.text),
            audio: env_f64("ANALYZER_WEIGHT_AUDIO", defaults.analyzer_weights.audio),
            visual: env_f64("ANALYZER_WEIGHT_VISUAL", defaults.analyzer_weights.visual),
        };
        analyzer_weights.validate()?;

        let ai_api_key = std::env::var("AI_API_KEY").unwrap_or_default();
        let ai_enabled = env_bool("AI_ENABLED", false) && !ai_api_key.is_empty();

        Ok(Self {
            storage_dir: std::env::var("STORAGE_DIR").unwrap_or(defaults.storage_dir),
            max_duration_secs: env_f64("MAX_DURATION_SECS", defaults.max_duration_secs),
            max_file_size_bytes: env_u64("MAX_FILE_SIZE_BYTES", defaults.max_file_size_bytes),
            retention_days: env_i64("RETENTION_DAYS", defaults.retention_days),
            retention_sweep_interval: Duration::from_secs(env_u64(
                "RETENTION_SWEEP_INTERVAL_SECS",
                defaults.retention_sweep_interval.as_secs(),
            )),
            analyzer_weights,
            processing: ProcessingConfig {
                max_concurrent_clips: env_usize(
                    "MAX_CONCURRENT_CLIPS",
                    defaults.processing.max_concurrent_clips,
                ),
                ffmpeg_preset: std::env::var("FFMPEG_PRESET")
                    .unwrap_or(defaults.processing.ffmpeg_preset),
                output_crf: env_u8("OUTPUT_CRF", defaults.processing.output_crf),
                audio_bitrate: std::env::var("AUDIO_BITRATE")
                    .unwrap_or(defaults.processing.audio_bitrate),
            },
            hosted_cookies_file: std::env::var("HOSTED_COOKIES_FILE").ok(),
            ai: AiConfig {
                api_key: ai_api_key,
                model: std::env::var("AI_MODEL").unwrap_or(defaults.ai.model),
                backup_model: std::env::var("AI_BACKUP_MODEL").unwrap_or(defaults.ai.backup_model),
                vision_model: std::env::var("AI_VISION_MODEL").unwrap_or(defaults.ai.vision_model),
                rate_limit_per_sec: env_u32(
                    "AI_RATE_LIMIT_PER_SEC",
                    defaults.ai.rate_limit_per_sec,
                ),
            },
            ai_enabled,
        })
    }
}

fn env_f64(key: &str, default: f64) -> f64 {
    std::env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn env_i64(key: &str, default: i64) -> i64 {
    std::env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn env_u8(key: &str, default: u8) -> u8 {
    std::env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
