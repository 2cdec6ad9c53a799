//! `WhisperCliTranscriber`: wraps an external whisper.cpp-style CLI binary.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

use vclip_models::{TranscriptResult, TranscriptSegment};

use crate::error::{TranscribeError, TranscribeResult};
use crate::{require_absolute, Transcriber};

const DEFAULT_BINARY: &str = "whisper-cli";
const DEFAULT_TIMEOUT_SECS: u64 = 10 * 60;

/// A `Transcriber` backed by a whisper.cpp-style CLI binary invoked with
/// `--output-json` and parsed from stdout.
pub struct WhisperCliTranscriber {
    binary: PathBuf,
    model: Option<String>,
    language: Option<String>,
    timeout_secs: u64,
}

impl WhisperCliTranscriber {
    /// Resolve `binary_name` (default `whisper-cli`) via `PATH`.
    pub fn new(binary_name: Option<&str>) -> TranscribeResult<Self> {
        let name = binary_name.unwrap_or(DEFAULT_BINARY);
        let binary = which::which(name).map_err(|_| TranscribeError::BinaryNotFound)?;
        Ok(Self {
            binary,
            model: None,
            language: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

#[async_trait]
impl Transcriber for WhisperCliTranscriber {
    async fn transcribe(&self, wav_path: &Path) -> TranscribeResult<TranscriptResult> {
        require_absolute(wav_path)?;

        let mut args: Vec<String> = vec![
            "-f".into(),
            wav_path.to_string_lossy().to_string(),
            "--output-json".into(),
            "--output-file".into(),
            "-".into(),
        ];
        if let Some(model) = &self.model {
            args.push("-m".into());
            args.push(model.clone());
        }
        if let Some(language) = &self.language {
            args.push("-l".into());
            args.push(language.clone());
        }

        debug!(binary = %self.binary.display(), "spawning transcriber");

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout = child.stdout.take().expect("stdout not captured");
        let stderr = child.stderr.take().expect("stderr not captured");

        let stdout_task = tokio::spawn(async move {
            let mut reader = BufReader::new(stdout).lines();
            let mut buf = String::new();
            while let Ok(Some(line)) = reader.next_line().await {
                buf.push_str(&line);
                buf.push('\n');
            }
            buf
        });
        let stderr_task = tokio::spawn(async move {
            let mut reader = BufReader::new(stderr).lines();
            let mut buf = String::new();
            while let Ok(Some(line)) = reader.next_line().await {
                buf.push_str(&line);
                buf.push('\n');
            }
            buf
        });

        let wait_result = tokio::time::timeout(
            Duration::from_secs(self.timeout_secs),
            child.wait(),
        )
        .await;

        let status = match wait_result {
            Ok(status) => status?,
            Err(_) => {
                let _ = child.kill().await;
                return Err(TranscribeError::Timeout(self.timeout_secs));
            }
        };

        let stdout_buf = stdout_task.await.unwrap_or_default();
        let stderr_buf = stderr_task.await.unwrap_or_default();

        if !status.success() {
            warn!(stderr = %stderr_buf, "transcriber exited non-zero");
            return Err(TranscribeError::process_failed(format!(
                "exit status {:?}: {}",
                status.code(),
                stderr_buf.lines().last().unwrap_or("unknown error")
            )));
        }

        parse_whisper_json(&stdout_buf)
    }
}

#[derive(Debug, Deserialize)]
struct WhisperOutput {
    #[serde(default)]
    result: Option<WhisperResultMeta>,
    #[serde(default)]
    transcription: Vec<WhisperSegment>,
}

#[derive(Debug, Deserialize, Default)]
struct WhisperResultMeta {
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WhisperSegment {
    offsets: WhisperOffsets,
    text: String,
}

#[derive(Debug, Deserialize)]
struct WhisperOffsets {
    from: i64,
    to: i64,
}

fn parse_whisper_json(raw: &str) -> TranscribeResult<TranscriptResult> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(TranscriptResult::default());
    }

    let parsed: WhisperOutput = serde_json::from_str(trimmed)
        .map_err(|e| TranscribeError::ParseFailed(e.to_string()))?;

    let mut segments = Vec::with_capacity(parsed.transcription.len());
    let mut full_text = String::new();
    let mut max_end = 0.0_f64;

    for (idx, seg) in parsed.transcription.into_iter().enumerate() {
        let start = seg.offsets.from as f64 / 1000.0;
        let end = seg.offsets.to as f64 / 1000.0;
        if end <= start {
            continue;
        }
        let text = seg.text.trim().to_string();
        full_text.push_str(&text);
        full_text.push(' ');
        max_end = max_end.max(end);
        segments.push(TranscriptSegment {
            id: idx as u32,
            start,
            end,
            text,
        });
    }

    Ok(TranscriptResult {
        text: full_text.trim().to_string(),
        language: parsed.result.and_then(|r| r.language),
        duration: max_end,
        segments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_whisper_json() {
        let json = r#"{
            "result": {"language": "en"},
            "transcription": [
                {"offsets": {"from": 0, "to": 2500}, "text": " Hello there"},
                {"offsets": {"from": 2500, "to": 5000}, "text": " general kenobi"}
            ]
        }"#;
        let result = parse_whisper_json(json).unwrap();
        assert_eq!(result.segments.len(), 2);
        assert_eq!(result.segments[0].start, 0.0);
        assert_eq!(result.segments[0].end, 2.5);
        assert_eq!(result.text, "Hello there general kenobi");
        assert_eq!(result.language.as_deref(), Some("en"));
    }

    #[test]
    fn empty_output_yields_zero_segments() {
        let result = parse_whisper_json("").unwrap();
        assert!(result.segments.is_empty());
    }

    #[test]
    fn degenerate_offsets_are_skipped() {
        let json = r#"{"transcription": [{"offsets": {"from": 1000, "to": 1000}, "text": "x"}]}"#;
        let result = parse_whisper_json(json).unwrap();
        assert!(result.segments.is_empty());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = parse_whisper_json("not json").unwrap_err();
        assert!(matches!(err, TranscribeError::ParseFailed(_)));
    }
}
