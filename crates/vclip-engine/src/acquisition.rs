//! Acquisition adapters: one per `VideoSource` variant, per §4.A. Each
//! lands its output under `<storage>/uploads/<jobId>.<ext>`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use vclip_media::{download_hosted, download_http, move_file};
use vclip_models::{JobId, VideoSource};

use crate::error::{EngineError, EngineResult};

/// One adapter per source variant, all exposing `acquire`.
#[async_trait]
pub trait SourceAcquirer: Send + Sync {
    async fn acquire(&self, job_id: &JobId, uploads_dir: &Path) -> EngineResult<PathBuf>;
}

pub struct HostedUrlAcquirer {
    pub url: String,
    pub cookies_file: Option<String>,
}

#[async_trait]
impl SourceAcquirer for HostedUrlAcquirer {
    async fn acquire(&self, job_id: &JobId, uploads_dir: &Path) -> EngineResult<PathBuf> {
        let output_path = uploads_dir.join(format!("{}.mp4", job_id.as_str()));
        info!(job_id = %job_id, url = %self.url, "acquiring hosted-url source");
        let cookies_path = self.cookies_file.as_ref().map(Path::new);
        download_hosted(&self.url, &output_path, cookies_path)
            .await
            .map_err(|e| EngineError::DownloadFailed(e.to_string()))?;
        Ok(output_path)
    }
}

pub struct HttpUrlAcquirer {
    pub url: String,
    pub max_file_size: u64,
}

#[async_trait]
impl SourceAcquirer for HttpUrlAcquirer {
    async fn acquire(&self, job_id: &JobId, uploads_dir: &Path) -> EngineResult<PathBuf> {
        let ext = extension_from_url(&self.url).unwrap_or_else(|| "mp4".to_string());
        let output_path = uploads_dir.join(format!("{}.{}", job_id.as_str(), ext));
        info!(job_id = %job_id, url = %self.url, "acquiring http-url source");
        download_http(&self.url, &output_path, self.max_file_size)
            .await
            .map_err(|e| match e {
                vclip_media::MediaError::DownloadFailed { message } if message.contains("exceed") => {
                    EngineError::FileTooLarge
                }
                other => EngineError::DownloadFailed(other.to_string()),
            })?;
        Ok(output_path)
    }
}

pub struct UploadAcquirer {
    pub path: String,
}

#[async_trait]
impl SourceAcquirer for UploadAcquirer {
    async fn acquire(&self, job_id: &JobId, uploads_dir: &Path) -> EngineResult<PathBuf> {
        let src = PathBuf::from(&self.path);
        if !src.exists() {
            return Err(EngineError::InvalidInput(format!(
                "upload path does not exist: {}",
                self.path
            )));
        }
        let ext = src
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("mp4")
            .to_string();
        let output_path = uploads_dir.join(format!("{}.{}", job_id.as_str(), ext));
        info!(job_id = %job_id, path = %self.path, "acquiring upload source");
        move_file(&src, &output_path).await?;
        Ok(output_path)
    }
}

fn extension_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.next_back()?;
    Path::new(segment)
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_string())
}

/// Build the right adapter for a `VideoSource`.
pub fn acquirer_for(
    source: &VideoSource,
    cookies_file: Option<&str>,
    max_file_size: u64,
) -> Box<dyn SourceAcquirer> {
    match source {
        VideoSource::HostedUrl { url } => Box::new(HostedUrlAcquirer {
            url: url.clone(),
            cookies_file: cookies_file.map(|s| s.to_string()),
        }),
        VideoSource::HttpUrl { url } => Box::new(HttpUrlAcquirer {
            url: url.clone(),
            max_file_size,
        }),
        VideoSource::Upload { path } => Box::new(UploadAcquirer { path: path.clone() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_parsed_from_url_path() {
        assert_eq!(
            extension_from_url("https://example.com/video.webm?x=1"),
            Some("webm".to_string())
        );
    }

    #[test]
    fn extension_defaults_to_none_without_a_dot() {
        assert_eq!(extension_from_url("https://example.com/video"), None);
    }

    #[tokio::test]
    async fn upload_acquirer_fails_fast_on_missing_file() {
        let acquirer = UploadAcquirer {
            path: "/nonexistent/does-not-exist.mp4".to_string(),
        };
        let job_id = JobId::new();
        let dir = tempfile::tempdir().unwrap();
        let err = acquirer.acquire(&job_id, dir.path()).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }
}
