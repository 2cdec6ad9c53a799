//! Video acquisition: hosted-platform download via `yt-dlp` and direct
//! HTTP(S) fetch.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use futures_util::StreamExt;
use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{MediaError, MediaResult};

const HTTP_READ_TIMEOUT: Duration = Duration::from_secs(5 * 60);
const ALLOWED_CONTENT_TYPES: &[&str] = &["video/mp4", "video/quicktime", "video/webm"];

/// Metadata probed from a hosted-platform URL without downloading.
#[derive(Debug, Clone, Deserialize)]
pub struct HostedMetadata {
    pub title: Option<String>,
    pub duration: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    #[serde(default)]
    pub fps: Option<f64>,
    pub filesize: Option<u64>,
    pub format: Option<String>,
    #[serde(default)]
    pub vcodec: Option<String>,
    #[serde(default)]
    pub tbr: Option<f64>,
}

/// Download from a hosted-video platform using `yt-dlp`. `output_path`
/// is the exact destination; `yt-dlp` is told to write there directly.
pub async fn download_hosted(
    url: &str,
    output_path: impl AsRef<Path>,
    cookies_file: Option<&Path>,
) -> MediaResult<()> {
    let output_path = output_path.as_ref();

    which::which("yt-dlp").map_err(|_| MediaError::YtDlpNotFound)?;

    info!("Downloading hosted video from {} to {}", url, output_path.display());

    let mut args: Vec<String> = vec![
        "-f".into(),
        "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best".into(),
        "--no-playlist".into(),
        "--max-filesize".into(),
        "2G".into(),
        "--extractor-retries".into(),
        "3".into(),
        "--retries".into(),
        "5".into(),
    ];
    if let Some(cookies) = cookies_file {
        args.push("--cookies".into());
        args.push(cookies.to_string_lossy().to_string());
    }
    args.push("-o".into());
    args.push(output_path.to_string_lossy().to_string());
    args.push(url.to_string());

    let output = Command::new("yt-dlp")
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        debug!("yt-dlp stderr: {}", stderr);
        return Err(MediaError::download_failed(format!(
            "yt-dlp failed: {}",
            stderr.lines().last().unwrap_or("unknown error")
        )));
    }

    if !output_path.exists() {
        return Err(MediaError::download_failed(
            "yt-dlp reported success but output file was not created",
        ));
    }

    Ok(())
}

/// Probe a hosted-platform URL's metadata without downloading.
pub async fn probe_hosted_metadata(url: &str) -> MediaResult<HostedMetadata> {
    which::which("yt-dlp").map_err(|_| MediaError::YtDlpNotFound)?;

    let output = Command::new("yt-dlp")
        .args(["-J", "--no-download", "--no-playlist"])
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::download_failed(format!(
            "yt-dlp metadata probe failed: {}",
            String::from_utf8_lossy(&output.stderr)
        )));
    }

    serde_json::from_slice(&output.stdout).map_err(MediaError::from)
}

/// Fetch a direct HTTP(S) URL to a video file, enforcing a content-type
/// allow-list and a streamed byte-count cap. Writes to `<output>.part`
/// and renames on success so a crash mid-download never leaves a file
/// that looks complete.
pub async fn download_http(
    url: &str,
    output_path: impl AsRef<Path>,
    max_file_size: u64,
) -> MediaResult<()> {
    let output_path = output_path.as_ref();

    let client = reqwest::Client::builder()
        .timeout(HTTP_READ_TIMEOUT)
        .build()?;

    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(MediaError::download_failed(format!(
            "HTTP GET {} returned {}",
            url,
            response.status()
        )));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase();

    if !ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
        return Err(MediaError::download_failed(format!(
            "unsupported content-type: {content_type}"
        )));
    }

    if let Some(len) = response.content_length() {
        if len > max_file_size {
            return Err(MediaError::download_failed(format!(
                "content-length {len} exceeds max file size {max_file_size}"
            )));
        }
    }

    let part_path = output_path.with_extension("part");
    let mut file = tokio::fs::File::create(&part_path).await?;
    let mut stream = response.bytes_stream();
    let mut total: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        total += chunk.len() as u64;
        if total > max_file_size {
            drop(file);
            let _ = tokio::fs::remove_file(&part_path).await;
            return Err(MediaError::download_failed(format!(
                "download exceeded max file size {max_file_size}"
            )));
        }
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    drop(file);

    tokio::fs::rename(&part_path, output_path).await?;

    info!(
        "Downloaded {} ({:.1} MB) from {}",
        output_path.display(),
        total as f64 / (1024.0 * 1024.0),
        url
    );

    Ok(())
}

/// Whether a URL looks like a hosted-platform URL this crate's `yt-dlp`
/// path should handle, versus a direct file URL.
pub fn is_hosted_platform_url(url: &str) -> bool {
    const HOSTED_DOMAINS: &[&str] = &[
        "youtube.com",
        "youtu.be",
        "vimeo.com",
        "twitter.com",
        "x.com",
        "twitch.tv",
        "tiktok.com",
    ];
    HOSTED_DOMAINS.iter().any(|domain| url.contains(domain))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_hosted_platform_urls() {
        assert!(is_hosted_platform_url("https://youtube.com/watch?v=abc"));
        assert!(is_hosted_platform_url("https://youtu.be/abc"));
        assert!(!is_hosted_platform_url("https://example.com/video.mp4"));
    }
}
