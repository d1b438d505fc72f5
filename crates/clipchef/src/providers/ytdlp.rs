//! Media fetcher backed by the yt-dlp binary
//!
//! Three invocations per fetch: a metadata probe (`--dump-json
//! --no-download`), the video download, and the audio extraction. yt-dlp
//! writes into the job directory under `{video_id}.{ext}` so the fetcher
//! can locate the results afterwards.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use super::fetcher::MediaFetcher;
use crate::config::FetchConfig;
use crate::error::{Error, Result};
use crate::types::MediaAsset;

/// Container formats yt-dlp may produce when mp4 is not available
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mkv", "mov", "avi"];

/// Metadata subset read from the `--dump-json` probe
#[derive(Debug, Deserialize)]
struct ProbeInfo {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
}

/// Downloads video and audio by shelling out to yt-dlp
pub struct YtDlpFetcher {
    binary: String,
    max_duration_secs: u64,
    socket_timeout_secs: u64,
    retries: u32,
}

impl YtDlpFetcher {
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            max_duration_secs: config.max_duration_secs,
            socket_timeout_secs: config.socket_timeout_secs,
            retries: config.retries,
        }
    }

    /// Flags shared by every yt-dlp invocation
    fn base_args(&self) -> Vec<String> {
        vec![
            "--quiet".to_string(),
            "--no-warnings".to_string(),
            "--socket-timeout".to_string(),
            self.socket_timeout_secs.to_string(),
            "--retries".to_string(),
            self.retries.to_string(),
        ]
    }

    async fn probe(&self, url: &str) -> Result<ProbeInfo> {
        let output = Command::new(&self.binary)
            .args(self.base_args())
            .args(["--dump-json", "--no-download"])
            .arg(url)
            .output()
            .await
            .map_err(|e| Error::download(format!("failed to run {}: {}", self.binary, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_failure(&stderr, "metadata probe"));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| Error::download(format!("unreadable metadata from {}: {}", self.binary, e)))
    }

    async fn download_video(&self, url: &str, dest_dir: &Path, video_id: &str) -> Result<()> {
        tracing::info!("Downloading video: {}", video_id);
        let template = dest_dir.join(format!("{video_id}.%(ext)s"));

        let output = Command::new(&self.binary)
            .args(self.base_args())
            .args(["--format", "best[ext=mp4]/best", "--no-progress", "--output"])
            .arg(&template)
            .arg(url)
            .output()
            .await
            .map_err(|e| Error::download(format!("failed to run {}: {}", self.binary, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_failure(&stderr, "video download"));
        }
        Ok(())
    }

    async fn extract_audio(&self, url: &str, dest_dir: &Path, video_id: &str) -> Result<()> {
        tracing::info!("Extracting audio: {}", video_id);
        let template = dest_dir.join(format!("{video_id}.%(ext)s"));

        let output = Command::new(&self.binary)
            .args(self.base_args())
            .args([
                "--extract-audio",
                "--audio-format",
                "mp3",
                "--audio-quality",
                "192K",
                "--no-progress",
                "--output",
            ])
            .arg(&template)
            .arg(url)
            .output()
            .await
            .map_err(|e| Error::download(format!("failed to run {}: {}", self.binary, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_failure(&stderr, "audio extraction"));
        }
        Ok(())
    }
}

#[async_trait]
impl MediaFetcher for YtDlpFetcher {
    async fn fetch(&self, url: &str, dest_dir: &Path) -> Result<MediaAsset> {
        let info = self.probe(url).await?;
        let title = info.title.unwrap_or_else(|| "untitled".to_string());
        let duration = info.duration.unwrap_or(0.0).round() as u64;
        tracing::info!("Video info: \"{}\" ({}s)", title, duration);

        // Long videos are allowed, but short-form content is what the
        // transcript and parsing stages are tuned for
        if duration > self.max_duration_secs {
            tracing::warn!(
                "Video is {}s long (expected at most {}s); proceeding anyway",
                duration,
                self.max_duration_secs
            );
        }

        self.download_video(url, dest_dir, &info.id).await?;
        self.extract_audio(url, dest_dir, &info.id).await?;

        let video_path = find_video_file(dest_dir, &info.id).ok_or_else(|| {
            Error::download(format!("downloaded video file not found for {}", info.id))
        })?;

        let audio_path = dest_dir.join(format!("{}.mp3", info.id));
        let audio_size = std::fs::metadata(&audio_path).map(|m| m.len()).unwrap_or(0);
        if audio_size == 0 {
            return Err(Error::download(format!(
                "audio file missing or empty: {}",
                audio_path.display()
            )));
        }

        tracing::info!(
            "Fetched video={} audio={}",
            video_path.display(),
            audio_path.display()
        );

        Ok(MediaAsset {
            video_path,
            audio_path,
            video_id: info.id,
            title,
            duration,
            url: url.to_string(),
        })
    }

    fn is_available(&self) -> bool {
        std::process::Command::new(&self.binary)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn name(&self) -> &str {
        &self.binary
    }
}

/// Map yt-dlp stderr to a user-facing acquisition error
fn classify_failure(stderr: &str, context: &str) -> Error {
    let lower = stderr.to_lowercase();
    if lower.contains("private") || lower.contains("unavailable") {
        Error::download("the video is private or has been removed")
    } else if lower.contains("not found") || lower.contains("404") {
        Error::download("video not found")
    } else {
        Error::download(format!("{}: {}", context, stderr.trim()))
    }
}

/// yt-dlp picks the container; look for any format it could have produced
fn find_video_file(dir: &Path, video_id: &str) -> Option<PathBuf> {
    VIDEO_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{video_id}.{ext}")))
        .find(|path| path.exists())
}
