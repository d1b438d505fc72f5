//! Media fetcher trait for acquiring video and audio from a source URL

use async_trait::async_trait;
use std::path::Path;

use crate::error::Result;
use crate::types::MediaAsset;

/// Trait for downloading a video and extracting its audio track
///
/// Implementations:
/// - `YtDlpFetcher`: shells out to the yt-dlp binary
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Download the video behind `url` into `dest_dir`, extract its audio,
    /// and return paths plus source metadata
    async fn fetch(&self, url: &str, dest_dir: &Path) -> Result<MediaAsset>;

    /// Check whether the backing tool is installed and runnable
    fn is_available(&self) -> bool;

    /// Get fetcher name for logging
    fn name(&self) -> &str;
}
