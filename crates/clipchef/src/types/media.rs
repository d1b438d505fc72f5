//! Video source identification and download metadata

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Platform URL patterns, each with one capture group for the video id
fn url_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"youtube\.com/shorts/([a-zA-Z0-9_-]+)",
            r"youtube\.com/watch\?v=([a-zA-Z0-9_-]+)",
            r"youtu\.be/([a-zA-Z0-9_-]+)",
            r"youtube\.com/embed/([a-zA-Z0-9_-]+)",
            r"(?:^|//)(?:www\.|m\.)?tiktok\.com/@[^/]+/video/(\d+)",
            r"(?:^|//)(?:www\.)?instagram\.com/(?:reel|p|tv)/([a-zA-Z0-9_-]+)/?",
        ]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("Invalid regex"))
        .collect()
    })
}

/// A validated video submission with its extracted platform id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSource {
    /// The submitted URL
    pub url: String,
    /// Platform video id (YouTube id, TikTok numeric id, Instagram shortcode)
    pub video_id: String,
}

impl VideoSource {
    /// Parse a submitted URL. Returns `None` for unsupported platforms or
    /// URLs without a recognizable video id.
    pub fn parse(url: &str) -> Option<Self> {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return None;
        }

        for pattern in url_patterns() {
            if let Some(caps) = pattern.captures(trimmed) {
                if let Some(id) = caps.get(1) {
                    return Some(Self {
                        url: trimmed.to_string(),
                        video_id: id.as_str().to_string(),
                    });
                }
            }
        }

        None
    }
}

/// Downloaded media files plus the source metadata yt-dlp reported
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAsset {
    /// Path to the downloaded video file
    pub video_path: PathBuf,
    /// Path to the extracted mp3 audio
    pub audio_path: PathBuf,
    /// Platform video id
    pub video_id: String,
    /// Video title
    pub title: String,
    /// Duration in seconds
    pub duration: u64,
    /// The submitted URL
    pub url: String,
}
