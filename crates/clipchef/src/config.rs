//! Configuration for the analysis service
//!
//! Defaults work out of the box against local collaborators (yt-dlp on
//! PATH, a Whisper HTTP service, Ollama). A TOML file named by
//! `CLIPCHEF_CONFIG` and `CLIPCHEF_*` environment variables override them.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Job store configuration
    pub jobs: JobsConfig,
    /// Pipeline configuration
    pub pipeline: PipelineConfig,
    /// Progress push configuration
    pub notify: NotifyConfig,
    /// Video download configuration
    pub fetch: FetchConfig,
    /// Speech-to-text configuration
    pub stt: SttConfig,
    /// LLM (Ollama) configuration
    pub llm: LlmConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config {}: {}", path.display(), e)))
    }

    /// Build configuration from defaults, an optional `CLIPCHEF_CONFIG`
    /// TOML file, and `CLIPCHEF_*` environment overrides (in that order)
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var("CLIPCHEF_CONFIG") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("CLIPCHEF_HOST") {
            self.server.host = host;
        }
        if let Some(port) = env_parse("CLIPCHEF_PORT") {
            self.server.port = port;
        }
        if let Some(max_jobs) = env_parse("CLIPCHEF_MAX_JOBS") {
            self.jobs.max_jobs = max_jobs;
        }
        if let Some(hours) = env_parse("CLIPCHEF_JOB_EXPIRE_HOURS") {
            self.jobs.expire_hours = hours;
        }
        if let Ok(dir) = std::env::var("CLIPCHEF_DATA_DIR") {
            self.jobs.data_dir = PathBuf::from(dir);
        }
        if let Some(chars) = env_parse("CLIPCHEF_MIN_TRANSCRIPT_CHARS") {
            self.pipeline.min_transcript_chars = chars;
        }
        if let Ok(url) = std::env::var("CLIPCHEF_NOTIFY_BASE_URL") {
            self.notify.base_url = Some(url);
        }
        if let Some(secs) = env_parse("CLIPCHEF_NOTIFY_TIMEOUT_SECS") {
            self.notify.timeout_secs = secs;
        }
        if let Some(secs) = env_parse("CLIPCHEF_MAX_VIDEO_DURATION_SECS") {
            self.fetch.max_duration_secs = secs;
        }
        if let Ok(url) = std::env::var("CLIPCHEF_STT_BASE_URL") {
            self.stt.base_url = url;
        }
        if let Ok(url) = std::env::var("CLIPCHEF_OLLAMA_BASE_URL") {
            self.llm.base_url = url;
        }
        if let Ok(model) = std::env::var("CLIPCHEF_OLLAMA_MODEL") {
            self.llm.model = model;
        }
    }
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring unparseable {}={:?}", name, raw);
            None
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Job store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JobsConfig {
    /// Maximum number of retained jobs; older jobs are evicted first
    pub max_jobs: usize,
    /// Retention horizon in hours; expired jobs are removed on the next create
    pub expire_hours: i64,
    /// Root directory for per-job artifacts (downloaded media, audio)
    pub data_dir: PathBuf,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            max_jobs: 100,
            expire_hours: 24,
            data_dir: PathBuf::from("./data/jobs"),
        }
    }
}

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Transcripts shorter than this count as extraction failures
    pub min_transcript_chars: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_transcript_chars: 20,
        }
    }
}

/// Progress push configuration
///
/// When `base_url` is unset the notifier is disabled and progress is
/// available through polling only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Base URL of the backend receiving progress pushes
    pub base_url: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: 5,
        }
    }
}

/// Video download (yt-dlp) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// yt-dlp binary name or path
    pub binary: String,
    /// Advisory duration ceiling in seconds; longer videos log a warning
    pub max_duration_secs: u64,
    /// Socket timeout passed to yt-dlp
    pub socket_timeout_secs: u64,
    /// Download retries passed to yt-dlp
    pub retries: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            binary: "yt-dlp".to_string(),
            max_duration_secs: 180,
            socket_timeout_secs: 30,
            retries: 3,
        }
    }
}

/// Speech-to-text service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SttConfig {
    /// Whisper HTTP service base URL
    pub base_url: String,
    /// Forced transcription language (auto-detect when unset)
    pub language: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9000".to_string(),
            language: None,
            timeout_secs: 300,
        }
    }
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Generation model name
    pub model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.2:3b".to_string(),
            temperature: 0.2, // Low for faithful extraction
            timeout_secs: 120,
            max_retries: 2,
        }
    }
}
