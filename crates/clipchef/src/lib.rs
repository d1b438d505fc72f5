//! clipchef: video-to-recipe analysis service
//!
//! Takes a short cooking video URL (YouTube, TikTok, Instagram), downloads
//! it, transcribes the audio, and extracts a structured recipe with a local
//! LLM. Jobs run asynchronously in a bounded in-memory store with per-stage
//! progress tracking and an optional progress callback to another backend.

pub mod config;
pub mod error;
pub mod jobs;
pub mod providers;
pub mod server;
pub mod storage;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use jobs::{JobRecord, JobStage, JobStatus, JobStore};
pub use types::{AnalysisResult, MediaAsset, Recipe, Transcript, VideoSource};
