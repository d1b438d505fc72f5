//! Speech-to-text trait

use async_trait::async_trait;
use std::path::Path;

use crate::error::Result;
use crate::types::Transcript;

/// Trait for turning an audio file into a transcript
///
/// Implementations:
/// - `WhisperClient`: faster-whisper style HTTP service
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe the audio file at `audio_path`
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript>;

    /// Check if the service is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get transcriber name for logging
    fn name(&self) -> &str;
}
