//! HTTP client for a faster-whisper transcription service
//!
//! The service and this process share the artifact volume, so the request
//! carries the audio file path rather than the bytes. Transcription is the
//! slowest stage; the request timeout is minutes, not seconds.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::transcriber::Transcriber;
use crate::config::SttConfig;
use crate::error::{Error, Result};
use crate::types::{Transcript, TranscriptSegment};

#[derive(Debug, Serialize)]
struct TranscribeRequest<'a> {
    audio_path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TranscribeResponse {
    #[serde(alias = "full_text")]
    text: String,
    #[serde(default)]
    segments: Vec<TranscriptSegment>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    duration: f64,
}

/// Speech-to-text over a whisper HTTP service
pub struct WhisperClient {
    base_url: String,
    language: Option<String>,
    client: Client,
}

impl WhisperClient {
    pub fn new(config: &SttConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            client,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/transcribe", self.base_url)
    }
}

#[async_trait]
impl Transcriber for WhisperClient {
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript> {
        let path_str = audio_path.to_string_lossy();
        let request = TranscribeRequest {
            audio_path: &path_str,
            language: self.language.as_deref(),
        };

        tracing::info!("Transcribing {} via {}", audio_path.display(), self.base_url);

        let response = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::transcription(format!("whisper request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::transcription(format!(
                "whisper service returned HTTP {}",
                response.status()
            )));
        }

        let body: TranscribeResponse = response
            .json()
            .await
            .map_err(|e| Error::transcription(format!("unreadable whisper response: {}", e)))?;

        Ok(Transcript {
            full_text: body.text.trim().to_string(),
            segments: body.segments,
            language: body.language,
            duration: body.duration,
            source: "whisper".to_string(),
        })
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "whisper"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parses_segments() {
        let raw = r#"{
            "text": "First boil the anchovy stock.",
            "segments": [
                {"start": 0.0, "end": 3.2, "text": "First boil"},
                {"start": 3.2, "end": 6.1, "text": "the anchovy stock."}
            ],
            "language": "en",
            "duration": 6.1
        }"#;
        let body: TranscribeResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(body.text, "First boil the anchovy stock.");
        assert_eq!(body.segments.len(), 2);
        assert_eq!(body.language.as_deref(), Some("en"));
    }

    #[test]
    fn test_response_accepts_full_text_alias() {
        let body: TranscribeResponse =
            serde_json::from_str(r#"{"full_text": "hello there"}"#).unwrap();
        assert_eq!(body.text, "hello there");
        assert!(body.segments.is_empty());
        assert_eq!(body.duration, 0.0);
    }

    #[test]
    fn test_request_omits_unset_language() {
        let request = TranscribeRequest {
            audio_path: "/data/jobs/x/abc.mp3",
            language: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("language").is_none());
        assert_eq!(value["audio_path"], "/data/jobs/x/abc.mp3");
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = WhisperClient::new(&SttConfig {
            base_url: "http://stt:9000/".to_string(),
            language: Some("ko".to_string()),
            timeout_secs: 300,
        });
        assert_eq!(client.endpoint(), "http://stt:9000/transcribe");
    }
}
