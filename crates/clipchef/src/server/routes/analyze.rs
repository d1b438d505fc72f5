//! Video submission endpoint

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::VideoSource;

/// Analysis request body
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub url: String,
}

/// Response from a submission
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub job_id: Uuid,
    pub message: String,
}

/// POST /api/analyze - Submit a video URL for analysis
pub async fn analyze_video(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<(StatusCode, Json<AnalyzeResponse>)> {
    let url = request.url.trim();
    if url.is_empty() {
        return Err(Error::invalid_url("no URL provided"));
    }

    let source = VideoSource::parse(url).ok_or_else(|| Error::invalid_url(url))?;

    let job_id = Uuid::new_v4();
    state
        .store()
        .create(job_id, source.url.clone(), Some(source.video_id.clone()));
    tracing::info!("New job {}: video_id={}", job_id, source.video_id);

    let pipeline = Arc::clone(state.pipeline());
    tokio::spawn(pipeline.run(job_id, source));

    Ok((
        StatusCode::ACCEPTED,
        Json(AnalyzeResponse {
            job_id,
            message: "Analysis started.".to_string(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::providers::{MediaFetcher, RecipeStructurer, Transcriber};
    use crate::types::{MediaAsset, Recipe, Transcript};
    use async_trait::async_trait;
    use std::path::Path;

    struct RejectingFetcher;

    #[async_trait]
    impl MediaFetcher for RejectingFetcher {
        async fn fetch(&self, _url: &str, _dest_dir: &Path) -> Result<MediaAsset> {
            Err(Error::download("stub fetcher"))
        }

        fn is_available(&self) -> bool {
            false
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    struct UnusedTranscriber;

    #[async_trait]
    impl Transcriber for UnusedTranscriber {
        async fn transcribe(&self, _audio_path: &Path) -> Result<Transcript> {
            unreachable!("transcriber is never reached in these tests")
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(false)
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    struct UnusedStructurer;

    #[async_trait]
    impl RecipeStructurer for UnusedStructurer {
        async fn structure(&self, _transcript: &Transcript) -> Result<Recipe> {
            unreachable!("structurer is never reached in these tests")
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(false)
        }

        fn name(&self) -> &str {
            "stub"
        }

        fn model(&self) -> &str {
            "stub"
        }
    }

    fn test_state(data_dir: &Path) -> AppState {
        let mut config = Config::default();
        config.jobs.data_dir = data_dir.to_path_buf();
        AppState::with_providers(
            config,
            Arc::new(RejectingFetcher),
            Arc::new(UnusedTranscriber),
            Arc::new(UnusedStructurer),
        )
    }

    #[tokio::test]
    async fn test_submit_returns_job_id_and_creates_record() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path());

        let (status, Json(response)) = analyze_video(
            State(state.clone()),
            Json(AnalyzeRequest {
                url: "https://www.youtube.com/shorts/abc123DEF".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(response.message, "Analysis started.");
        // The spawned run may already have failed the job, but the record exists
        let record = state.store().get(response.job_id).unwrap();
        assert_eq!(record.video_id.as_deref(), Some("abc123DEF"));
    }

    #[tokio::test]
    async fn test_submit_rejects_unsupported_url() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path());

        let err = analyze_video(
            State(state.clone()),
            Json(AnalyzeRequest {
                url: "https://example.com/watch?v=nope".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::InvalidUrl(_)));
        assert!(state.store().is_empty());
    }

    #[tokio::test]
    async fn test_submit_rejects_empty_url() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path());

        let err = analyze_video(
            State(state),
            Json(AnalyzeRequest {
                url: "   ".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::InvalidUrl(_)));
    }
}
