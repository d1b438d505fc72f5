//! Fire-and-forget progress push
//!
//! When a callback base URL is configured, every job transition is POSTed
//! to `{base}/api/internal/jobs/{job_id}/progress`. Pushes are advisory:
//! the request uses a short timeout and any failure is logged and dropped,
//! so a slow or absent consumer can never stall or fail a pipeline run.

use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

use super::record::{JobStage, JobStatus};
use crate::config::NotifyConfig;

/// Consumers expect the stage label under the `step` key
#[derive(Debug, Serialize)]
struct ProgressPayload<'a> {
    status: &'a str,
    progress: u8,
    #[serde(rename = "step")]
    stage: &'a str,
    message: &'a str,
}

/// Pushes job progress to an external callback endpoint
pub struct ProgressNotifier {
    base_url: Option<String>,
    client: Client,
}

impl ProgressNotifier {
    pub fn new(config: &NotifyConfig) -> Self {
        let base_url = config
            .base_url
            .as_ref()
            .map(|base| base.trim_end_matches('/').to_string());

        if base_url.is_none() {
            tracing::info!("Progress notifications disabled (no callback base URL configured)");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { base_url, client }
    }

    /// Push one transition. Never returns an error; failures are logged.
    pub async fn notify(
        &self,
        job_id: Uuid,
        status: JobStatus,
        progress: u8,
        stage: JobStage,
        message: &str,
    ) {
        let Some(base) = &self.base_url else {
            return;
        };

        let url = endpoint(base, job_id);
        let payload = ProgressPayload {
            status: status.as_str(),
            progress,
            stage: stage.as_str(),
            message,
        };

        match self.client.post(&url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::debug!("Progress pushed for job {} ({}%)", job_id, progress);
            }
            Ok(response) => {
                tracing::warn!(
                    "Progress push for job {} rejected: HTTP {}",
                    job_id,
                    response.status()
                );
            }
            Err(e) => {
                tracing::warn!("Progress push for job {} failed: {}", job_id, e);
            }
        }
    }

    /// True when a callback base URL is configured
    pub fn is_enabled(&self) -> bool {
        self.base_url.is_some()
    }
}

fn endpoint(base: &str, job_id: Uuid) -> String {
    format!("{}/api/internal/jobs/{}/progress", base, job_id)
}
