//! Job records and their lifecycle states

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{AnalysisResult, MediaAsset};

/// Job lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Wire / display form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Terminal states accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pipeline stage label. Advisory: it names where a job is, it never
/// drives control flow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStage {
    Download,
    Stt,
    Parsing,
    Done,
}

impl JobStage {
    /// Wire / display form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Download => "download",
            Self::Stt => "stt",
            Self::Parsing => "parsing",
            Self::Done => "done",
        }
    }
}

impl std::fmt::Display for JobStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tracked analysis job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: Uuid,
    pub status: JobStatus,
    pub stage: JobStage,
    /// 0-100, non-decreasing until terminal; failure resets it to 0
    pub progress: u8,
    /// Human-readable progress message
    pub message: String,
    /// The submitted URL
    pub url: String,
    /// Platform video id extracted at submission
    pub video_id: Option<String>,
    /// Download metadata, set once acquisition finishes
    pub video_info: Option<MediaAsset>,
    /// Present iff `status == Completed`
    pub result: Option<AnalysisResult>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobRecord {
    /// Create a fresh pending record
    pub fn new(id: Uuid, url: String, video_id: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            status: JobStatus::Pending,
            stage: JobStage::Download,
            progress: 0,
            message: "Waiting to start...".to_string(),
            url,
            video_id,
            video_info: None,
            result: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move the job forward within a run. No-op once terminal.
    pub fn advance(&mut self, stage: JobStage, progress: u8, message: impl Into<String>) {
        if self.status.is_terminal() {
            return;
        }
        debug_assert!(progress >= self.progress, "progress must not decrease");
        self.status = JobStatus::Processing;
        self.stage = stage;
        self.progress = progress;
        self.message = message.into();
    }

    /// Attach acquisition metadata. No-op once terminal.
    pub fn set_video_info(&mut self, asset: MediaAsset) {
        if self.status.is_terminal() {
            return;
        }
        self.video_info = Some(asset);
    }

    /// Finish successfully. The only way a record gains a result.
    pub fn complete(&mut self, result: AnalysisResult) {
        if self.status.is_terminal() {
            return;
        }
        self.status = JobStatus::Completed;
        self.stage = JobStage::Done;
        self.progress = 100;
        self.message = "Analysis complete!".to_string();
        self.result = Some(result);
    }

    /// Finish with a failure. Progress resets to 0 and stays there.
    pub fn fail(&mut self, message: impl Into<String>) {
        if self.status.is_terminal() {
            return;
        }
        self.status = JobStatus::Failed;
        self.progress = 0;
        self.message = message.into();
        self.result = None;
    }
}
