//! Job tracking endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::jobs::{JobStatus, StoreStats};
use crate::server::state::AppState;
use crate::types::AnalysisResult;

/// Job status snapshot returned to clients
#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub progress: u8,
    pub message: String,
    pub video_id: Option<String>,
}

/// Response from a deletion
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub job_id: Uuid,
    pub message: String,
}

/// GET /api/status/:id - Get job status and progress
pub async fn get_status(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobStatusResponse>> {
    let record = state
        .store()
        .get(job_id)
        .ok_or_else(|| Error::JobNotFound(job_id.to_string()))?;

    Ok(Json(JobStatusResponse {
        job_id,
        status: record.status,
        progress: record.progress,
        message: record.message,
        video_id: record.video_id,
    }))
}

/// GET /api/result/:id - Get the analysis result for a completed job
pub async fn get_result(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<AnalysisResult>> {
    let record = state
        .store()
        .get(job_id)
        .ok_or_else(|| Error::JobNotFound(job_id.to_string()))?;

    match record.status {
        JobStatus::Failed => Err(Error::JobFailed(record.message)),
        JobStatus::Completed => {
            let result = record
                .result
                .ok_or_else(|| Error::internal("completed job has no result"))?;
            Ok(Json(result))
        }
        _ => Err(Error::NotReady("analysis is still in progress".to_string())),
    }
}

/// DELETE /api/job/:id - Delete a job and its artifacts
pub async fn delete_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<DeleteResponse>> {
    if !state.store().delete(job_id) {
        return Err(Error::JobNotFound(job_id.to_string()));
    }

    Ok(Json(DeleteResponse {
        job_id,
        message: "Job deleted.".to_string(),
    }))
}

/// GET /api/stats - Job store statistics
pub async fn get_stats(State(state): State<AppState>) -> Json<StoreStats> {
    Json(state.store().stats())
}
