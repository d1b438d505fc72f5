//! Error types for the analysis service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, Error>;

/// Analysis service errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unsupported or malformed video URL
    #[error("Invalid video URL: {0}")]
    InvalidUrl(String),

    /// Video download error
    #[error("Video download failed: {0}")]
    Download(String),

    /// Speech-to-text error
    #[error("Transcription failed: {0}")]
    Transcription(String),

    /// Recipe parsing error
    #[error("Recipe parsing failed: {0}")]
    RecipeParse(String),

    /// Job not found
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// Result requested before the job finished
    #[error("Job not ready: {0}")]
    NotReady(String),

    /// Result requested for a failed job
    #[error("Job failed: {0}")]
    JobFailed(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an invalid URL error
    pub fn invalid_url(message: impl Into<String>) -> Self {
        Self::InvalidUrl(message.into())
    }

    /// Create a download error
    pub fn download(message: impl Into<String>) -> Self {
        Self::Download(message.into())
    }

    /// Create a transcription error
    pub fn transcription(message: impl Into<String>) -> Self {
        Self::Transcription(message.into())
    }

    /// Create a recipe parse error
    pub fn recipe_parse(message: impl Into<String>) -> Self {
        Self::RecipeParse(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::BAD_REQUEST, "config_error", msg.clone()),
            Error::InvalidUrl(msg) => (
                StatusCode::BAD_REQUEST,
                "invalid_url",
                format!("Invalid video URL: {}", msg),
            ),
            Error::Download(msg) => (StatusCode::BAD_GATEWAY, "download_error", msg.clone()),
            Error::Transcription(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "transcription_error",
                msg.clone(),
            ),
            Error::RecipeParse(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "recipe_parse_error",
                msg.clone(),
            ),
            Error::JobNotFound(id) => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("Job not found: {}", id),
            ),
            Error::NotReady(msg) => (StatusCode::BAD_REQUEST, "not_ready", msg.clone()),
            Error::JobFailed(msg) => (StatusCode::BAD_REQUEST, "job_failed", msg.clone()),
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                err.to_string(),
            ),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string()),
            Error::Http(err) => (StatusCode::BAD_GATEWAY, "http_error", err.to_string()),
            Error::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
