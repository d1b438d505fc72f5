//! API routes for the analysis server

pub mod analyze;
pub mod jobs;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Submission
        .route("/analyze", post(analyze::analyze_video))
        // Job tracking
        .route("/status/:id", get(jobs::get_status))
        .route("/result/:id", get(jobs::get_result))
        .route("/job/:id", delete(jobs::delete_job))
        .route("/stats", get(jobs::get_stats))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "clipchef",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Video-to-recipe analysis with staged download, transcription, and parsing",
        "endpoints": {
            "POST /api/analyze": "Submit a video URL for analysis",
            "GET /api/status/:id": "Get job status and progress",
            "GET /api/result/:id": "Get the parsed recipe for a completed job",
            "DELETE /api/job/:id": "Delete a job and its artifacts",
            "GET /api/stats": "Job store statistics"
        },
        "features": {
            "sources": "YouTube (watch/shorts/embed/youtu.be), TikTok, Instagram reels",
            "progress_push": "Per-stage callback to a configured backend",
            "bounded_store": "Jobs expire after a retention window; oldest evicted over capacity",
            "structured_recipes": "LLM output constrained to a JSON recipe schema"
        }
    }))
}
