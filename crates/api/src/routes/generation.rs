use axum::routing::{get, post};
use axum::Router;

use crate::handlers::generation;
use crate::state::AppState;

/// Video generation routes, mounted under `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/parameters", get(generation::get_parameters))
        .route("/generate-video", post(generation::generate_video))
        .route("/job-status/{id}", get(generation::get_job_status))
}
