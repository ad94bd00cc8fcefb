use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the job store is unreachable.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    pub db_healthy: bool,
}

/// GET /health -- returns service and job store health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = match state.jobs.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Job store health check failed");
            false
        }
    };

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// Mount health check routes (root level, not under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
