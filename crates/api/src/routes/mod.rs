pub mod generation;
pub mod health;

use axum::Router;
use tower_http::services::ServeDir;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /parameters                 distinct catalog filter values (GET)
/// /generate-video             submit a generation job (POST)
/// /job-status/{id}            poll a job (GET)
/// /videos/*                   static files under the storage root (GET)
/// ```
pub fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(generation::router())
        .nest_service("/videos", ServeDir::new(&state.config.storage_path))
}
