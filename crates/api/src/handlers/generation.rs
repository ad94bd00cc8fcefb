//! Handlers for clip-sequence video generation.
//!
//! Routes:
//! - `GET   /parameters`        distinct catalog filter values
//! - `POST  /generate-video`    plan a sequence and start a job
//! - `GET   /job-status/{id}`   poll a job record

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use reelgen_core::error::CoreError;
use reelgen_core::job::{GenerationParams, GenerationStatus};
use reelgen_core::planner::plan_sequence;
use reelgen_core::types::DbId;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Rough wall-clock estimate shown to the submitter.
pub const ESTIMATED_TIME: &str = "20-30 seconds";

/// Response body for a newly submitted job.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoResponse {
    pub job_id: DbId,
    pub status: GenerationStatus,
    pub message: &'static str,
    pub estimated_time: &'static str,
    /// Number of segments in the plan.
    pub clips_used: usize,
}

/// GET /api/v1/parameters
pub async fn get_parameters(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let params = state.clips.parameters().await?;
    Ok(Json(DataResponse { data: params }))
}

/// POST /api/v1/generate-video
///
/// Validates the request, picks candidate clips, plans the sequence, stores
/// the job, and hands it to the processor. Responds as soon as the job is
/// stored; progress is observed by polling `job-status`.
pub async fn generate_video(
    State(state): State<AppState>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(body) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let params: GenerationParams = serde_json::from_value(body.clone())
        .map_err(|e| CoreError::Validation(format!("Invalid generation parameters: {e}")))?;
    let request = params.into_request()?;

    tracing::info!(
        location = %request.filter.location,
        time_of_day = %request.filter.time_of_day,
        season = %request.filter.season,
        duration = request.duration,
        style = ?request.style,
        "Generating video",
    );

    let candidates = state
        .clips
        .find_candidates(&request.filter, state.config.candidate_limit)
        .await?;

    if candidates.is_empty() {
        return Err(CoreError::NoMatchingClips {
            location: request.filter.location,
            time_of_day: request.filter.time_of_day.to_string(),
            season: request.filter.season.to_string(),
        }
        .into());
    }

    let plan = {
        let mut rng = rand::rng();
        plan_sequence(&mut rng, &candidates, request.duration, request.style)
    };
    if plan.is_empty() {
        return Err(CoreError::Planning(format!(
            "No usable segments among {} candidate clips",
            candidates.len()
        ))
        .into());
    }

    let job = state.jobs.create(body, &plan).await?;
    let clips_used = plan.len();
    state.processor.start(job.id, plan);

    tracing::info!(job_id = job.id, clips_used, "Video generation job created");

    Ok(Json(DataResponse {
        data: GenerateVideoResponse {
            job_id: job.id,
            status: job.status,
            message: "Video generation started",
            estimated_time: ESTIMATED_TIME,
            clips_used,
        },
    }))
}

/// GET /api/v1/job-status/{id}
pub async fn get_job_status(
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id) = id.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let job = state.jobs.get(id).await?;
    Ok(Json(DataResponse { data: job }))
}
