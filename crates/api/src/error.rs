use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reelgen_core::error::CoreError;
use serde_json::json;

/// Hint returned alongside `NO_MATCHING_CLIPS`.
pub const NO_MATCHING_CLIPS_SUGGESTION: &str = "Try different location, time, or season";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `reelgen_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A malformed request body or parameter.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::NoMatchingClips { .. } => {
                    let body = json!({
                        "error": "No clips found matching your criteria",
                        "code": "NO_MATCHING_CLIPS",
                        "suggestion": NO_MATCHING_CLIPS_SUGGESTION,
                    });
                    return (StatusCode::NOT_FOUND, axum::Json(body)).into_response();
                }
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::InvalidTransition { .. } => {
                    (StatusCode::CONFLICT, "CONFLICT", core.to_string())
                }
                CoreError::Planning(msg)
                | CoreError::Persistence(msg)
                | CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
