//! Generation job model, request validation, and the status state machine.
//!
//! A job starts in `processing` and moves exactly once to either
//! `completed` (with an output reference) or `failed` (without one).

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::clip::{ClipFilter, Season, TimeOfDay};
use crate::error::CoreError;
use crate::planner::{SequencePlanEntry, Style};
use crate::types::{DbId, Seconds, Timestamp};

/// Longest video a user may request, in seconds.
pub const MAX_REQUESTED_DURATION_SECS: Seconds = 300.0;

/// Public URL prefix under which rendered videos are served.
pub const GENERATED_URL_PREFIX: &str = "/api/v1/videos/generated";

/// Container extension of rendered videos.
pub const OUTPUT_EXTENSION: &str = "mp4";

// ---------------------------------------------------------------------------
// Status state machine
// ---------------------------------------------------------------------------

/// Status ID type matching SMALLINT in the `generation_statuses` table.
pub type StatusId = i16;

/// Lifecycle status of a generation job. Discriminants match the seed
/// order of `generation_statuses`.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    Processing = 1,
    Completed = 2,
    Failed = 3,
}

impl GenerationStatus {
    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    /// Look up a status by database ID.
    pub fn from_id(id: StatusId) -> Result<Self, CoreError> {
        match id {
            1 => Ok(Self::Processing),
            2 => Ok(Self::Completed),
            3 => Ok(Self::Failed),
            other => Err(CoreError::Internal(format!(
                "Unknown generation status id {other}"
            ))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Completed and failed jobs never change again.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Processing, Self::Completed) | (Self::Processing, Self::Failed)
        )
    }

    /// Reject any transition other than `processing -> {completed, failed}`.
    pub fn validate_transition(self, next: Self) -> Result<(), CoreError> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(CoreError::InvalidTransition {
                from: self.name(),
                to: next.name(),
            })
        }
    }
}

impl From<GenerationStatus> for StatusId {
    fn from(value: GenerationStatus) -> Self {
        value as StatusId
    }
}

impl fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Terminal result recorded by the job processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Completed { output_filename: String },
    Failed,
}

impl JobOutcome {
    pub fn status(&self) -> GenerationStatus {
        match self {
            Self::Completed { .. } => GenerationStatus::Completed,
            Self::Failed => GenerationStatus::Failed,
        }
    }

    pub fn output_filename(&self) -> Option<&str> {
        match self {
            Self::Completed { output_filename } => Some(output_filename),
            Self::Failed => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Job record
// ---------------------------------------------------------------------------

/// One request's lifecycle record as exposed to pollers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationJob {
    pub id: DbId,
    /// Request body exactly as submitted.
    pub user_parameters: serde_json::Value,
    pub clip_sequence: Vec<SequencePlanEntry>,
    pub output_filename: Option<String>,
    pub status: GenerationStatus,
    pub created_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Request parameters
// ---------------------------------------------------------------------------

/// Body of a generation request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParams {
    #[validate(length(min = 1, message = "location must not be empty"))]
    pub location: String,
    pub time_of_day: String,
    pub season: String,
    #[validate(range(
        exclusive_min = 0.0,
        max = MAX_REQUESTED_DURATION_SECS,
        message = "duration must be greater than 0 and at most 300 seconds"
    ))]
    pub duration: Seconds,
    #[serde(default)]
    pub style: Option<String>,
}

/// Parameters after validation, ready for the catalog and planner.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub filter: ClipFilter,
    pub duration: Seconds,
    pub style: Style,
}

impl GenerationParams {
    /// Validate field ranges and parse the enum-like fields.
    pub fn into_request(self) -> Result<GenerationRequest, CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;

        let location = self.location.trim();
        if location.is_empty() {
            return Err(CoreError::Validation(
                "location must not be blank".to_string(),
            ));
        }

        let time_of_day: TimeOfDay = self.time_of_day.parse()?;
        let season: Season = self.season.parse()?;

        Ok(GenerationRequest {
            filter: ClipFilter {
                location: location.to_string(),
                time_of_day,
                season,
            },
            duration: self.duration,
            style: Style::from_name(self.style.as_deref()),
        })
    }
}

// ---------------------------------------------------------------------------
// Output naming
// ---------------------------------------------------------------------------

/// File name of a rendered video: `video_{jobId}_{timestampMillis}.mp4`.
pub fn output_file_name(job_id: DbId, rendered_at: Timestamp) -> String {
    format!(
        "video_{job_id}_{}.{OUTPUT_EXTENSION}",
        rendered_at.timestamp_millis()
    )
}

/// Public reference stored on a completed job for `file_name`.
pub fn output_reference(file_name: &str) -> String {
    format!("{GENERATED_URL_PREFIX}/{file_name}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    use super::*;

    fn params(duration: f64) -> GenerationParams {
        GenerationParams {
            location: "Paris".into(),
            time_of_day: "day".into(),
            season: "summer".into(),
            duration,
            style: Some("smooth".into()),
        }
    }

    // -- State machine --

    #[test]
    fn processing_moves_to_either_terminal_state() {
        assert!(GenerationStatus::Processing.can_transition_to(GenerationStatus::Completed));
        assert!(GenerationStatus::Processing.can_transition_to(GenerationStatus::Failed));
    }

    #[test]
    fn terminal_states_are_final() {
        for terminal in [GenerationStatus::Completed, GenerationStatus::Failed] {
            assert!(terminal.is_terminal());
            for next in [
                GenerationStatus::Processing,
                GenerationStatus::Completed,
                GenerationStatus::Failed,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn processing_to_processing_is_rejected() {
        assert_matches!(
            GenerationStatus::Processing.validate_transition(GenerationStatus::Processing),
            Err(CoreError::InvalidTransition {
                from: "processing",
                to: "processing"
            })
        );
    }

    #[test]
    fn status_ids_round_trip() {
        for status in [
            GenerationStatus::Processing,
            GenerationStatus::Completed,
            GenerationStatus::Failed,
        ] {
            assert_eq!(GenerationStatus::from_id(status.id()).unwrap(), status);
        }
        assert_matches!(GenerationStatus::from_id(9), Err(CoreError::Internal(_)));
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_value(GenerationStatus::Completed).unwrap();
        assert_eq!(json, "completed");
    }

    #[test]
    fn outcome_carries_output_only_when_completed() {
        let done = JobOutcome::Completed {
            output_filename: "/x.mp4".into(),
        };
        assert_eq!(done.status(), GenerationStatus::Completed);
        assert_eq!(done.output_filename(), Some("/x.mp4"));
        assert_eq!(JobOutcome::Failed.status(), GenerationStatus::Failed);
        assert_eq!(JobOutcome::Failed.output_filename(), None);
    }

    // -- Request validation --

    #[test]
    fn valid_params_become_request() {
        let request = params(15.0).into_request().unwrap();
        assert_eq!(request.filter.location, "Paris");
        assert_eq!(request.filter.time_of_day, TimeOfDay::Day);
        assert_eq!(request.filter.season, Season::Summer);
        assert_eq!(request.style, Style::Smooth);
    }

    #[test]
    fn params_deserialize_from_camel_case() {
        let json = serde_json::json!({
            "location": "Paris",
            "timeOfDay": "sunset",
            "season": "autumn",
            "duration": 20,
            "style": "cinematic"
        });
        let request = serde_json::from_value::<GenerationParams>(json)
            .unwrap()
            .into_request()
            .unwrap();
        assert_eq!(request.filter.time_of_day, TimeOfDay::Sunset);
        assert_eq!(request.style, Style::Cinematic);
    }

    #[test]
    fn zero_and_excessive_durations_are_rejected() {
        assert_matches!(params(0.0).into_request(), Err(CoreError::Validation(_)));
        assert_matches!(params(-5.0).into_request(), Err(CoreError::Validation(_)));
        assert_matches!(params(301.0).into_request(), Err(CoreError::Validation(_)));
        assert!(params(MAX_REQUESTED_DURATION_SECS).into_request().is_ok());
    }

    #[test]
    fn empty_location_is_rejected() {
        let mut p = params(10.0);
        p.location = String::new();
        assert_matches!(p.into_request(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn blank_location_is_rejected() {
        let mut p = params(10.0);
        p.location = "   ".into();
        assert_matches!(p.into_request(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn location_is_trimmed() {
        let mut p = params(10.0);
        p.location = "  Paris ".into();
        assert_eq!(p.into_request().unwrap().filter.location, "Paris");
    }

    #[test]
    fn duration_limit_is_inclusive() {
        assert!(params(MAX_REQUESTED_DURATION_SECS).into_request().is_ok());
        assert_matches!(
            params(MAX_REQUESTED_DURATION_SECS + 0.5).into_request(),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn unknown_season_is_rejected() {
        let mut p = params(10.0);
        p.season = "monsoon".into();
        assert_matches!(p.into_request(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn missing_style_defaults_to_smooth() {
        let mut p = params(10.0);
        p.style = None;
        assert_eq!(p.into_request().unwrap().style, Style::Smooth);
    }

    // -- Output naming --

    #[test]
    fn output_names_follow_video_id_timestamp_pattern() {
        let at = chrono::Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let name = output_file_name(42, at);
        assert_eq!(name, "video_42_1700000000123.mp4");
        assert_eq!(
            output_reference(&name),
            "/api/v1/videos/generated/video_42_1700000000123.mp4"
        );
    }
}
