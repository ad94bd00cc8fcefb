//! Row model for the `generated_videos` table.

use reelgen_core::error::CoreError;
use reelgen_core::job::{GenerationJob, GenerationStatus, StatusId};
use reelgen_core::planner::SequencePlanEntry;
use reelgen_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `generated_videos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GeneratedVideoRow {
    pub id: DbId,
    pub user_parameters: serde_json::Value,
    pub clip_sequence: serde_json::Value,
    pub output_filename: Option<String>,
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

impl TryFrom<GeneratedVideoRow> for GenerationJob {
    type Error = CoreError;

    fn try_from(row: GeneratedVideoRow) -> Result<Self, Self::Error> {
        let clip_sequence: Vec<SequencePlanEntry> = serde_json::from_value(row.clip_sequence)
            .map_err(|e| {
                CoreError::Internal(format!(
                    "Malformed clip_sequence on generated video {}: {e}",
                    row.id
                ))
            })?;

        Ok(GenerationJob {
            id: row.id,
            user_parameters: row.user_parameters,
            clip_sequence,
            output_filename: row.output_filename,
            status: GenerationStatus::from_id(row.status_id)?,
            created_at: row.created_at,
            completed_at: row.completed_at,
        })
    }
}
