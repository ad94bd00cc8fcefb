//! Row model for the `video_clips` table.

use reelgen_core::clip::Clip;
use reelgen_core::error::CoreError;
use reelgen_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `video_clips` table.
///
/// `time_of_day` and `season` are kept as text here; the CHECK constraints
/// guarantee they parse into the core enums.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClipRow {
    pub id: DbId,
    pub filename: String,
    pub location: String,
    pub time_of_day: String,
    pub season: String,
    pub duration_secs: f64,
    pub tags: Vec<String>,
    pub storage_path: String,
    pub created_at: Timestamp,
}

impl TryFrom<ClipRow> for Clip {
    type Error = CoreError;

    fn try_from(row: ClipRow) -> Result<Self, Self::Error> {
        Ok(Clip {
            id: row.id,
            filename: row.filename,
            location: row.location,
            time_of_day: row.time_of_day.parse()?,
            season: row.season.parse()?,
            duration_secs: row.duration_secs,
            tags: row.tags,
            storage_path: row.storage_path,
            created_at: row.created_at,
        })
    }
}

/// DTO for inserting a clip (ingestion, fixtures).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClip {
    pub filename: String,
    pub location: String,
    pub time_of_day: String,
    pub season: String,
    pub duration_secs: f64,
    #[serde(default)]
    pub tags: Vec<String>,
    pub storage_path: String,
}
