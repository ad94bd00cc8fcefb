//! Clip catalog domain types.
//!
//! A clip is a pre-recorded footage asset tagged by location, time of day and
//! season. Clips are read-only to the generation pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Seconds, Timestamp};

/// Upper bound on candidates fetched per generation request.
pub const DEFAULT_CANDIDATE_LIMIT: usize = 8;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Lighting condition a clip was shot in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Day,
    Night,
    Sunrise,
    Sunset,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 4] = [Self::Day, Self::Night, Self::Sunrise, Self::Sunset];

    /// Database / wire name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Night => "night",
            Self::Sunrise => "sunrise",
            Self::Sunset => "sunset",
        }
    }
}

impl FromStr for TimeOfDay {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid time of day '{s}'. Must be one of: day, night, sunrise, sunset"
                ))
            })
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Season a clip was shot in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Self::Spring, Self::Summer, Self::Autumn, Self::Winter];

    /// Database / wire name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
            Self::Winter => "winter",
        }
    }
}

impl FromStr for Season {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|season| season.name() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid season '{s}'. Must be one of: spring, summer, autumn, winter"
                ))
            })
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Clip
// ---------------------------------------------------------------------------

/// One reusable footage asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub id: DbId,
    pub filename: String,
    pub location: String,
    pub time_of_day: TimeOfDay,
    pub season: Season,
    /// Always positive; enforced by a CHECK constraint in the database.
    pub duration_secs: Seconds,
    #[serde(default)]
    pub tags: Vec<String>,
    pub storage_path: String,
    #[serde(default = "chrono::Utc::now")]
    pub created_at: Timestamp,
}

/// Exact-match filter used to look up candidate clips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipFilter {
    pub location: String,
    pub time_of_day: TimeOfDay,
    pub season: Season,
}

impl ClipFilter {
    /// Whether `clip` matches every field of the filter.
    pub fn matches(&self, clip: &Clip) -> bool {
        clip.location == self.location
            && clip.time_of_day == self.time_of_day
            && clip.season == self.season
    }
}

/// Distinct filter values present in the catalog, used to populate the
/// request form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogParameters {
    pub locations: Vec<String>,
    pub times: Vec<String>,
    pub seasons: Vec<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
