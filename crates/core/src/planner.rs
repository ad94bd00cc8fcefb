//! Clip sequence planner.
//!
//! Turns a candidate clip set, a target duration and a style into an ordered
//! plan of trimmed segments with transitions. The random source is injected
//! so callers (and tests) control seeding.

use std::fmt;

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::clip::Clip;
use crate::types::{DbId, Seconds};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Shortest highlight slice taken from a clip, in seconds.
pub const MIN_SEGMENT_SECS: Seconds = 1.0;

/// Upper bound (exclusive) of a highlight slice, in seconds.
pub const MAX_SEGMENT_SECS: Seconds = 3.0;

// ---------------------------------------------------------------------------
// Style and transitions
// ---------------------------------------------------------------------------

/// Visual effect applied between consecutive segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    Fade,
    Dissolve,
    Slide,
}

impl Transition {
    pub fn name(self) -> &'static str {
        match self {
            Self::Fade => "fade",
            Self::Dissolve => "dissolve",
            Self::Slide => "slide",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Weighted pools: an entry listed twice is drawn twice as often.
const CINEMATIC_POOL: &[Transition] = &[Transition::Fade, Transition::Fade, Transition::Dissolve];
const DYNAMIC_POOL: &[Transition] = &[Transition::Fade, Transition::Slide];
const SMOOTH_POOL: &[Transition] = &[Transition::Fade];

/// Editing style requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    Cinematic,
    Dynamic,
    #[default]
    Smooth,
}

impl Style {
    /// Parse a style name. Unknown or missing names fall back to
    /// [`Style::Smooth`] rather than failing the request.
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("cinematic") => Self::Cinematic,
            Some("dynamic") => Self::Dynamic,
            _ => Self::Smooth,
        }
    }

    /// Transition pool sampled uniformly for this style.
    pub fn transition_pool(self) -> &'static [Transition] {
        match self {
            Self::Cinematic => CINEMATIC_POOL,
            Self::Dynamic => DYNAMIC_POOL,
            Self::Smooth => SMOOTH_POOL,
        }
    }

    /// Draw one transition for this style.
    pub fn pick_transition<R: Rng + ?Sized>(self, rng: &mut R) -> Transition {
        // Pools are non-empty constants.
        *self
            .transition_pool()
            .choose(rng)
            .unwrap_or(&Transition::Fade)
    }
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// One scheduled segment of a generated video.
///
/// Serialized in camelCase because plans are persisted as JSON and returned
/// to polling clients verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequencePlanEntry {
    pub clip_id: DbId,
    pub filename: String,
    /// Seconds of the clip to use, from its start.
    pub duration: Seconds,
    pub transition: Transition,
    pub storage_path: String,
}

/// Build an ordered plan filling at most `total_duration` seconds.
///
/// Candidates are shuffled, then each contributes
/// `min(clip duration, uniform[1, 3), remaining)` seconds until the budget
/// is spent. Running out of candidates first yields a short plan, which is
/// not an error. Empty candidates or a non-positive budget yield an empty
/// plan.
pub fn plan_sequence<R: Rng + ?Sized>(
    rng: &mut R,
    candidates: &[Clip],
    total_duration: Seconds,
    style: Style,
) -> Vec<SequencePlanEntry> {
    if candidates.is_empty() || total_duration.is_nan() || total_duration <= 0.0 {
        return Vec::new();
    }

    let mut shuffled: Vec<&Clip> = candidates.iter().collect();
    shuffled.shuffle(rng);

    let mut remaining = total_duration;
    let mut plan = Vec::with_capacity(shuffled.len());

    for clip in shuffled {
        if remaining <= 0.0 {
            break;
        }
        if clip.duration_secs.is_nan() || clip.duration_secs <= 0.0 {
            continue;
        }

        let highlight = rng.random_range(MIN_SEGMENT_SECS..MAX_SEGMENT_SECS);
        let segment = clip.duration_secs.min(highlight).min(remaining);

        plan.push(SequencePlanEntry {
            clip_id: clip.id,
            filename: clip.filename.clone(),
            duration: segment,
            transition: style.pick_transition(rng),
            storage_path: clip.storage_path.clone(),
        });

        remaining -= segment;
    }

    plan
}

/// Sum of segment durations in a plan.
pub fn plan_total_duration(plan: &[SequencePlanEntry]) -> Seconds {
    plan.iter().map(|e| e.duration).sum()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
