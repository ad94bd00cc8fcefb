use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("No clips found for location '{location}', time of day '{time_of_day}', season '{season}'")]
    NoMatchingClips {
        location: String,
        time_of_day: String,
        season: String,
    },

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },

    #[error("Planning failed: {0}")]
    Planning(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
