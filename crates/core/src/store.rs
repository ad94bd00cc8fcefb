//! Storage seams consumed by the generation pipeline.
//!
//! Implemented by `reelgen-db` (PostgreSQL) and by [`crate::memory`].

use async_trait::async_trait;

use crate::clip::{CatalogParameters, Clip, ClipFilter};
use crate::error::CoreError;
use crate::job::{GenerationJob, JobOutcome};
use crate::planner::SequencePlanEntry;
use crate::types::DbId;

/// Read access to the clip catalog.
#[async_trait]
pub trait ClipCatalog: Send + Sync {
    /// Clips matching `filter` exactly, at most `limit` of them.
    ///
    /// Order is unspecified. No match is an empty vector, not an error.
    async fn find_candidates(
        &self,
        filter: &ClipFilter,
        limit: usize,
    ) -> Result<Vec<Clip>, CoreError>;

    /// Distinct locations, times of day and seasons present in the catalog.
    async fn parameters(&self) -> Result<CatalogParameters, CoreError>;
}

/// Persistent job records. The store is the source of truth for job status.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert a new job in `processing` status together with its plan.
    async fn create(
        &self,
        user_parameters: serde_json::Value,
        plan: &[SequencePlanEntry],
    ) -> Result<GenerationJob, CoreError>;

    /// Fetch a job. Unknown ids yield [`CoreError::NotFound`].
    async fn get(&self, id: DbId) -> Result<GenerationJob, CoreError>;

    /// Record the terminal outcome of a job.
    ///
    /// Fails with [`CoreError::InvalidTransition`] if the job already left
    /// `processing`.
    async fn update(&self, id: DbId, outcome: JobOutcome) -> Result<(), CoreError>;

    /// Cheap liveness probe for health checks.
    async fn ping(&self) -> Result<(), CoreError>;
}
