//! PostgreSQL-backed implementations of the core storage traits.

use async_trait::async_trait;
use reelgen_core::clip::{CatalogParameters, Clip, ClipFilter};
use reelgen_core::error::CoreError;
use reelgen_core::job::{GenerationJob, JobOutcome};
use reelgen_core::planner::SequencePlanEntry;
use reelgen_core::store::{ClipCatalog, JobStore};
use reelgen_core::types::DbId;

use crate::repositories::{ClipRepo, GeneratedVideoRepo};
use crate::DbPool;

/// Map a sqlx error onto the core persistence error.
fn persistence(err: sqlx::Error) -> CoreError {
    CoreError::Persistence(err.to_string())
}

// ---------------------------------------------------------------------------
// Clip catalog
// ---------------------------------------------------------------------------

/// [`ClipCatalog`] over the `video_clips` table.
#[derive(Debug, Clone)]
pub struct PgClipCatalog {
    pool: DbPool,
}

impl PgClipCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClipCatalog for PgClipCatalog {
    async fn find_candidates(
        &self,
        filter: &ClipFilter,
        limit: usize,
    ) -> Result<Vec<Clip>, CoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = ClipRepo::find_candidates(
            &self.pool,
            &filter.location,
            filter.time_of_day.name(),
            filter.season.name(),
            limit,
        )
        .await
        .map_err(persistence)?;

        rows.into_iter().map(Clip::try_from).collect()
    }

    async fn parameters(&self) -> Result<CatalogParameters, CoreError> {
        let locations = ClipRepo::distinct_locations(&self.pool)
            .await
            .map_err(persistence)?;
        let times = ClipRepo::distinct_times_of_day(&self.pool)
            .await
            .map_err(persistence)?;
        let seasons = ClipRepo::distinct_seasons(&self.pool)
            .await
            .map_err(persistence)?;

        Ok(CatalogParameters {
            locations,
            times,
            seasons,
        })
    }
}

// ---------------------------------------------------------------------------
// Job store
// ---------------------------------------------------------------------------

/// [`JobStore`] over the `generated_videos` table.
#[derive(Debug, Clone)]
pub struct PgJobStore {
    pool: DbPool,
}

impl PgJobStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn create(
        &self,
        user_parameters: serde_json::Value,
        plan: &[SequencePlanEntry],
    ) -> Result<GenerationJob, CoreError> {
        let clip_sequence = serde_json::to_value(plan)
            .map_err(|e| CoreError::Internal(format!("Failed to encode plan: {e}")))?;

        let row = GeneratedVideoRepo::create(&self.pool, &user_parameters, &clip_sequence)
            .await
            .map_err(persistence)?;

        GenerationJob::try_from(row)
    }

    async fn get(&self, id: DbId) -> Result<GenerationJob, CoreError> {
        let row = GeneratedVideoRepo::find_by_id(&self.pool, id)
            .await
            .map_err(persistence)?
            .ok_or(CoreError::NotFound {
                entity: "GenerationJob",
                id,
            })?;

        GenerationJob::try_from(row)
    }

    async fn update(&self, id: DbId, outcome: JobOutcome) -> Result<(), CoreError> {
        let applied = match &outcome {
            JobOutcome::Completed { output_filename } => {
                GeneratedVideoRepo::complete(&self.pool, id, output_filename).await
            }
            JobOutcome::Failed => GeneratedVideoRepo::fail(&self.pool, id).await,
        }
        .map_err(persistence)?;

        if applied {
            return Ok(());
        }

        // Nothing updated: either the job is missing or already terminal.
        let current = self.get(id).await?;
        current.status.validate_transition(outcome.status())?;

        Err(CoreError::Internal(format!(
            "Generation job {id} was not updated although it is {}",
            current.status
        )))
    }

    async fn ping(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool).await.map_err(persistence)
    }
}
