//! In-memory implementations of [`ClipCatalog`] and [`JobStore`].
//!
//! Used by tests across the workspace and by the API's `memory` store
//! backend for running without PostgreSQL.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use rand::seq::SliceRandom;
use tokio::sync::RwLock;

use crate::clip::{CatalogParameters, Clip, ClipFilter};
use crate::error::CoreError;
use crate::job::{GenerationJob, GenerationStatus, JobOutcome};
use crate::planner::SequencePlanEntry;
use crate::store::{ClipCatalog, JobStore};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Clip catalog
// ---------------------------------------------------------------------------

/// Fixed clip list held in memory.
#[derive(Debug, Default)]
pub struct InMemoryClipCatalog {
    clips: Vec<Clip>,
}

impl InMemoryClipCatalog {
    pub fn new(clips: Vec<Clip>) -> Self {
        Self { clips }
    }

    /// Load a JSON array of clips from `path`.
    pub async fn load(path: &Path) -> Result<Self, CoreError> {
        let raw = tokio::fs::read(path).await.map_err(|e| {
            CoreError::Internal(format!("Failed to read clip catalog {}: {e}", path.display()))
        })?;
        let clips: Vec<Clip> = serde_json::from_slice(&raw).map_err(|e| {
            CoreError::Validation(format!("Invalid clip catalog {}: {e}", path.display()))
        })?;
        Ok(Self::new(clips))
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

#[async_trait]
impl ClipCatalog for InMemoryClipCatalog {
    async fn find_candidates(
        &self,
        filter: &ClipFilter,
        limit: usize,
    ) -> Result<Vec<Clip>, CoreError> {
        let mut matching: Vec<Clip> = self
            .clips
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        matching.shuffle(&mut rand::rng());
        matching.truncate(limit);
        Ok(matching)
    }

    async fn parameters(&self) -> Result<CatalogParameters, CoreError> {
        let mut locations = BTreeSet::new();
        let mut times = BTreeSet::new();
        let mut seasons = BTreeSet::new();
        for clip in &self.clips {
            locations.insert(clip.location.clone());
            times.insert(clip.time_of_day.name().to_string());
            seasons.insert(clip.season.name().to_string());
        }
        Ok(CatalogParameters {
            locations: locations.into_iter().collect(),
            times: times.into_iter().collect(),
            seasons: seasons.into_iter().collect(),
        })
    }
}

// ---------------------------------------------------------------------------
// Job store
// ---------------------------------------------------------------------------

/// Job table behind a lock. Ids are assigned sequentially from 1.
#[derive(Debug)]
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<DbId, GenerationJob>>,
    next_id: AtomicI64,
}

impl Default for InMemoryJobStore {
    fn default() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored jobs.
    pub async fn count(&self) -> usize {
        self.jobs.read().await.len()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn create(
        &self,
        user_parameters: serde_json::Value,
        plan: &[SequencePlanEntry],
    ) -> Result<GenerationJob, CoreError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let job = GenerationJob {
            id,
            user_parameters,
            clip_sequence: plan.to_vec(),
            output_filename: None,
            status: GenerationStatus::Processing,
            created_at: chrono::Utc::now(),
            completed_at: None,
        };
        self.jobs.write().await.insert(id, job.clone());
        Ok(job)
    }

    async fn get(&self, id: DbId) -> Result<GenerationJob, CoreError> {
        self.jobs
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(CoreError::NotFound {
                entity: "GenerationJob",
                id,
            })
    }

    async fn update(&self, id: DbId, outcome: JobOutcome) -> Result<(), CoreError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&id).ok_or(CoreError::NotFound {
            entity: "GenerationJob",
            id,
        })?;

        let next = outcome.status();
        job.status.validate_transition(next)?;

        job.status = next;
        job.output_filename = outcome.output_filename().map(str::to_string);
        job.completed_at = Some(chrono::Utc::now());
        Ok(())
    }

    async fn ping(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::clip::{Season, TimeOfDay};
    use crate::planner::Transition;

    fn clip(id: DbId, location: &str, time_of_day: TimeOfDay, season: Season) -> Clip {
        Clip {
            id,
            filename: format!("{id}.mp4"),
            location: location.into(),
            time_of_day,
            season,
            duration_secs: 4.0,
            tags: vec!["skyline".into()],
            storage_path: format!("clips/{id}.mp4"),
            created_at: chrono::Utc::now(),
        }
    }

    fn paris_day_summer() -> ClipFilter {
        ClipFilter {
            location: "Paris".into(),
            time_of_day: TimeOfDay::Day,
            season: Season::Summer,
        }
    }

    fn catalog() -> InMemoryClipCatalog {
        let mut clips: Vec<Clip> = (1..=10)
            .map(|id| clip(id, "Paris", TimeOfDay::Day, Season::Summer))
            .collect();
        clips.push(clip(11, "Paris", TimeOfDay::Night, Season::Summer));
        clips.push(clip(12, "Tokyo", TimeOfDay::Day, Season::Winter));
        InMemoryClipCatalog::new(clips)
    }

    fn plan() -> Vec<SequencePlanEntry> {
        vec![SequencePlanEntry {
            clip_id: 1,
            filename: "1.mp4".into(),
            duration: 2.0,
            transition: Transition::Fade,
            storage_path: "clips/1.mp4".into(),
        }]
    }

    // -- Catalog --

    #[tokio::test]
    async fn candidates_are_filtered_and_bounded() {
        let catalog = catalog();
        let found = catalog.find_candidates(&paris_day_summer(), 8).await.unwrap();
        assert_eq!(found.len(), 8);
        assert!(found.iter().all(|c| paris_day_summer().matches(c)));
    }

    #[tokio::test]
    async fn repeated_queries_return_the_same_membership() {
        let catalog = catalog();
        let filter = paris_day_summer();
        let mut first: Vec<_> = catalog
            .find_candidates(&filter, 100)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        let mut second: Vec<_> = catalog
            .find_candidates(&filter, 100)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        first.sort_unstable();
        second.sort_unstable();
        assert_eq!(first, second);
        assert_eq!(first, (1..=10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn no_match_is_empty_not_error() {
        let catalog = catalog();
        let filter = ClipFilter {
            location: "Atlantis".into(),
            ..paris_day_summer()
        };
        assert!(catalog.find_candidates(&filter, 8).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn parameters_are_distinct_and_sorted() {
        let params = catalog().parameters().await.unwrap();
        assert_eq!(params.locations, vec!["Paris", "Tokyo"]);
        assert_eq!(params.times, vec!["day", "night"]);
        assert_eq!(params.seasons, vec!["summer", "winter"]);
    }

    #[tokio::test]
    async fn load_reads_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clips.json");
        let clips = vec![clip(1, "Oslo", TimeOfDay::Sunrise, Season::Spring)];
        tokio::fs::write(&path, serde_json::to_vec(&clips).unwrap())
            .await
            .unwrap();

        let catalog = InMemoryClipCatalog::load(&path).await.unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[tokio::test]
    async fn load_rejects_malformed_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clips.json");
        tokio::fs::write(&path, b"{\"not\": \"an array\"}").await.unwrap();

        assert_matches!(
            InMemoryClipCatalog::load(&path).await,
            Err(CoreError::Validation(_))
        );
    }

    // -- Job store --

    #[tokio::test]
    async fn created_job_starts_processing_without_output() {
        let store = InMemoryJobStore::new();
        let params = serde_json::json!({"location": "Paris"});
        let job = store.create(params.clone(), &plan()).await.unwrap();

        assert_eq!(job.status, GenerationStatus::Processing);
        assert!(job.output_filename.is_none());
        assert_eq!(job.user_parameters, params);
        assert_eq!(store.get(job.id).await.unwrap(), job);
    }

    #[tokio::test]
    async fn ids_are_unique() {
        let store = InMemoryJobStore::new();
        let a = store.create(serde_json::json!({}), &plan()).await.unwrap();
        let b = store.create(serde_json::json!({}), &plan()).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.count().await, 2);
    }

    #[tokio::test]
    async fn completion_sets_output_reference() {
        let store = InMemoryJobStore::new();
        let job = store.create(serde_json::json!({}), &plan()).await.unwrap();
        store
            .update(
                job.id,
                JobOutcome::Completed {
                    output_filename: "/api/v1/videos/generated/v.mp4".into(),
                },
            )
            .await
            .unwrap();

        let job = store.get(job.id).await.unwrap();
        assert_eq!(job.status, GenerationStatus::Completed);
        assert_eq!(
            job.output_filename.as_deref(),
            Some("/api/v1/videos/generated/v.mp4")
        );
        assert!(job.completed_at.is_some());
    }

    #[tokio::test]
    async fn terminal_jobs_reject_further_updates() {
        let store = InMemoryJobStore::new();
        let job = store.create(serde_json::json!({}), &plan()).await.unwrap();
        store.update(job.id, JobOutcome::Failed).await.unwrap();

        let second = store
            .update(
                job.id,
                JobOutcome::Completed {
                    output_filename: "late.mp4".into(),
                },
            )
            .await;
        assert_matches!(second, Err(CoreError::InvalidTransition { .. }));

        let job = store.get(job.id).await.unwrap();
        assert_eq!(job.status, GenerationStatus::Failed);
        assert!(job.output_filename.is_none());
    }

    #[tokio::test]
    async fn unknown_job_is_not_found() {
        let store = InMemoryJobStore::new();
        assert_matches!(store.get(99).await, Err(CoreError::NotFound { id: 99, .. }));
        assert_matches!(
            store.update(99, JobOutcome::Failed).await,
            Err(CoreError::NotFound { .. })
        );
    }
}
