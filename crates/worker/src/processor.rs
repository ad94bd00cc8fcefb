//! Fire-and-forget job processor.
//!
//! `start` spawns one task per job and returns immediately. The task owns
//! the job until it records a terminal status; errors never leave the task
//! and are visible to clients only through the job store.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reelgen_core::job::{output_file_name, output_reference, GenerationStatus, JobOutcome};
use reelgen_core::planner::SequencePlanEntry;
use reelgen_core::render::{RenderError, RenderJob, Renderer};
use reelgen_core::store::JobStore;
use reelgen_core::types::DbId;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::workspace::{output_dir, WorkArea};

/// Default delay before a job's work area is removed.
pub const DEFAULT_CLEANUP_DELAY: Duration = Duration::from_secs(300);

/// Error raised while producing a job's output.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("failed to prepare work area: {0}")]
    Workspace(#[from] std::io::Error),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Processor settings.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Root holding `temp_{id}` work areas and the `generated/` output dir.
    pub storage_root: PathBuf,
    /// How long a finished job's work area is kept.
    pub cleanup_delay: Duration,
}

impl ProcessorConfig {
    pub fn new(storage_root: impl Into<PathBuf>) -> Self {
        Self {
            storage_root: storage_root.into(),
            cleanup_delay: DEFAULT_CLEANUP_DELAY,
        }
    }
}

/// Runs generation jobs in the background.
///
/// Cheaply cloneable; every clone shares the same task tracker.
#[derive(Clone)]
pub struct JobProcessor {
    store: Arc<dyn JobStore>,
    renderer: Arc<dyn Renderer>,
    config: Arc<ProcessorConfig>,
    tracker: TaskTracker,
    shutdown: CancellationToken,
}

impl JobProcessor {
    pub fn new(
        store: Arc<dyn JobStore>,
        renderer: Arc<dyn Renderer>,
        config: ProcessorConfig,
    ) -> Self {
        Self {
            store,
            renderer,
            config: Arc::new(config),
            tracker: TaskTracker::new(),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn renderer_name(&self) -> &'static str {
        self.renderer.name()
    }

    /// Number of job and cleanup tasks still running.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Spawn processing for a freshly created job and return immediately.
    ///
    /// The handle is only useful to tests; callers normally drop it.
    pub fn start(&self, job_id: DbId, plan: Vec<SequencePlanEntry>) -> JoinHandle<GenerationStatus> {
        let this = self.clone();
        self.tracker.spawn(async move { this.run(job_id, &plan).await })
    }

    /// Process one job to a terminal status.
    ///
    /// Returns the status that was recorded (or attempted, if the store
    /// update itself failed).
    pub async fn run(&self, job_id: DbId, plan: &[SequencePlanEntry]) -> GenerationStatus {
        let work_area = WorkArea::for_job(&self.config.storage_root, job_id);
        tracing::info!(
            job_id,
            segments = plan.len(),
            renderer = self.renderer.name(),
            "Video processing started",
        );

        // Rendering runs on its own task so a panic surfaces as a JoinError
        // here instead of unwinding past the status update and cleanup.
        let produced = {
            let this = self.clone();
            let plan = plan.to_vec();
            let area = work_area.clone();
            tokio::spawn(async move { this.produce(job_id, &plan, &area).await }).await
        };

        let outcome = match produced {
            Ok(Ok(output_filename)) => {
                tracing::info!(job_id, output = %output_filename, "Video processing completed");
                JobOutcome::Completed { output_filename }
            }
            Ok(Err(e)) => {
                tracing::error!(job_id, error = %e, "Video processing failed");
                JobOutcome::Failed
            }
            Err(e) => {
                tracing::error!(job_id, error = %e, "Video processing task aborted");
                JobOutcome::Failed
            }
        };

        let status = outcome.status();
        if let Err(e) = self.store.update(job_id, outcome).await {
            tracing::error!(job_id, %status, error = %e, "Failed to record job outcome");
        }

        self.schedule_cleanup(work_area);
        status
    }

    /// Prepare directories, render, and return the public output reference.
    async fn produce(
        &self,
        job_id: DbId,
        plan: &[SequencePlanEntry],
        work_area: &WorkArea,
    ) -> Result<String, ProcessError> {
        work_area.prepare().await?;
        let out_dir = output_dir(&self.config.storage_root);
        tokio::fs::create_dir_all(&out_dir).await?;

        let file_name = output_file_name(job_id, chrono::Utc::now());
        let output_path = out_dir.join(&file_name);

        self.renderer
            .render(RenderJob {
                job_id,
                plan,
                work_dir: work_area.path(),
                output_path: &output_path,
            })
            .await?;

        Ok(output_reference(&file_name))
    }

    fn schedule_cleanup(&self, work_area: WorkArea) {
        let delay = self.config.cleanup_delay;
        let cancel = self.shutdown.clone();
        self.tracker
            .spawn(async move { work_area.remove_after(delay, cancel).await });
    }

    /// Stop tracking new work and wait for in-flight jobs and cleanups.
    ///
    /// Pending cleanup delays are cut short so work areas are removed before
    /// the process exits. Returns `false` if `timeout` elapsed first.
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        self.tracker.close();
        self.shutdown.cancel();
        tokio::time::timeout(timeout, self.tracker.wait())
            .await
            .is_ok()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
