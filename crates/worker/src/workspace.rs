//! Per-job scratch directories under the storage root.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reelgen_core::types::DbId;
use tokio_util::sync::CancellationToken;

/// Subdirectory of the storage root holding finished videos.
pub const GENERATED_DIR: &str = "generated";

/// Scratch directory owned by a single job: `<root>/temp_{job_id}`.
#[derive(Debug, Clone)]
pub struct WorkArea {
    job_id: DbId,
    path: PathBuf,
}

impl WorkArea {
    /// Path of the work area for `job_id`, without touching the filesystem.
    pub fn for_job(storage_root: &Path, job_id: DbId) -> Self {
        Self {
            job_id,
            path: storage_root.join(format!("temp_{job_id}")),
        }
    }

    /// Create the directory (and parents) if missing.
    pub async fn prepare(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.path).await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the directory tree. A missing directory counts as removed.
    pub async fn remove(&self) -> std::io::Result<()> {
        match tokio::fs::remove_dir_all(&self.path).await {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    /// Wait for `delay` (or until `cancel` fires) and then remove the
    /// directory. Failures are logged and otherwise ignored.
    pub async fn remove_after(self, delay: Duration, cancel: CancellationToken) {
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = cancel.cancelled() => {
                tracing::debug!(job_id = self.job_id, "Cleanup delay cut short by shutdown");
            }
        }

        match self.remove().await {
            Ok(()) => tracing::debug!(
                job_id = self.job_id,
                path = %self.path.display(),
                "Work area removed",
            ),
            Err(e) => tracing::error!(
                job_id = self.job_id,
                path = %self.path.display(),
                error = %e,
                "Work area cleanup failed",
            ),
        }
    }
}

/// Directory for finished videos: `<root>/generated`.
pub fn output_dir(storage_root: &Path) -> PathBuf {
    storage_root.join(GENERATED_DIR)
}
