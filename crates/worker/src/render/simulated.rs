//! Placeholder renderer that stands in for real encoding.
//!
//! Waits for a configurable delay, then writes the plan as a JSON manifest
//! into the work area and at the output path.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reelgen_core::render::{RenderError, RenderJob, Renderer};

/// Default simulated processing time.
pub const DEFAULT_RENDER_DELAY: Duration = Duration::from_secs(5);

/// Manifest file written inside the work area.
const MANIFEST_NAME: &str = "plan.json";

#[derive(Debug, Clone)]
pub struct SimulatedRenderer {
    delay: Duration,
    failure: Option<String>,
}

impl Default for SimulatedRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_RENDER_DELAY)
    }
}

impl SimulatedRenderer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            failure: None,
        }
    }

    /// A renderer that always fails with `reason` after its delay.
    pub fn failing(delay: Duration, reason: impl Into<String>) -> Self {
        Self {
            delay,
            failure: Some(reason.into()),
        }
    }
}

#[async_trait]
impl Renderer for SimulatedRenderer {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn render(&self, job: RenderJob<'_>) -> Result<PathBuf, RenderError> {
        tokio::time::sleep(self.delay).await;

        if let Some(reason) = &self.failure {
            return Err(RenderError::Simulated(reason.clone()));
        }

        let manifest = serde_json::to_vec_pretty(&serde_json::json!({
            "jobId": job.job_id,
            "segments": job.plan,
        }))?;

        tokio::fs::write(job.work_dir.join(MANIFEST_NAME), &manifest).await?;
        tokio::fs::write(job.output_path, &manifest).await?;

        Ok(job.output_path.to_path_buf())
    }
}
