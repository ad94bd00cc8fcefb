//! Renderer seam: materializes a plan into a media file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::planner::SequencePlanEntry;
use crate::types::DbId;

/// Error type for rendering a plan.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("render tool not found: {0}")]
    ToolNotFound(String),

    #[error("render tool failed (exit code {exit_code:?}): {stderr}")]
    ExecutionFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("plan has no segments to render")]
    EmptyPlan,

    #[error("simulated render failure: {0}")]
    Simulated(String),

    #[error("failed to encode render manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything a renderer needs for one job.
#[derive(Debug, Clone, Copy)]
pub struct RenderJob<'a> {
    pub job_id: DbId,
    pub plan: &'a [SequencePlanEntry],
    /// Scratch directory owned by this job; removed after the job ends.
    pub work_dir: &'a Path,
    /// Where the finished file must be written.
    pub output_path: &'a Path,
}

#[async_trait]
pub trait Renderer: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Render `job` and return the path of the produced file.
    async fn render(&self, job: RenderJob<'_>) -> Result<PathBuf, RenderError>;
}
