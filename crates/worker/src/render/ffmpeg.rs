//! Renderer backed by the `ffmpeg` CLI.
//!
//! Each plan segment is cut from the start of its source clip into the work
//! area, then the pieces are joined with the concat demuxer. Segments are
//! hard-cut; the planned transition is recorded in the job but not
//! composited.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reelgen_core::planner::SequencePlanEntry;
use reelgen_core::render::{RenderError, RenderJob, Renderer};

/// Name of the concat list written into the work area.
const CONCAT_LIST_NAME: &str = "segments.txt";

#[derive(Debug, Clone)]
pub struct FfmpegRenderer {
    /// Binary to invoke (default: `ffmpeg` from `PATH`).
    program: PathBuf,
    /// Base directory for relative clip `storage_path`s.
    clip_root: PathBuf,
}

impl FfmpegRenderer {
    pub fn new(clip_root: impl Into<PathBuf>) -> Self {
        Self {
            program: PathBuf::from("ffmpeg"),
            clip_root: clip_root.into(),
        }
    }

    /// Use a specific ffmpeg binary.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    fn source_path(&self, entry: &SequencePlanEntry) -> PathBuf {
        let path = Path::new(&entry.storage_path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.clip_root.join(path)
        }
    }

    async fn run(&self, args: Vec<String>) -> Result<(), RenderError> {
        let output = tokio::process::Command::new(&self.program)
            .args(&args)
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    RenderError::ToolNotFound(self.program.display().to_string())
                }
                _ => RenderError::Io(e),
            })?;

        if !output.status.success() {
            return Err(RenderError::ExecutionFailed {
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }
        Ok(())
    }
}

/// File name of the `index`-th trimmed segment.
pub fn segment_file_name(index: usize) -> String {
    format!("segment_{index:03}.mp4")
}

/// Arguments trimming `duration` seconds from the start of `source`.
///
/// Re-encodes to H.264 so the concat step can stream-copy.
pub fn trim_args(source: &Path, duration: f64, dest: &Path) -> Vec<String> {
    vec![
        "-y".into(),
        "-v".into(),
        "error".into(),
        "-i".into(),
        source.display().to_string(),
        "-t".into(),
        format!("{duration:.3}"),
        "-an".into(),
        "-c:v".into(),
        "libx264".into(),
        "-pix_fmt".into(),
        "yuv420p".into(),
        dest.display().to_string(),
    ]
}

/// Arguments joining the segments listed in `list` into `dest`.
pub fn concat_args(list: &Path, dest: &Path) -> Vec<String> {
    vec![
        "-y".into(),
        "-v".into(),
        "error".into(),
        "-f".into(),
        "concat".into(),
        "-safe".into(),
        "0".into(),
        "-i".into(),
        list.display().to_string(),
        "-c".into(),
        "copy".into(),
        dest.display().to_string(),
    ]
}

/// Concat demuxer list for `count` segments in `work_dir`.
pub fn concat_list(work_dir: &Path, count: usize) -> String {
    (0..count)
        .map(|i| {
            let path = work_dir.join(segment_file_name(i));
            format!("file '{}'\n", quote_concat_path(&path.display().to_string()))
        })
        .collect()
}

/// Escape a path for a single-quoted concat directive: `'` becomes `'\''`.
fn quote_concat_path(path: &str) -> String {
    path.replace('\'', r"'\''")
}

#[async_trait]
impl Renderer for FfmpegRenderer {
    fn name(&self) -> &'static str {
        "ffmpeg"
    }

    async fn render(&self, job: RenderJob<'_>) -> Result<PathBuf, RenderError> {
        if job.plan.is_empty() {
            return Err(RenderError::EmptyPlan);
        }

        for (index, entry) in job.plan.iter().enumerate() {
            let dest = job.work_dir.join(segment_file_name(index));
            tracing::debug!(
                job_id = job.job_id,
                index,
                clip_id = entry.clip_id,
                duration = entry.duration,
                "Trimming segment",
            );
            self.run(trim_args(&self.source_path(entry), entry.duration, &dest))
                .await?;
        }

        let list = job.work_dir.join(CONCAT_LIST_NAME);
        tokio::fs::write(&list, concat_list(job.work_dir, job.plan.len())).await?;
        self.run(concat_args(&list, job.output_path)).await?;

        Ok(job.output_path.to_path_buf())
    }
}
