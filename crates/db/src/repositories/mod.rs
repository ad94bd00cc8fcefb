//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod clip_repo;
pub mod generated_video_repo;

pub use clip_repo::ClipRepo;
pub use generated_video_repo::GeneratedVideoRepo;
