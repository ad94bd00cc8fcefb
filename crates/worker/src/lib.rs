//! Asynchronous job processing for generated videos.
//!
//! [`processor::JobProcessor`] runs each job as its own tokio task: it
//! prepares a scratch [`workspace::WorkArea`], hands the plan to a
//! [`reelgen_core::render::Renderer`], records the outcome in the job store,
//! and schedules removal of the scratch area.

pub mod processor;
pub mod render;
pub mod workspace;

pub use processor::{JobProcessor, ProcessorConfig};
