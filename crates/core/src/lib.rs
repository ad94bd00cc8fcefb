//! Domain core for clip-sequence video generation.
//!
//! Holds the clip and job models, the sequence planner, the job status
//! state machine, and the storage / rendering seams the other crates
//! implement. Nothing in here touches the network or the database.

pub mod clip;
pub mod error;
pub mod job;
pub mod memory;
pub mod planner;
pub mod render;
pub mod store;
pub mod types;
