//! Row models and DTOs.
//!
//! Each submodule contains a `FromRow` struct matching the table row, an
//! insert DTO where rows are created through this crate, and the conversion
//! into the `reelgen_core` domain type.

pub mod clip;
pub mod generated_video;
