use std::sync::Arc;

use reelgen_core::store::{ClipCatalog, JobStore};
use reelgen_worker::JobProcessor;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; every field is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Clip catalog (PostgreSQL or in-memory).
    pub clips: Arc<dyn ClipCatalog>,
    /// Job records; the source of truth for job status.
    pub jobs: Arc<dyn JobStore>,
    /// Background processor for submitted jobs.
    pub processor: JobProcessor,
    pub config: Arc<ServerConfig>,
}
