use std::path::PathBuf;
use std::time::Duration;

use reelgen_core::clip::DEFAULT_CANDIDATE_LIMIT;
use reelgen_worker::render::{RendererKind, VALID_RENDERERS};

/// Where clips and jobs are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// PostgreSQL via `DATABASE_URL`.
    #[default]
    Postgres,
    /// Process-local maps; jobs are lost on restart.
    Memory,
}

impl StoreBackend {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "postgres" => Some(Self::Postgres),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3001`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for in-flight jobs (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Root for job work areas and generated videos (default: `./uploads`).
    pub storage_path: PathBuf,
    /// Maximum candidate clips per request (default: `8`).
    pub candidate_limit: usize,
    /// Delay before a job's work area is removed (default: `300`).
    pub cleanup_delay_secs: u64,
    /// Simulated render duration (default: `5`).
    pub render_delay_secs: u64,
    pub renderer: RendererKind,
    pub store_backend: StoreBackend,
    /// JSON clip list loaded in memory mode.
    pub clip_catalog_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `3001`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:3000` |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                    |
    /// | `STORAGE_PATH`          | `./uploads`             |
    /// | `CANDIDATE_LIMIT`       | `8`                     |
    /// | `CLEANUP_DELAY_SECS`    | `300`                   |
    /// | `RENDER_DELAY_SECS`     | `5`                     |
    /// | `RENDERER`              | `simulated`             |
    /// | `STORE_BACKEND`         | `postgres`              |
    /// | `CLIP_CATALOG_PATH`     | unset                   |
    ///
    /// Panics on malformed values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3001".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = env_u64("REQUEST_TIMEOUT_SECS", 30);
        let shutdown_timeout_secs = env_u64("SHUTDOWN_TIMEOUT_SECS", 30);
        let cleanup_delay_secs = env_u64("CLEANUP_DELAY_SECS", 300);
        let render_delay_secs = env_u64("RENDER_DELAY_SECS", 5);

        let storage_path = std::env::var("STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./uploads"));

        let candidate_limit: usize = std::env::var("CANDIDATE_LIMIT")
            .map(|v| v.parse().expect("CANDIDATE_LIMIT must be a valid usize"))
            .unwrap_or(DEFAULT_CANDIDATE_LIMIT);
        assert!(candidate_limit > 0, "CANDIDATE_LIMIT must be positive");

        let renderer = std::env::var("RENDERER")
            .map(|v| {
                RendererKind::from_name(&v).unwrap_or_else(|| {
                    panic!("RENDERER must be one of {VALID_RENDERERS:?}, got '{v}'")
                })
            })
            .unwrap_or_default();

        let store_backend = std::env::var("STORE_BACKEND")
            .map(|v| {
                StoreBackend::from_name(&v).unwrap_or_else(|| {
                    panic!("STORE_BACKEND must be 'postgres' or 'memory', got '{v}'")
                })
            })
            .unwrap_or_default();

        let clip_catalog_path = std::env::var("CLIP_CATALOG_PATH").ok().map(PathBuf::from);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            storage_path,
            candidate_limit,
            cleanup_delay_secs,
            render_delay_secs,
            renderer,
            store_backend,
            clip_catalog_path,
        }
    }

    pub fn cleanup_delay(&self) -> Duration {
        Duration::from_secs(self.cleanup_delay_secs)
    }

    pub fn render_delay(&self) -> Duration {
        Duration::from_secs(self.render_delay_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .map(|v| {
            v.parse()
                .unwrap_or_else(|_| panic!("{name} must be a valid u64"))
        })
        .unwrap_or(default)
}
