use std::net::SocketAddr;
use std::sync::Arc;

use reelgen_core::memory::{InMemoryClipCatalog, InMemoryJobStore};
use reelgen_core::render::Renderer;
use reelgen_core::store::{ClipCatalog, JobStore};
use reelgen_worker::render::{FfmpegRenderer, RendererKind, SimulatedRenderer};
use reelgen_worker::{JobProcessor, ProcessorConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reelgen_api::config::{ServerConfig, StoreBackend};
use reelgen_api::router::build_app_router;
use reelgen_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "reelgen_api=debug,reelgen_worker=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        backend = ?config.store_backend,
        renderer = ?config.renderer,
        "Loaded server configuration",
    );

    // --- Storage ---
    let (clips, jobs) = build_stores(&config).await;

    // --- Job processor ---
    let renderer: Arc<dyn Renderer> = match config.renderer {
        RendererKind::Simulated => Arc::new(SimulatedRenderer::new(config.render_delay())),
        RendererKind::Ffmpeg => Arc::new(FfmpegRenderer::new(config.storage_path.clone())),
    };
    let processor = JobProcessor::new(
        Arc::clone(&jobs),
        renderer,
        ProcessorConfig {
            storage_root: config.storage_path.clone(),
            cleanup_delay: config.cleanup_delay(),
        },
    );
    tracing::info!(
        renderer = processor.renderer_name(),
        storage = %config.storage_path.display(),
        "Job processor ready",
    );

    // --- App state ---
    let state = AppState {
        clips,
        jobs,
        processor: processor.clone(),
        config: Arc::new(config.clone()),
    };
    let app = build_app_router(state);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!(
        in_flight = processor.in_flight(),
        "Server stopped accepting connections, draining jobs"
    );
    if processor.shutdown(config.shutdown_timeout()).await {
        tracing::info!("Job processor drained");
    } else {
        tracing::warn!(
            in_flight = processor.in_flight(),
            "Shutdown timeout elapsed with jobs still running"
        );
    }

    tracing::info!("Graceful shutdown complete");
}

/// Connect the configured clip catalog and job store.
///
/// Panics on connection or migration failure so a misconfigured deployment
/// never starts serving.
async fn build_stores(config: &ServerConfig) -> (Arc<dyn ClipCatalog>, Arc<dyn JobStore>) {
    match config.store_backend {
        StoreBackend::Postgres => {
            let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

            let pool = reelgen_db::create_pool(&database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            reelgen_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            reelgen_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            let clips: Arc<dyn ClipCatalog> =
                Arc::new(reelgen_db::PgClipCatalog::new(pool.clone()));
            let jobs: Arc<dyn JobStore> = Arc::new(reelgen_db::PgJobStore::new(pool));
            (clips, jobs)
        }
        StoreBackend::Memory => {
            let catalog = match &config.clip_catalog_path {
                Some(path) => InMemoryClipCatalog::load(path)
                    .await
                    .unwrap_or_else(|e| panic!("Failed to load clip catalog: {e}")),
                None => {
                    tracing::warn!("CLIP_CATALOG_PATH not set, starting with an empty catalog");
                    InMemoryClipCatalog::default()
                }
            };
            tracing::info!(clips = catalog.len(), "In-memory stores ready");
            let clips: Arc<dyn ClipCatalog> = Arc::new(catalog);
            let jobs: Arc<dyn JobStore> = Arc::new(InMemoryJobStore::new());
            (clips, jobs)
        }
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
