#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use reelgen_core::clip::{Clip, Season, TimeOfDay};
use reelgen_core::memory::{InMemoryClipCatalog, InMemoryJobStore};
use reelgen_core::render::Renderer;
use reelgen_core::types::DbId;
use reelgen_worker::render::SimulatedRenderer;
use reelgen_worker::{JobProcessor, ProcessorConfig};
use tempfile::TempDir;
use tower::ServiceExt;

use reelgen_api::config::{ServerConfig, StoreBackend};
use reelgen_api::router::build_app_router;
use reelgen_api::state::AppState;

/// Router plus handles on the in-memory stores behind it.
pub struct TestApp {
    pub router: Router,
    pub jobs: Arc<InMemoryJobStore>,
    pub processor: JobProcessor,
    pub storage: TempDir,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    pub fn storage_root(&self) -> PathBuf {
        self.storage.path().to_path_buf()
    }
}

/// Build a test `ServerConfig` rooted at `storage`.
pub fn test_config(storage: &std::path::Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        storage_path: storage.to_path_buf(),
        candidate_limit: 8,
        cleanup_delay_secs: 0,
        render_delay_secs: 0,
        renderer: Default::default(),
        store_backend: StoreBackend::Memory,
        clip_catalog_path: None,
    }
}

pub fn clip(id: DbId, location: &str, duration_secs: f64) -> Clip {
    Clip {
        id,
        filename: format!("clip_{id}.mp4"),
        location: location.to_string(),
        time_of_day: TimeOfDay::Day,
        season: Season::Summer,
        duration_secs,
        tags: vec![],
        storage_path: format!("clips/clip_{id}.mp4"),
        created_at: chrono::Utc::now(),
    }
}

/// Paris / day / summer clips of 4 s each.
pub fn paris_clips(count: i64) -> Vec<Clip> {
    (1..=count).map(|id| clip(id, "Paris", 4.0)).collect()
}

/// Build the full application router over in-memory stores and `renderer`.
pub fn build_test_app_with(clips: Vec<Clip>, renderer: Arc<dyn Renderer>) -> TestApp {
    let storage = tempfile::tempdir().unwrap();
    let config = test_config(storage.path());
    let jobs = Arc::new(InMemoryJobStore::new());

    let processor = JobProcessor::new(
        jobs.clone(),
        renderer,
        ProcessorConfig {
            storage_root: config.storage_path.clone(),
            cleanup_delay: config.cleanup_delay(),
        },
    );

    let state = AppState {
        clips: Arc::new(InMemoryClipCatalog::new(clips)),
        jobs: jobs.clone(),
        processor: processor.clone(),
        config: Arc::new(config),
    };

    TestApp {
        router: build_app_router(state),
        jobs,
        processor,
        storage,
    }
}

/// Test app with a short simulated render.
pub fn build_test_app(clips: Vec<Clip>) -> TestApp {
    build_test_app_with(
        clips,
        Arc::new(SimulatedRenderer::new(Duration::from_millis(50))),
    )
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Poll `/job-status/{id}` until the job leaves `processing`.
pub async fn wait_for_terminal(app: &Router, job_id: i64) -> serde_json::Value {
    for _ in 0..200 {
        let response = get(app.clone(), &format!("/api/v1/job-status/{job_id}")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        if json["data"]["status"] != "processing" {
            return json["data"].clone();
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("job {job_id} did not finish");
}
