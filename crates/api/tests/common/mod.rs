#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use phm_api::config::{MonitorConfig, TickMode};
use phm_api::controller::{FleetController, SharedController};
use phm_api::router::build_app_router;
use phm_api::source::FileSource;
use phm_api::state::AppState;
use phm_core::alert::AlertThresholds;
use phm_core::status::StatusThresholds;
use phm_core::types::Timestamp;
use phm_events::EventBus;
use tempfile::NamedTempFile;
use tower::ServiceExt;

/// Four machines: two normal, one warning with a medium lifespan alert,
/// one danger with a high lifespan alert.
pub const SAMPLE_FLEET: &str = r#"{
    "machines": [
        {
            "id": "M001", "name": "CNC-A1", "model": "DMU 65", "location": "Hall A",
            "healthIndex": 0.92,
            "rul": { "value": 850, "unit": "小時" },
            "parameters": { "temperature": 42.5, "vibration": 0.12, "pressure": 215.0 },
            "history": { "timestamps": ["2024-04-29"], "healthIndex": [0.92], "rul": [850] }
        },
        {
            "id": "M002", "name": "Press-B2", "model": "HFE 100", "location": "Hall B",
            "healthIndex": 0.72,
            "rul": { "value": 180, "unit": "小時" },
            "parameters": { "temperature": 63.8, "vibration": 0.27, "pressure": 196.0 }
        },
        {
            "id": "M003", "name": "Compressor-C1", "model": "GA 37", "location": "Plant 2",
            "healthIndex": 0.45,
            "rul": { "value": 60, "unit": "小時" },
            "parameters": { "temperature": 81.2, "vibration": 0.41, "pressure": 176.5 }
        },
        {
            "id": "M004", "name": "Molder-D3", "model": "victory 200", "location": "Hall D",
            "healthIndex": 0.85,
            "rul": { "value": 320, "unit": "小時" },
            "parameters": { "temperature": 55.1, "vibration": 0.18, "pressure": 204.0 }
        }
    ]
}"#;

/// A fixed tick time so alert timestamps are predictable.
pub fn fixed_now() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 4, 29, 8, 0, 0).unwrap()
}

/// Build a test `MonitorConfig` pointing at `snapshot_path`.
pub fn test_config(snapshot_path: PathBuf) -> MonitorConfig {
    MonitorConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        snapshot_path,
        tick_interval_secs: 30,
        tick_mode: TickMode::Simulate,
        sim_seed: Some(7),
        status_thresholds: StatusThresholds::default(),
        alert_thresholds: AlertThresholds::default(),
    }
}

/// Write `contents` to a fresh temp file.
pub fn snapshot_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Replace the contents of an existing snapshot file.
pub fn rewrite(file: &NamedTempFile, contents: &str) {
    std::fs::write(file.path(), contents).unwrap();
}

pub struct TestApp {
    pub router: Router,
    pub controller: SharedController,
    pub event_bus: Arc<EventBus>,
    /// Kept alive for the lifetime of the test.
    pub snapshot: NamedTempFile,
}

/// Build the full application router over `document`, without loading it.
pub fn build_test_app(document: &str) -> TestApp {
    let snapshot = snapshot_file(document);
    let config = test_config(snapshot.path().to_path_buf());
    let event_bus = Arc::new(EventBus::default());
    let controller = FleetController::new(
        config.status_thresholds,
        config.alert_thresholds,
        Arc::clone(&event_bus),
    )
    .into_shared();

    let state = AppState {
        controller: Arc::clone(&controller),
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
    };

    TestApp {
        router: build_app_router(state, &config),
        controller,
        event_bus,
        snapshot,
    }
}

/// Build the app and load `document` once, as startup does.
pub async fn build_loaded_app(document: &str) -> TestApp {
    let app = build_test_app(document);
    let mut source = FileSource::new(app.snapshot.path(), StatusThresholds::default());
    app.controller
        .lock()
        .await
        .load(&mut source, fixed_now())
        .await
        .unwrap();
    app
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri).await
}

pub async fn post(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri).await
}

async fn send(app: Router, method: Method, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
