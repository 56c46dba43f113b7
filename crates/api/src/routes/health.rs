use axum::extract::State;
use axum::{routing::get, Json, Router};
use phm_core::types::Timestamp;
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `ok` once a tick has succeeded, `starting` before that.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Machines in the current snapshot.
    pub machines: usize,
    pub last_updated: Option<Timestamp>,
}

/// GET /health -- returns service status and snapshot freshness.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let controller = state.controller.lock().await;
    let fleet = controller.state();

    let status = if fleet.last_updated.is_some() {
        "ok"
    } else {
        "starting"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        machines: fleet.machines.len(),
        last_updated: fleet.last_updated,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
