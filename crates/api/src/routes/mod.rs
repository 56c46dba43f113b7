pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /fleet                  current snapshot with summary (GET)
/// /fleet/summary          status counts and average health (GET)
/// /fleet/refresh          reload the snapshot resource now (POST)
/// /alerts                 alerts of the last tick (GET)
/// /rejected               entries skipped at the last ingest (GET)
/// /machines/{id}          machine detail (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/fleet", get(handlers::fleet::get_fleet))
        .route("/fleet/summary", get(handlers::fleet::get_summary))
        .route("/fleet/refresh", post(handlers::fleet::refresh_fleet))
        .route("/alerts", get(handlers::fleet::get_alerts))
        .route("/rejected", get(handlers::fleet::get_rejected))
        .route("/machines/{id}", get(handlers::fleet::get_machine))
}
