//! Handlers for the fleet monitoring endpoints.
//!
//! Everything except `refresh_fleet` is a read of the controller's last
//! successful tick.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{NaiveDate, Utc};
use phm_core::alert::Alert;
use phm_core::bands::{rul_band, Band, ParameterBands};
use phm_core::error::CoreError;
use phm_core::ingest::RejectedMachine;
use phm_core::machine::{FleetSnapshot, MachineSnapshot};
use phm_core::maintenance::next_maintenance_date;
use phm_core::summary::FleetSummary;
use phm_core::types::Timestamp;
use serde::Serialize;

use crate::controller::FleetState;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::source::FileSource;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetView {
    pub machines: FleetSnapshot,
    pub summary: FleetSummary,
    pub last_updated: Option<Timestamp>,
    pub tick_count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineBands {
    pub rul: Band,
    pub parameters: ParameterBands,
    /// Most severe of the three parameter bands.
    pub worst_parameter: Band,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineDetail {
    pub machine: MachineSnapshot,
    /// Display label of the status (正常 / 警告 / 危險).
    pub status_label: &'static str,
    pub bands: MachineBands,
    pub next_maintenance_date: Option<NaiveDate>,
}

impl MachineDetail {
    fn new(machine: MachineSnapshot, now: Timestamp) -> Self {
        let parameters = ParameterBands::of(&machine.parameters);
        Self {
            status_label: machine.status().label(),
            bands: MachineBands {
                rul: rul_band(machine.rul.value),
                worst_parameter: parameters.worst(),
                parameters,
            },
            next_maintenance_date: next_maintenance_date(machine.rul.value, now),
            machine,
        }
    }
}

fn fleet_view(state: &FleetState) -> FleetView {
    FleetView {
        machines: state.machines.clone(),
        summary: state.summary,
        last_updated: state.last_updated,
        tick_count: state.tick_count,
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /fleet
pub async fn get_fleet(State(state): State<AppState>) -> AppResult<Json<DataResponse<FleetView>>> {
    let controller = state.controller.lock().await;
    Ok(Json(DataResponse {
        data: fleet_view(controller.state()),
    }))
}

/// GET /fleet/summary
pub async fn get_summary(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<FleetSummary>>> {
    let controller = state.controller.lock().await;
    Ok(Json(DataResponse {
        data: controller.state().summary,
    }))
}

/// GET /alerts
pub async fn get_alerts(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Alert>>>> {
    let controller = state.controller.lock().await;
    Ok(Json(DataResponse {
        data: controller.state().alerts.clone(),
    }))
}

/// GET /rejected
pub async fn get_rejected(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<RejectedMachine>>>> {
    let controller = state.controller.lock().await;
    Ok(Json(DataResponse {
        data: controller.state().rejected.clone(),
    }))
}

/// GET /machines/{id}
pub async fn get_machine(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<MachineDetail>>> {
    let machine = {
        let controller = state.controller.lock().await;
        controller.machine(&id).cloned()
    }
    .ok_or(CoreError::NotFound {
        entity: "Machine",
        id,
    })?;

    Ok(Json(DataResponse {
        data: MachineDetail::new(machine, Utc::now()),
    }))
}

/// POST /fleet/refresh
///
/// Re-read the snapshot resource immediately. On failure the previous
/// state is kept and the error is returned as 502.
pub async fn refresh_fleet(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<FleetView>>> {
    let mut source = FileSource::new(&state.config.snapshot_path, state.config.status_thresholds);

    let mut controller = state.controller.lock().await;
    let fleet = controller.tick(&mut source, Utc::now()).await?;
    tracing::info!(tick = fleet.tick_count, "Manual refresh applied");

    Ok(Json(DataResponse {
        data: fleet_view(fleet),
    }))
}
