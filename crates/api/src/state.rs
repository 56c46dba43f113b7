use std::sync::Arc;

use phm_events::EventBus;

use crate::config::MonitorConfig;
use crate::controller::SharedController;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Owner of the current fleet snapshot, alerts, and summary.
    pub controller: SharedController,
    pub config: Arc<MonitorConfig>,
    /// Tick events are published here after every tick.
    pub event_bus: Arc<EventBus>,
}
