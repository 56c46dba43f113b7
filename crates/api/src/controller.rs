//! Fleet state container.
//!
//! [`FleetController`] exclusively owns the current snapshot, its alert
//! list, and the derived summary. A tick either replaces all of them at
//! once or, on failure, leaves every field as it was.

use std::sync::Arc;

use phm_core::alert::{generate_with, Alert, AlertThresholds};
use phm_core::ingest::{IngestReport, RejectedMachine};
use phm_core::machine::{refresh_fleet, FleetSnapshot, MachineSnapshot};
use phm_core::status::StatusThresholds;
use phm_core::summary::FleetSummary;
use phm_core::types::Timestamp;
use phm_events::{EventBus, FleetEvent, TickEvent};
use tokio::sync::Mutex;

use crate::source::{SnapshotSource, SourceError};

/// Controller shared between the ticker and HTTP handlers. The lock is held
/// for a whole tick, which serializes ticks.
pub type SharedController = Arc<Mutex<FleetController>>;

/// Everything the presentation layer reads after a tick.
#[derive(Debug, Clone, Default)]
pub struct FleetState {
    pub machines: FleetSnapshot,
    pub alerts: Vec<Alert>,
    pub summary: FleetSummary,
    /// Entries skipped at the last successful ingest.
    pub rejected: Vec<RejectedMachine>,
    /// `None` until the first successful tick.
    pub last_updated: Option<Timestamp>,
    pub tick_count: u64,
}

pub struct FleetController {
    state: FleetState,
    status_thresholds: StatusThresholds,
    alert_thresholds: AlertThresholds,
    event_bus: Arc<EventBus>,
}

impl FleetController {
    pub fn new(
        status_thresholds: StatusThresholds,
        alert_thresholds: AlertThresholds,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            state: FleetState::default(),
            status_thresholds,
            alert_thresholds,
            event_bus,
        }
    }

    pub fn into_shared(self) -> SharedController {
        Arc::new(Mutex::new(self))
    }

    pub fn state(&self) -> &FleetState {
        &self.state
    }

    pub fn machine(&self, id: &str) -> Option<&MachineSnapshot> {
        self.state.machines.iter().find(|m| m.id == id)
    }

    /// Initial load at startup. Same semantics as [`FleetController::tick`].
    pub async fn load<S>(&mut self, source: &mut S, now: Timestamp) -> Result<&FleetState, SourceError>
    where
        S: SnapshotSource + ?Sized,
    {
        tracing::info!(source = source.name(), "Loading initial fleet snapshot");
        self.tick(source, now).await
    }

    /// Run one tick against `source`.
    ///
    /// The rejected-entry report is only replaced by sources that ingest a
    /// document; simulated ticks carry the previous report forward.
    ///
    /// On error the previous snapshot, alerts, and summary stay untouched
    /// and a `TickFailed` event is published.
    pub async fn tick<S>(&mut self, source: &mut S, now: Timestamp) -> Result<&FleetState, SourceError>
    where
        S: SnapshotSource + ?Sized,
    {
        let candidate = source.next_snapshot(&self.state.machines).await;
        match candidate {
            Ok(mut report) => {
                if source.ingests() {
                    for skipped in &report.rejected {
                        tracing::warn!(
                            index = skipped.index,
                            machine_id = skipped.id.as_deref().unwrap_or("<unknown>"),
                            reason = %skipped.reason,
                            "Skipped machine violating the snapshot contract"
                        );
                    }
                } else {
                    report.rejected = self.state.rejected.clone();
                }
                self.apply(report, now);
                Ok(&self.state)
            }
            Err(e) => {
                tracing::error!(
                    source = source.name(),
                    error = %e,
                    "Tick failed, keeping previous fleet state"
                );
                self.event_bus
                    .publish(FleetEvent::tick_failed(now, e.to_string()));
                Err(e)
            }
        }
    }

    /// Classify, derive alerts and summary, and swap in the new state.
    fn apply(&mut self, report: IngestReport, now: Timestamp) {
        let IngestReport { mut fleet, rejected } = report;

        refresh_fleet(&mut fleet, &self.status_thresholds);
        let alerts = generate_with(&fleet, now, &self.alert_thresholds);
        let summary = FleetSummary::from_fleet(&fleet);

        self.state = FleetState {
            machines: fleet,
            alerts,
            summary,
            rejected,
            last_updated: Some(now),
            tick_count: self.state.tick_count + 1,
        };

        tracing::info!(
            tick = self.state.tick_count,
            machines = self.state.summary.total,
            danger = self.state.summary.danger,
            warning = self.state.summary.warning,
            alerts = self.state.alerts.len(),
            rejected = self.state.rejected.len(),
            "Fleet tick applied"
        );

        self.event_bus.publish(FleetEvent::Tick(TickEvent {
            tick: self.state.tick_count,
            generated_at: now,
            machines: self.state.machines.clone(),
            alerts: self.state.alerts.clone(),
            summary: self.state.summary,
            rejected: self.state.rejected.clone(),
        }));
    }
}
