//! Fleet data model.
//!
//! [`MachineRecord`] is the wire shape accepted from snapshot producers.
//! [`MachineSnapshot`] is the classified, in-memory form: its status is
//! derived on construction and can only be refreshed from the health index.

use serde::{Deserialize, Serialize};

use crate::status::{MachineStatus, StatusThresholds};
use crate::types::MachineId;

/// Remaining useful life estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rul {
    pub value: f64,
    pub unit: String,
}

/// Instantaneous sensor readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// Degrees Celsius.
    pub temperature: f64,
    /// Acceleration in g.
    pub vibration: f64,
    /// Kilopascal.
    pub pressure: f64,
}

/// Parallel time series supplied by the upstream producer. Never mutated
/// here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct History {
    #[serde(default)]
    pub timestamps: Vec<String>,
    #[serde(default)]
    pub health_index: Vec<f64>,
    #[serde(default)]
    pub rul: Vec<f64>,
}

/// A machine entry as it appears in the `{ "machines": [...] }` resource.
///
/// Any `status` field in the source is ignored; status is always derived.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineRecord {
    pub id: MachineId,
    pub name: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub location: String,
    pub health_index: f64,
    pub rul: Rul,
    pub parameters: Parameters,
    #[serde(default)]
    pub history: History,
}

/// One machine of the fleet with its derived status.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineSnapshot {
    pub id: MachineId,
    pub name: String,
    pub model: String,
    pub location: String,
    pub health_index: f64,
    status: MachineStatus,
    pub rul: Rul,
    pub parameters: Parameters,
    pub history: History,
}

/// Ordered fleet, in source insertion order.
pub type FleetSnapshot = Vec<MachineSnapshot>;

impl MachineSnapshot {
    /// Build a snapshot from a wire record, classifying it immediately.
    pub fn from_record(record: MachineRecord, thresholds: &StatusThresholds) -> Self {
        let status = thresholds.classify(record.health_index);
        Self {
            id: record.id,
            name: record.name,
            model: record.model,
            location: record.location,
            health_index: record.health_index,
            status,
            rul: record.rul,
            parameters: record.parameters,
            history: record.history,
        }
    }

    /// Derived status as of the last refresh.
    pub fn status(&self) -> MachineStatus {
        self.status
    }

    /// Re-derive the status from the current health index.
    pub fn refresh_status(&mut self, thresholds: &StatusThresholds) {
        self.status = thresholds.classify(self.health_index);
    }
}

/// Refresh every machine's status in place.
pub fn refresh_fleet(fleet: &mut [MachineSnapshot], thresholds: &StatusThresholds) {
    for machine in fleet.iter_mut() {
        machine.refresh_status(thresholds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(health_index: f64) -> MachineRecord {
        MachineRecord {
            id: "M001".to_string(),
            name: "CNC-01".to_string(),
            model: "X200".to_string(),
            location: "Line A".to_string(),
            health_index,
            rul: Rul {
                value: 500.0,
                unit: "小時".to_string(),
            },
            parameters: Parameters {
                temperature: 45.0,
                vibration: 0.12,
                pressure: 210.0,
            },
            history: History::default(),
        }
    }

    #[test]
    fn from_record_classifies() {
        let thresholds = StatusThresholds::default();
        assert_eq!(
            MachineSnapshot::from_record(record(0.92), &thresholds).status(),
            MachineStatus::Normal
        );
        assert_eq!(
            MachineSnapshot::from_record(record(0.7), &thresholds).status(),
            MachineStatus::Warning
        );
        assert_eq!(
            MachineSnapshot::from_record(record(0.3), &thresholds).status(),
            MachineStatus::Danger
        );
    }

    #[test]
    fn refresh_tracks_health_index() {
        let thresholds = StatusThresholds::default();
        let mut machine = MachineSnapshot::from_record(record(0.92), &thresholds);
        machine.health_index = 0.55;
        machine.refresh_status(&thresholds);
        assert_eq!(machine.status(), MachineStatus::Danger);
    }

    #[test]
    fn record_ignores_incoming_status_and_defaults_optional_fields() {
        let json = serde_json::json!({
            "id": "M002",
            "name": "Press-02",
            "healthIndex": 0.95,
            "status": "danger",
            "rul": { "value": 820.0, "unit": "小時" },
            "parameters": { "temperature": 40.0, "vibration": 0.1, "pressure": 220.0 }
        });
        let record: MachineRecord = serde_json::from_value(json).unwrap();
        assert!(record.model.is_empty());
        assert!(record.history.timestamps.is_empty());

        let machine = MachineSnapshot::from_record(record, &StatusThresholds::default());
        assert_eq!(machine.status(), MachineStatus::Normal);
    }

    #[test]
    fn snapshot_serializes_with_wire_field_names() {
        let machine = MachineSnapshot::from_record(record(0.7), &StatusThresholds::default());
        let json = serde_json::to_value(&machine).unwrap();
        assert_eq!(json["healthIndex"], 0.7);
        assert_eq!(json["status"], "warning");
        assert_eq!(json["rul"]["unit"], "小時");
        assert!(json["history"]["healthIndex"].is_array());
    }
}
