//! Snapshot ingestion for the `{ "machines": [...] }` resource.
//!
//! A document that is not a JSON object with a `machines` array fails as a
//! whole. Individual entries that break the data contract are skipped and
//! reported; they never receive a guessed health value or status.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::machine::{FleetSnapshot, MachineRecord, MachineSnapshot};
use crate::status::StatusThresholds;
use crate::threshold_validation::{validate_non_negative, validate_unit_range};

/// A machine entry that was skipped during ingestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedMachine {
    /// Position of the entry in the source `machines` array.
    pub index: usize,
    /// The entry's `id`, when it could be read.
    pub id: Option<String>,
    pub reason: String,
}

/// Result of ingesting one snapshot document.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub fleet: FleetSnapshot,
    pub rejected: Vec<RejectedMachine>,
}

/// Parse a snapshot document with the default status thresholds.
pub fn parse_fleet(document: &str) -> Result<IngestReport, CoreError> {
    parse_fleet_with(document, &StatusThresholds::default())
}

pub fn parse_fleet_with(
    document: &str,
    thresholds: &StatusThresholds,
) -> Result<IngestReport, CoreError> {
    let root: Value = serde_json::from_str(document)
        .map_err(|e| CoreError::Validation(format!("snapshot is not valid JSON: {e}")))?;
    ingest_value(&root, thresholds)
}

/// Ingest an already-parsed snapshot document.
pub fn ingest_value(root: &Value, thresholds: &StatusThresholds) -> Result<IngestReport, CoreError> {
    let entries = root
        .get("machines")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            CoreError::Validation("snapshot must be an object with a `machines` array".to_string())
        })?;

    let mut report = IngestReport::default();
    let mut seen: HashSet<String> = HashSet::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let id = entry.get("id").and_then(Value::as_str).map(str::to_string);

        let result = decode_machine(entry, index, thresholds).and_then(|machine| {
            if seen.contains(&machine.id) {
                Err(CoreError::DataContract {
                    machine: machine.id.clone(),
                    reason: "duplicate machine id".to_string(),
                })
            } else {
                Ok(machine)
            }
        });

        match result {
            Ok(machine) => {
                seen.insert(machine.id.clone());
                report.fleet.push(machine);
            }
            Err(e) => {
                let reason = match e {
                    CoreError::DataContract { reason, .. } => reason,
                    other => other.to_string(),
                };
                report.rejected.push(RejectedMachine { index, id, reason });
            }
        }
    }

    Ok(report)
}

fn decode_machine(
    entry: &Value,
    index: usize,
    thresholds: &StatusThresholds,
) -> Result<MachineSnapshot, CoreError> {
    let label = || {
        entry
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{index}"))
    };

    let record = MachineRecord::deserialize(entry).map_err(|e| CoreError::DataContract {
        machine: label(),
        reason: e.to_string(),
    })?;

    validate_unit_range(record.health_index, "healthIndex")
        .and_then(|()| validate_non_negative(record.rul.value, "rul.value"))
        .map_err(|e| CoreError::DataContract {
            machine: label(),
            reason: match e {
                CoreError::Validation(msg) => msg,
                other => other.to_string(),
            },
        })?;

    Ok(MachineSnapshot::from_record(record, thresholds))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
