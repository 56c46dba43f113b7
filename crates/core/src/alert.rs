//! Alert generation from a classified fleet snapshot.
//!
//! The alert list is rebuilt in full on every call; nothing is carried over
//! between ticks, so there is no de-duplication or cooldown here.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::machine::MachineSnapshot;
use crate::status::MachineStatus;
use crate::threshold_validation::{validate_non_negative, validate_ordered};
use crate::types::{MachineId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// RUL at or below this many hours raises a lifespan alert.
pub const RUL_WARNING_HOURS: f64 = 200.0;

/// RUL at or below this many hours makes the lifespan alert `high` priority.
pub const RUL_CRITICAL_HOURS: f64 = 100.0;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Alert category. Serialized as the dashboard's category label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertKind {
    #[serde(rename = "嚴重問題")]
    CriticalIssue,
    #[serde(rename = "性能警告")]
    PerformanceWarning,
    #[serde(rename = "壽命警告")]
    LifespanWarning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertPriority {
    Medium,
    High,
}

/// A single human-readable alert for one machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub machine_id: MachineId,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
    /// Generation time; identical for every alert of one call.
    pub time: Timestamp,
    pub priority: AlertPriority,
}

/// RUL cut-offs for lifespan alerts. `Default` yields 200 / 100 hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    pub lifespan_warning_hours: f64,
    pub lifespan_critical_hours: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            lifespan_warning_hours: RUL_WARNING_HOURS,
            lifespan_critical_hours: RUL_CRITICAL_HOURS,
        }
    }
}

impl AlertThresholds {
    pub fn new(lifespan_warning_hours: f64, lifespan_critical_hours: f64) -> Result<Self, CoreError> {
        validate_non_negative(lifespan_warning_hours, "lifespan_warning_hours")?;
        validate_non_negative(lifespan_critical_hours, "lifespan_critical_hours")?;
        validate_ordered(
            lifespan_critical_hours,
            "lifespan_critical_hours",
            lifespan_warning_hours,
            "lifespan_warning_hours",
        )?;
        Ok(Self {
            lifespan_warning_hours,
            lifespan_critical_hours,
        })
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Generate alerts with the default thresholds.
pub fn generate(fleet: &[MachineSnapshot], now: Timestamp) -> Vec<Alert> {
    generate_with(fleet, now, &AlertThresholds::default())
}

/// Generate the alert list for a fleet, in fleet order.
///
/// Each machine contributes at most one status alert (danger or warning)
/// and, independently, at most one lifespan alert.
pub fn generate_with(
    fleet: &[MachineSnapshot],
    now: Timestamp,
    thresholds: &AlertThresholds,
) -> Vec<Alert> {
    let mut alerts = Vec::new();
    for machine in fleet {
        alerts_for_machine(machine, now, thresholds, &mut alerts);
    }
    alerts
}

fn alerts_for_machine(
    machine: &MachineSnapshot,
    now: Timestamp,
    thresholds: &AlertThresholds,
    alerts: &mut Vec<Alert>,
) {
    match machine.status() {
        MachineStatus::Danger => alerts.push(Alert {
            machine_id: machine.id.clone(),
            kind: AlertKind::CriticalIssue,
            message: format!("{} 健康指數嚴重降低，需要立即維護！", machine.name),
            time: now,
            priority: AlertPriority::High,
        }),
        MachineStatus::Warning => alerts.push(Alert {
            machine_id: machine.id.clone(),
            kind: AlertKind::PerformanceWarning,
            message: format!("{} 健康指數下降，建議安排檢查。", machine.name),
            time: now,
            priority: AlertPriority::Medium,
        }),
        MachineStatus::Normal => {}
    }

    let rul = machine.rul.value;
    if rul <= thresholds.lifespan_warning_hours {
        let priority = if rul <= thresholds.lifespan_critical_hours {
            AlertPriority::High
        } else {
            AlertPriority::Medium
        };
        alerts.push(Alert {
            machine_id: machine.id.clone(),
            kind: AlertKind::LifespanWarning,
            message: format!(
                "{} 剩餘使用壽命僅剩 {} 小時，需要規劃更換。",
                machine.name,
                format_hours(rul)
            ),
            time: now,
            priority,
        });
    }
}

/// Truncated (never rounded up) to one decimal; whole hours print without
/// decimals. A RUL just under a cut-off never prints as the cut-off itself.
fn format_hours(hours: f64) -> String {
    let truncated = (hours * 10.0).floor() / 10.0;
    if truncated.fract() == 0.0 {
        format!("{truncated:.0}")
    } else {
        format!("{truncated:.1}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::machine::{History, MachineRecord, Parameters, Rul};
    use crate::status::StatusThresholds;

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap()
    }

    fn machine(id: &str, health_index: f64, rul: f64) -> MachineSnapshot {
        MachineSnapshot::from_record(
            MachineRecord {
                id: id.to_string(),
                name: format!("Machine {id}"),
                model: String::new(),
                location: String::new(),
                health_index,
                rul: Rul {
                    value: rul,
                    unit: "小時".to_string(),
                },
                parameters: Parameters {
                    temperature: 50.0,
                    vibration: 0.2,
                    pressure: 200.0,
                },
                history: History::default(),
            },
            &StatusThresholds::default(),
        )
    }

    #[test]
    fn danger_with_short_rul_yields_two_high_alerts() {
        let fleet = vec![machine("M1", 0.5, 50.0)];
        let alerts = generate(&fleet, now());

        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].kind, AlertKind::CriticalIssue);
        assert_eq!(alerts[0].priority, AlertPriority::High);
        assert_eq!(alerts[1].kind, AlertKind::LifespanWarning);
        assert_eq!(alerts[1].priority, AlertPriority::High);
    }

    #[test]
    fn normal_with_long_rul_yields_nothing() {
        let fleet = vec![machine("M1", 0.9, 500.0)];
        assert!(generate(&fleet, now()).is_empty());
    }

    #[test]
    fn warning_with_medium_rul_yields_two_medium_alerts() {
        let fleet = vec![machine("M1", 0.7, 150.0)];
        let alerts = generate(&fleet, now());

        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].kind, AlertKind::PerformanceWarning);
        assert_eq!(alerts[0].priority, AlertPriority::Medium);
        assert_eq!(alerts[1].kind, AlertKind::LifespanWarning);
        assert_eq!(alerts[1].priority, AlertPriority::Medium);
    }

    #[test]
    fn rul_boundaries_are_inclusive() {
        let at_warning = generate(&[machine("M1", 0.9, 200.0)], now());
        assert_eq!(at_warning.len(), 1);
        assert_eq!(at_warning[0].priority, AlertPriority::Medium);

        let at_critical = generate(&[machine("M1", 0.9, 100.0)], now());
        assert_eq!(at_critical[0].priority, AlertPriority::High);

        assert!(generate(&[machine("M1", 0.9, 200.5)], now()).is_empty());
    }

    #[test]
    fn empty_fleet_yields_empty_list() {
        assert!(generate(&[], now()).is_empty());
    }

    #[test]
    fn output_follows_fleet_order() {
        let fleet = vec![
            machine("M3", 0.5, 90.0),
            machine("M1", 0.9, 900.0),
            machine("M2", 0.7, 180.0),
        ];
        let ids: Vec<_> = generate(&fleet, now())
            .into_iter()
            .map(|a| a.machine_id)
            .collect();
        assert_eq!(ids, vec!["M3", "M3", "M2", "M2"]);
    }

    #[test]
    fn identical_input_yields_identical_output() {
        let fleet = vec![machine("M1", 0.55, 80.0), machine("M2", 0.75, 300.0)];
        assert_eq!(generate(&fleet, now()), generate(&fleet, now()));
    }

    #[test]
    fn every_alert_carries_the_same_time() {
        let fleet = vec![machine("M1", 0.55, 80.0), machine("M2", 0.75, 120.0)];
        assert!(generate(&fleet, now()).iter().all(|a| a.time == now()));
    }

    #[test]
    fn messages_reference_machine_name_and_hours() {
        let alerts = generate(&[machine("M7", 0.5, 87.5)], now());
        assert_eq!(alerts[0].message, "Machine M7 健康指數嚴重降低，需要立即維護！");
        assert_eq!(
            alerts[1].message,
            "Machine M7 剩餘使用壽命僅剩 87.5 小時，需要規劃更換。"
        );

        let alerts = generate(&[machine("M8", 0.7, 150.0)], now());
        assert_eq!(alerts[0].message, "Machine M8 健康指數下降，建議安排檢查。");
        assert!(alerts[1].message.contains("僅剩 150 小時"));
    }

    #[test]
    fn hours_just_under_critical_cutoff_do_not_print_as_the_cutoff() {
        let alerts = generate(&[machine("M9", 0.9, 99.96)], now());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].priority, AlertPriority::High);
        assert!(alerts[0].message.contains("僅剩 99.9 小時"), "{}", alerts[0].message);
    }

    #[test]
    fn custom_thresholds_apply() {
        let thresholds = AlertThresholds::new(300.0, 250.0).unwrap();
        let alerts = generate_with(&[machine("M1", 0.9, 260.0)], now(), &thresholds);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].priority, AlertPriority::Medium);
    }

    #[test]
    fn critical_above_warning_is_rejected() {
        assert!(AlertThresholds::new(100.0, 200.0).is_err());
        assert!(AlertThresholds::new(-1.0, 0.0).is_err());
    }

    #[test]
    fn alert_serializes_with_wire_field_names() {
        let alerts = generate(&[machine("M1", 0.5, 500.0)], now());
        let json = serde_json::to_value(&alerts[0]).unwrap();
        assert_eq!(json["machineId"], "M1");
        assert_eq!(json["type"], "嚴重問題");
        assert_eq!(json["priority"], "high");
        assert!(json["time"].is_string());
    }

    #[test]
    fn format_hours_trims_whole_numbers() {
        assert_eq!(format_hours(150.0), "150");
        assert_eq!(format_hours(87.46), "87.4");
        assert_eq!(format_hours(99.96), "99.9");
        assert_eq!(format_hours(199.99), "199.9");
        assert_eq!(format_hours(0.0), "0");
    }
}
