//! Fleet-wide aggregates shown on the overview page.

use serde::Serialize;

use crate::machine::MachineSnapshot;
use crate::status::MachineStatus;

/// Machine counts per status plus the mean health index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSummary {
    pub total: usize,
    pub normal: usize,
    pub warning: usize,
    pub danger: usize,
    /// `0.0` for an empty fleet.
    pub average_health_index: f64,
}

impl FleetSummary {
    pub fn from_fleet(fleet: &[MachineSnapshot]) -> Self {
        let mut summary = Self {
            total: fleet.len(),
            ..Self::default()
        };

        let mut health_sum = 0.0;
        for machine in fleet {
            health_sum += machine.health_index;
            match machine.status() {
                MachineStatus::Normal => summary.normal += 1,
                MachineStatus::Warning => summary.warning += 1,
                MachineStatus::Danger => summary.danger += 1,
            }
        }

        if !fleet.is_empty() {
            summary.average_health_index = health_sum / fleet.len() as f64;
        }
        summary
    }

    pub fn count(&self, status: MachineStatus) -> usize {
        match status {
            MachineStatus::Normal => self.normal,
            MachineStatus::Warning => self.warning,
            MachineStatus::Danger => self.danger,
        }
    }
}
