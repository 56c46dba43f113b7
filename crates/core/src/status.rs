//! Machine status classification.
//!
//! A machine's status is a pure function of its health index. Nothing else
//! in the system writes a status; see [`MachineSnapshot::refresh_status`]
//! for the only mutation path.
//!
//! [`MachineSnapshot::refresh_status`]: crate::machine::MachineSnapshot::refresh_status

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::threshold_validation::{validate_ordered, validate_unit_range};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Health index strictly below this value is `danger`.
pub const DANGER_BELOW: f64 = 0.6;

/// Health index strictly below this value (and not danger) is `warning`.
pub const WARNING_BELOW: f64 = 0.8;

// ---------------------------------------------------------------------------
// MachineStatus
// ---------------------------------------------------------------------------

/// Discrete machine status derived from the health index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineStatus {
    Normal,
    Warning,
    Danger,
}

impl MachineStatus {
    /// Dashboard display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "正常",
            Self::Warning => "警告",
            Self::Danger => "危險",
        }
    }
}

// ---------------------------------------------------------------------------
// StatusThresholds
// ---------------------------------------------------------------------------

/// Health index cut-offs used by the classifier.
///
/// `Default` yields the fixed dashboard values (0.6 / 0.8).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusThresholds {
    pub danger_below: f64,
    pub warning_below: f64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            danger_below: DANGER_BELOW,
            warning_below: WARNING_BELOW,
        }
    }
}

impl StatusThresholds {
    /// Build validated thresholds. Both must lie in `[0, 1]` and
    /// `danger_below` must not exceed `warning_below`.
    pub fn new(danger_below: f64, warning_below: f64) -> Result<Self, CoreError> {
        validate_unit_range(danger_below, "danger_below")?;
        validate_unit_range(warning_below, "warning_below")?;
        validate_ordered(danger_below, "danger_below", warning_below, "warning_below")?;
        Ok(Self {
            danger_below,
            warning_below,
        })
    }

    /// Classify a health index. Total: values outside `[0, 1]` follow the
    /// same inequalities.
    pub fn classify(&self, health_index: f64) -> MachineStatus {
        if health_index < self.danger_below {
            MachineStatus::Danger
        } else if health_index < self.warning_below {
            MachineStatus::Warning
        } else {
            MachineStatus::Normal
        }
    }
}

/// Classify a health index with the default thresholds.
pub fn classify(health_index: f64) -> MachineStatus {
    StatusThresholds::default().classify(health_index)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
