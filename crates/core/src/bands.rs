//! Severity bands for RUL and sensor readings.
//!
//! These are informational: they describe where a reading sits relative to
//! its operating range and never feed status or alert generation.

use serde::Serialize;

use crate::machine::Parameters;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Normal,
    Warning,
    Danger,
}

/// Which side of the range is unhealthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    HigherIsWorse,
    LowerIsWorse,
}

/// Two cut-offs and a direction. Cut-offs are inclusive on the healthy side
/// for `HigherIsWorse` and on the unhealthy side for `LowerIsWorse`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandLimits {
    pub warning: f64,
    pub danger: f64,
    pub direction: Direction,
}

impl BandLimits {
    pub fn band(&self, value: f64) -> Band {
        match self.direction {
            Direction::HigherIsWorse => {
                if value > self.danger {
                    Band::Danger
                } else if value > self.warning {
                    Band::Warning
                } else {
                    Band::Normal
                }
            }
            Direction::LowerIsWorse => {
                if value <= self.danger {
                    Band::Danger
                } else if value <= self.warning {
                    Band::Warning
                } else {
                    Band::Normal
                }
            }
        }
    }
}

/// RUL hours: `<= 200` danger, `<= 400` warning.
pub const RUL_LIMITS: BandLimits = BandLimits {
    warning: 400.0,
    danger: 200.0,
    direction: Direction::LowerIsWorse,
};

/// Temperature in °C: `> 75` danger, `> 50` warning.
pub const TEMPERATURE_LIMITS: BandLimits = BandLimits {
    warning: 50.0,
    danger: 75.0,
    direction: Direction::HigherIsWorse,
};

/// Vibration in g: `> 0.35` danger, `> 0.2` warning.
pub const VIBRATION_LIMITS: BandLimits = BandLimits {
    warning: 0.2,
    danger: 0.35,
    direction: Direction::HigherIsWorse,
};

/// Pressure in kPa: `<= 180` danger, `<= 200` warning.
pub const PRESSURE_LIMITS: BandLimits = BandLimits {
    warning: 200.0,
    danger: 180.0,
    direction: Direction::LowerIsWorse,
};

pub fn rul_band(rul_hours: f64) -> Band {
    RUL_LIMITS.band(rul_hours)
}

/// Bands for all three sensor readings of one machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParameterBands {
    pub temperature: Band,
    pub vibration: Band,
    pub pressure: Band,
}

impl ParameterBands {
    pub fn of(parameters: &Parameters) -> Self {
        Self {
            temperature: TEMPERATURE_LIMITS.band(parameters.temperature),
            vibration: VIBRATION_LIMITS.band(parameters.vibration),
            pressure: PRESSURE_LIMITS.band(parameters.pressure),
        }
    }

    /// The most severe of the three bands.
    pub fn worst(&self) -> Band {
        [self.temperature, self.vibration, self.pressure]
            .into_iter()
            .max_by_key(|band| match band {
                Band::Normal => 0,
                Band::Warning => 1,
                Band::Danger => 2,
            })
            .unwrap_or(Band::Normal)
    }
}
