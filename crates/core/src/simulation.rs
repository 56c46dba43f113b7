//! Simulated telemetry evolution.
//!
//! Stands in for a live feed: each call nudges every machine's health
//! index, RUL, and sensor readings by bounded uniform noise, then
//! re-derives its status. The random source is injected so runs can be
//! replayed from a seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::CoreError;
use crate::machine::{FleetSnapshot, MachineSnapshot};
use crate::status::StatusThresholds;
use crate::threshold_validation::validate_non_negative;

/// Half-widths and decay ceilings for one simulation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationBounds {
    /// Health delta is drawn from `[-health_step, health_step]`.
    pub health_step: f64,
    /// Max RUL decay when health went down.
    pub rul_decay_degrading: f64,
    /// Max RUL decay when health held or went up.
    pub rul_decay_recovering: f64,
    pub temperature_step: f64,
    pub vibration_step: f64,
    pub pressure_step: f64,
}

impl Default for SimulationBounds {
    fn default() -> Self {
        Self {
            health_step: 0.01,
            rul_decay_degrading: 10.0,
            rul_decay_recovering: 5.0,
            temperature_step: 1.0,
            vibration_step: 0.015,
            pressure_step: 2.5,
        }
    }
}

impl SimulationBounds {
    /// Reject negative or non-finite widths.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_non_negative(self.health_step, "health_step")?;
        validate_non_negative(self.rul_decay_degrading, "rul_decay_degrading")?;
        validate_non_negative(self.rul_decay_recovering, "rul_decay_recovering")?;
        validate_non_negative(self.temperature_step, "temperature_step")?;
        validate_non_negative(self.vibration_step, "vibration_step")?;
        validate_non_negative(self.pressure_step, "pressure_step")?;
        Ok(())
    }
}

/// Advances a fleet snapshot by one tick of simulated drift.
pub struct TelemetrySimulator<R = StdRng> {
    rng: R,
    bounds: SimulationBounds,
    thresholds: StatusThresholds,
}

impl TelemetrySimulator<StdRng> {
    /// Deterministic simulator for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Simulator seeded from the operating system.
    pub fn from_os_rng() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl<R: Rng> TelemetrySimulator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            bounds: SimulationBounds::default(),
            thresholds: StatusThresholds::default(),
        }
    }

    /// Replace the step bounds. Negative or non-finite widths are rejected
    /// here so `advance` never sees an empty sampling range.
    pub fn with_bounds(mut self, bounds: SimulationBounds) -> Result<Self, CoreError> {
        bounds.validate()?;
        self.bounds = bounds;
        Ok(self)
    }

    pub fn with_thresholds(mut self, thresholds: StatusThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Advance every machine in place, each with fresh draws.
    pub fn advance(&mut self, fleet: &mut [MachineSnapshot]) {
        for machine in fleet.iter_mut() {
            self.advance_machine(machine);
        }
    }

    /// Return an advanced copy, leaving `fleet` untouched.
    pub fn advanced(&mut self, fleet: &[MachineSnapshot]) -> FleetSnapshot {
        let mut next = fleet.to_vec();
        self.advance(&mut next);
        next
    }

    pub fn advance_machine(&mut self, machine: &mut MachineSnapshot) {
        let bounds = self.bounds;

        let health_delta = self.symmetric(bounds.health_step);
        machine.health_index = (machine.health_index + health_delta).clamp(0.0, 1.0);

        let decay_ceiling = if health_delta < 0.0 {
            bounds.rul_decay_degrading
        } else {
            bounds.rul_decay_recovering
        };
        let decay = self.rng.random_range(0.0..=decay_ceiling);
        machine.rul.value = (machine.rul.value - decay).max(0.0);

        // Sensor readings drift freely; no clamping.
        machine.parameters.temperature += self.symmetric(bounds.temperature_step);
        machine.parameters.vibration += self.symmetric(bounds.vibration_step);
        machine.parameters.pressure += self.symmetric(bounds.pressure_step);

        machine.refresh_status(&self.thresholds);
    }

    fn symmetric(&mut self, half_width: f64) -> f64 {
        self.rng.random_range(-half_width..=half_width)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
