//! Glucose dynamics model
//!
//! Linear first-order compartment approximation: every gram of carbohydrate
//! and every unit of insulin on board moves glucose at a fixed rate, on top
//! of a constant baseline drift.  Glucose is not clamped; an untreated run
//! can go negative or grow without bound.

use crate::config::SimConfig;

/// Aggregates read from the ledger and the pump before a step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OnBoard {
    /// Grams of carbohydrate still active.
    pub carbs: f64,
    /// Units of bolus insulin still active.
    pub bolus: f64,
    /// Current basal rate (U/h).
    pub basal: f64,
}

/// Per-step glucose update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlucoseModel {
    baseline_drift: f64,
    carb_gain: f64,
    insulin_gain: f64,
    step_hours: f64,
}

impl GlucoseModel {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            baseline_drift: config.baseline_drift,
            carb_gain: config.carb_gain,
            insulin_gain: config.insulin_gain,
            step_hours: config.step_hours(),
        }
    }

    /// Glucose after one step starting from `previous`.
    pub fn next(&self, previous: f64, on_board: OnBoard) -> f64 {
        let h = self.step_hours;
        previous
            + self.baseline_drift * h
            + on_board.carbs * self.carb_gain * h
            + on_board.bolus * self.insulin_gain * h
            + on_board.basal * self.insulin_gain * h
    }

    /// Net glucose rate (mg/dL/h) for the given aggregates.
    pub fn rate(&self, on_board: OnBoard) -> f64 {
        self.baseline_drift
            + on_board.carbs * self.carb_gain
            + (on_board.bolus + on_board.basal) * self.insulin_gain
    }
}
