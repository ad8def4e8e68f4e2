//! Mutable simulation state threaded through every step.
//!
//! One value per run.  The step function reads the previous glucose from
//! here, writes the new one back, and the rules update the meal and
//! correction bookkeeping.

use serde::Serialize;

use crate::clock::Timestamp;

use super::meals::{MealKind, MealWindow};

/// Per-window eating bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MealState {
    /// Eaten in the current occurrence of the window.
    pub eaten: bool,
    /// Probability of eating on the next draw.
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationState {
    /// Latest glucose (mg/dL).
    pub glucose: f64,
    /// Indexed by [`MealKind::index`].
    pub meals: [MealState; MealKind::COUNT],
    /// A correction (bolus or rescue snack) is suppressing further ones.
    pub correction_given: bool,
    /// When the current suppression may be cleared.
    pub correction_end: Timestamp,
}

impl SimulationState {
    /// Fresh state: nothing eaten, every accumulator at its base value, and
    /// no correction pending as of `start`.
    pub fn new(glucose: f64, windows: &[MealWindow; MealKind::COUNT], start: Timestamp) -> Self {
        Self {
            glucose,
            meals: windows.map(|w| MealState {
                eaten: false,
                probability: w.base_probability,
            }),
            correction_given: false,
            correction_end: start,
        }
    }

    pub fn meal(&self, kind: MealKind) -> &MealState {
        &self.meals[kind.index()]
    }

    pub fn meal_mut(&mut self, kind: MealKind) -> &mut MealState {
        &mut self.meals[kind.index()]
    }
}
