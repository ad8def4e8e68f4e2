//! Prioritised decision rules.
//!
//! Each step evaluates [`PRIORITY`] in order and fires the first rule that
//! matches, so at most one primary action happens per step.
//!
//! ```text
//!   HighCorrection ─▶ LowRescue ─▶ Breakfast ─▶ Lunch ─▶ Dinner ─▶ Snack ─▶ CorrectionExpiry
//!   (first match wins; none matching leaves the state untouched)
//! ```

use core::fmt;

use chrono::NaiveTime;

use crate::clock::Timestamp;

use super::meals::{MealKind, MealWindow};
use super::state::SimulationState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Previous glucose above the ceiling, no correction active.
    HighCorrection,
    /// Previous glucose below the floor, no correction active.
    LowRescue,
    /// Inside a meal window that has not been eaten yet.
    Meal(MealKind),
    /// The correction suppression window has passed.
    CorrectionExpiry,
}

pub const PRIORITY: [Rule; 7] = [
    Rule::HighCorrection,
    Rule::LowRescue,
    Rule::Meal(MealKind::Breakfast),
    Rule::Meal(MealKind::Lunch),
    Rule::Meal(MealKind::Dinner),
    Rule::Meal(MealKind::Snack),
    Rule::CorrectionExpiry,
];

/// Inputs a rule guard looks at.
#[derive(Debug, Clone, Copy)]
pub struct Conditions<'a> {
    pub last_glucose: f64,
    pub now: Timestamp,
    pub time_of_day: NaiveTime,
    pub max_glucose: f64,
    pub min_glucose: f64,
    pub windows: &'a [MealWindow; MealKind::COUNT],
}

impl Rule {
    /// Guard for this rule.
    pub fn matches(self, state: &SimulationState, c: &Conditions<'_>) -> bool {
        match self {
            Self::HighCorrection => c.last_glucose > c.max_glucose && !state.correction_given,
            Self::LowRescue => c.last_glucose < c.min_glucose && !state.correction_given,
            Self::Meal(kind) => {
                c.windows[kind.index()].contains(c.time_of_day) && !state.meal(kind).eaten
            }
            // Clearing an already clear flag changes nothing, so only fire
            // while a correction is pending.
            Self::CorrectionExpiry => state.correction_given && c.now > state.correction_end,
        }
    }
}

/// First rule in priority order whose guard holds.
pub fn select(state: &SimulationState, conditions: &Conditions<'_>) -> Option<Rule> {
    PRIORITY
        .iter()
        .copied()
        .find(|rule| rule.matches(state, conditions))
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HighCorrection => f.write_str("high-correction"),
            Self::LowRescue => f.write_str("low-rescue"),
            Self::Meal(kind) => write!(f, "meal:{kind}"),
            Self::CorrectionExpiry => f.write_str("correction-expiry"),
        }
    }
}
