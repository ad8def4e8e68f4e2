//! Autonomous control policy.
//!
//! Once per step the [`Controller`] looks at the previous glucose reading,
//! the time of day and the current [`SimulationState`], picks the first
//! matching [`Rule`] and carries it out against the [`DoseLedger`].
//!
//! ```text
//!   last glucose ─┐
//!   now ──────────┼─▶ rules::select ─▶ Controller::apply ─▶ DoseLedger
//!   state ────────┘                          │
//!                                            └─▶ Action (reported)
//! ```

pub mod correction;
pub mod meals;
pub mod rules;
pub mod state;

use chrono::TimeDelta;
use log::{debug, info};
use serde::Serialize;

use crate::app::ports::RandomSource;
use crate::clock::Timestamp;
use crate::config::SimConfig;
use crate::error::ConfigurationError;
use crate::ledger::DoseLedger;
use crate::pump::PolicyTable;

pub use correction::correction_dose;
pub use meals::{MealKind, MealWindow, standard_windows};
pub use rules::{Conditions, PRIORITY, Rule};
pub use state::{MealState, SimulationState};

// ───────────────────────────────────────────────────────────────
// Action
// ───────────────────────────────────────────────────────────────

/// What the controller did on a step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Insulin given for a high reading.
    CorrectionBolus { units: f64 },
    /// Fixed snack eaten for a low reading.
    RescueCarbs { grams: f64 },
    /// A scheduled meal and its bolus.
    MealEaten {
        kind: MealKind,
        grams: f64,
        units: f64,
    },
    /// Inside a window but the draw said no; `probability` is the raised
    /// accumulator.
    MealDeferred { kind: MealKind, probability: f64 },
    /// Correction suppression lifted.
    CorrectionExpired,
}

impl Action {
    pub fn rule(&self) -> Rule {
        match *self {
            Self::CorrectionBolus { .. } => Rule::HighCorrection,
            Self::RescueCarbs { .. } => Rule::LowRescue,
            Self::MealEaten { kind, .. } | Self::MealDeferred { kind, .. } => Rule::Meal(kind),
            Self::CorrectionExpired => Rule::CorrectionExpiry,
        }
    }

    /// Insulin delivered by this action.
    pub fn insulin(&self) -> f64 {
        match *self {
            Self::CorrectionBolus { units } | Self::MealEaten { units, .. } => units,
            _ => 0.0,
        }
    }

    /// Carbohydrate eaten by this action.
    pub fn carbs(&self) -> f64 {
        match *self {
            Self::RescueCarbs { grams } | Self::MealEaten { grams, .. } => grams,
            _ => 0.0,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Controller
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Controller {
    windows: [MealWindow; MealKind::COUNT],
    step_minutes: u32,
    max_glucose: f64,
    min_glucose: f64,
    rescue_carbs: f64,
    correction_window: TimeDelta,
    rescue_window: TimeDelta,
}

impl Controller {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            windows: standard_windows(),
            step_minutes: config.step_minutes,
            max_glucose: config.max_glucose,
            min_glucose: config.min_glucose,
            rescue_carbs: config.rescue_carbs,
            correction_window: TimeDelta::minutes(i64::from(config.correction_window_minutes)),
            rescue_window: TimeDelta::minutes(i64::from(config.rescue_window_minutes)),
        }
    }

    pub fn windows(&self) -> &[MealWindow; MealKind::COUNT] {
        &self.windows
    }

    /// Rule that would fire for these inputs, without side effects.
    pub fn select(&self, state: &SimulationState, last_glucose: f64, now: Timestamp) -> Option<Rule> {
        rules::select(state, &self.conditions(last_glucose, now))
    }

    /// Evaluate the rules for one step and carry out the winner.
    ///
    /// Policy lookups happen before anything is written, so an error leaves
    /// both the state and the ledger untouched.
    pub fn decide(
        &self,
        state: &mut SimulationState,
        last_glucose: f64,
        now: Timestamp,
        policy: &PolicyTable,
        ledger: &DoseLedger,
        rng: &mut impl RandomSource,
    ) -> Result<Option<Action>, ConfigurationError> {
        let Some(rule) = self.select(state, last_glucose, now) else {
            return Ok(None);
        };
        debug!("rule {rule} fired at {now} (last glucose {last_glucose:.1})");
        self.apply(rule, state, last_glucose, now, policy, ledger, rng)
            .map(Some)
    }

    #[allow(clippy::too_many_arguments)]
    fn apply(
        &self,
        rule: Rule,
        state: &mut SimulationState,
        last_glucose: f64,
        now: Timestamp,
        policy: &PolicyTable,
        ledger: &DoseLedger,
        rng: &mut impl RandomSource,
    ) -> Result<Action, ConfigurationError> {
        let time = now.time();
        match rule {
            Rule::HighCorrection => {
                let setting = policy.correction(time)?;
                let units = correction_dose(last_glucose, &setting);
                ledger.record_dose(now, units);
                state.correction_given = true;
                state.correction_end = now + self.correction_window;
                info!("correction bolus {units:.2} U for glucose {last_glucose:.1}");
                Ok(Action::CorrectionBolus { units })
            }
            Rule::LowRescue => {
                ledger.record_meal(now, self.rescue_carbs);
                state.correction_given = true;
                state.correction_end = now + self.rescue_window;
                info!(
                    "rescue snack {:.0} g for glucose {last_glucose:.1}",
                    self.rescue_carbs
                );
                Ok(Action::RescueCarbs {
                    grams: self.rescue_carbs,
                })
            }
            Rule::Meal(kind) => self.meal(kind, state, last_glucose, now, policy, ledger, rng),
            Rule::CorrectionExpiry => {
                state.correction_given = false;
                debug!("correction window ended at {}", state.correction_end);
                Ok(Action::CorrectionExpired)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn meal(
        &self,
        kind: MealKind,
        state: &mut SimulationState,
        last_glucose: f64,
        now: Timestamp,
        policy: &PolicyTable,
        ledger: &DoseLedger,
        rng: &mut impl RandomSource,
    ) -> Result<Action, ConfigurationError> {
        let window = &self.windows[kind.index()];
        let time = now.time();

        // Resolve both settings up front so a missing schedule cannot
        // leave a meal recorded without its bolus.
        let ratio = policy.insulin_to_carb(time)?;
        let setting = policy.correction(time)?;

        state.meal_mut(kind.predecessor()).eaten = false;

        let draw = rng.uniform();
        let meal = state.meal_mut(kind);
        if draw < meal.probability {
            let grams = f64::from(rng.carbs_between(window.carbs_min, window.carbs_max));
            let correction = if state.correction_given {
                0.0
            } else {
                correction_dose(last_glucose, &setting)
            };
            let units = grams / ratio + correction;

            ledger.record_meal(now, grams);
            ledger.record_dose(now, units);

            let meal = state.meal_mut(kind);
            meal.probability = window.base_probability;
            meal.eaten = true;
            info!("{kind} eaten: {grams:.0} g, bolus {units:.2} U");
            Ok(Action::MealEaten { kind, grams, units })
        } else {
            meal.probability += window.increment(self.step_minutes);
            debug!("{kind} skipped, probability now {:.3}", meal.probability);
            Ok(Action::MealDeferred {
                kind,
                probability: meal.probability,
            })
        }
    }

    fn conditions(&self, last_glucose: f64, now: Timestamp) -> Conditions<'_> {
        Conditions {
            last_glucose,
            now,
            time_of_day: now.time(),
            max_glucose: self.max_glucose,
            min_glucose: self.min_glucose,
            windows: &self.windows,
        }
    }
}
