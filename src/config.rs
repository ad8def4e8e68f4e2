//! Simulation configuration parameters
//!
//! All tunable parameters for one simulation run.
//! Values can be overridden from a JSON file (see `adapters::config_file`).

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::clock::{DEFAULT_UTC_OFFSET_HOURS, fixed_zone};

/// Where "now" comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockMode {
    /// Host wall clock; the loop sleeps one step between iterations.
    Wall,
    /// Simulated clock advanced by one step per iteration.
    Simulated,
}

/// Where readings go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TelemetryTarget {
    /// One `info!` line per reading.
    Log,
    /// One JSON payload per line on stdout.
    Stdout,
}

/// Core simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // --- Patient ---
    /// Identity carried in every telemetry reading
    pub patient_id: String,
    /// Glucose at the start of the run (mg/dL)
    pub initial_glucose: f64,

    // --- Timing ---
    /// Simulated minutes per step
    pub step_minutes: u32,
    /// Fixed clock zone, hours east of UTC
    pub utc_offset_hours: i32,
    /// Clock source
    pub clock: ClockMode,
    /// Real delay between simulated steps (milliseconds)
    pub simulated_step_delay_ms: u64,
    /// Stop after this many steps (`None` = run forever)
    pub max_steps: Option<u64>,

    // --- Glucose model ---
    /// Baseline glucose drift (mg/dL/h)
    pub baseline_drift: f64,
    /// Glucose rise per gram of carbs on board (mg/dL/h/g)
    pub carb_gain: f64,
    /// Glucose change per unit of insulin on board (mg/dL/h/U)
    pub insulin_gain: f64,

    // --- Control thresholds ---
    /// Above this a correction bolus is given (mg/dL)
    pub max_glucose: f64,
    /// Below this a rescue snack is eaten (mg/dL)
    pub min_glucose: f64,
    /// Grams eaten on a low
    pub rescue_carbs: f64,
    /// Further corrections suppressed for this long after a correction (minutes)
    pub correction_window_minutes: u32,
    /// Further corrections suppressed for this long after a rescue (minutes)
    pub rescue_window_minutes: u32,

    // --- Housekeeping ---
    /// Ledger purge cadence (real seconds)
    pub purge_interval_secs: u32,
    /// Meal RNG seed (`None` = seed from entropy)
    pub seed: Option<u64>,
    /// Pump settings store
    pub settings_path: String,
    /// Reading destination
    pub telemetry: TelemetryTarget,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            // Patient
            patient_id: "patient".into(),
            initial_glucose: 120.0,

            // Timing
            step_minutes: 5,
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS, // MST, no DST
            clock: ClockMode::Wall,
            simulated_step_delay_ms: 0,
            max_steps: None,

            // Glucose model
            baseline_drift: 50.0,
            carb_gain: 4.0,
            insulin_gain: -27.0,

            // Control thresholds
            max_glucose: 300.0,
            min_glucose: 50.0,
            rescue_carbs: 15.0,
            correction_window_minutes: 90,
            rescue_window_minutes: 15,

            // Housekeeping
            purge_interval_secs: 10,
            seed: None,
            settings_path: "pump_settings.txt".into(),
            telemetry: TelemetryTarget::Stdout,
        }
    }
}

impl SimConfig {
    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.patient_id.trim().is_empty() {
            return Err(ConfigError::ValidationFailed("patient_id must not be empty"));
        }
        if !(1..=60).contains(&self.step_minutes) {
            return Err(ConfigError::ValidationFailed("step_minutes must be 1–60"));
        }
        if fixed_zone(self.utc_offset_hours).is_none() {
            return Err(ConfigError::ValidationFailed(
                "utc_offset_hours must be within ±23",
            ));
        }
        if !self.initial_glucose.is_finite() {
            return Err(ConfigError::ValidationFailed("initial_glucose must be finite"));
        }
        if !(self.baseline_drift.is_finite()
            && self.carb_gain.is_finite()
            && self.insulin_gain.is_finite())
        {
            return Err(ConfigError::ValidationFailed("model gains must be finite"));
        }
        if self.min_glucose >= self.max_glucose {
            return Err(ConfigError::ValidationFailed(
                "min_glucose must be below max_glucose",
            ));
        }
        if self.rescue_carbs <= 0.0 {
            return Err(ConfigError::ValidationFailed("rescue_carbs must be positive"));
        }
        if self.correction_window_minutes == 0 || self.rescue_window_minutes == 0 {
            return Err(ConfigError::ValidationFailed(
                "correction windows must be positive",
            ));
        }
        if self.purge_interval_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "purge_interval_secs must be positive",
            ));
        }
        Ok(())
    }

    /// Step length as hours.
    pub fn step_hours(&self) -> f64 {
        f64::from(self.step_minutes) / 60.0
    }
}
