//! Mock port adapters for integration tests.
//!
//! Records every published reading and replays scripted random draws so
//! tests can drive the controller down a chosen path.

use std::cell::RefCell;
use std::collections::VecDeque;

use chrono::TimeZone;
use glucosim::app::events::Reading;
use glucosim::app::ports::{ConfigError, ConfigPort, RandomSource, TelemetryPublisher};
use glucosim::clock::{Timestamp, mountain_standard};
use glucosim::config::SimConfig;
use glucosim::pump::PolicyTable;

// ── Fixtures ──────────────────────────────────────────────────

/// ItC 10 g/U, basal 2 U/h, correction 40 / 120 / 30.
///
/// Basal nearly cancels the baseline drift, so glucose stays in range for
/// hours without any intervention.
pub const SETTINGS: &str = "\
ItC
0,0,0,10
Basal
0,0,0,2.0
Correction
0,0,0,40,120,30
";

pub fn policy() -> PolicyTable {
    PolicyTable::load(SETTINGS).unwrap()
}

/// 4 March 2024 at `h:m` in the simulation zone.
pub fn at(h: u32, m: u32) -> Timestamp {
    mountain_standard()
        .with_ymd_and_hms(2024, 3, 4, h, m, 0)
        .unwrap()
}

// ── ScriptedRandom ────────────────────────────────────────────

/// Replays queued draws, then falls back to fixed defaults.
pub struct ScriptedRandom {
    pub draws: VecDeque<f64>,
    pub fallback_draw: f64,
    pub uniform_calls: usize,
}

#[allow(dead_code)]
impl ScriptedRandom {
    /// Every draw succeeds; every meal is the smallest in its range.
    pub fn always_eat() -> Self {
        Self {
            draws: VecDeque::new(),
            fallback_draw: 0.0,
            uniform_calls: 0,
        }
    }

    /// No draw ever succeeds.
    pub fn never_eat() -> Self {
        Self {
            draws: VecDeque::new(),
            fallback_draw: 0.999_999,
            uniform_calls: 0,
        }
    }

    pub fn with_draws(draws: &[f64]) -> Self {
        Self {
            draws: draws.iter().copied().collect(),
            ..Self::never_eat()
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn uniform(&mut self) -> f64 {
        self.uniform_calls += 1;
        self.draws.pop_front().unwrap_or(self.fallback_draw)
    }

    fn carbs_between(&mut self, min: u32, _max: u32) -> u32 {
        min
    }
}

// ── RecordingPublisher ────────────────────────────────────────

#[derive(Default)]
pub struct RecordingPublisher {
    pub readings: Vec<Reading>,
}

#[allow(dead_code)]
impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_insulin(&self) -> f64 {
        self.readings.iter().map(|r| r.insulin).sum()
    }

    pub fn total_carbs(&self) -> f64 {
        self.readings.iter().map(|r| r.carbs).sum()
    }
}

impl TelemetryPublisher for RecordingPublisher {
    fn publish(&mut self, reading: &Reading) {
        self.readings.push(reading.clone());
    }
}

// ── MemConfig ─────────────────────────────────────────────────

/// In-memory [`ConfigPort`].
#[derive(Default)]
pub struct MemConfig {
    pub stored: RefCell<Option<SimConfig>>,
}

impl ConfigPort for MemConfig {
    fn load(&self) -> Result<SimConfig, ConfigError> {
        self.stored.borrow().clone().ok_or(ConfigError::NotFound)
    }

    fn save(&self, config: &SimConfig) -> Result<(), ConfigError> {
        config.validate()?;
        *self.stored.borrow_mut() = Some(config.clone());
        Ok(())
    }
}
