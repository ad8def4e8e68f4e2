//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the simulation state, the dose ledger, the pump
//! policy and the controller.  It exposes a clock-agnostic API: the
//! caller passes "now" into every step, and telemetry leaves through the
//! [`TelemetryPublisher`] port.
//!
//! ```text
//!   ClockPort ──▶ ┌─────────────────────────────┐ ──▶ TelemetryPublisher
//!                 │         AppService           │
//! RandomSource ──▶│  Model · Controller · Ledger │
//!                 └─────────────────────────────┘
//! ```

use std::io;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};

use crate::clock::Timestamp;
use crate::config::SimConfig;
use crate::control::{Controller, SimulationState};
use crate::dynamics::{GlucoseModel, OnBoard};
use crate::error::Result;
use crate::ledger::DoseLedger;
use crate::pump::PolicyTable;

use super::events::{Reading, StepReport};
use super::ports::{ClockPort, RandomSource, TelemetryPublisher};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// One simulation run.
pub struct AppService<R: RandomSource> {
    config: SimConfig,
    policy: PolicyTable,
    ledger: DoseLedger,
    model: GlucoseModel,
    controller: Controller,
    state: SimulationState,
    rng: R,
    step_count: u64,
}

impl<R: RandomSource> AppService<R> {
    /// Build a run starting at `start` with the configured initial glucose.
    ///
    /// Fails if any of the policy schedules is empty.
    pub fn new(config: SimConfig, policy: PolicyTable, rng: R, start: Timestamp) -> Result<Self> {
        policy.ensure_complete()?;
        let controller = Controller::new(&config);
        let state = SimulationState::new(config.initial_glucose, controller.windows(), start);
        info!(
            "simulation for '{}' starting at {:.1} mg/dL, {} min steps",
            config.patient_id, config.initial_glucose, config.step_minutes
        );
        Ok(Self {
            model: GlucoseModel::new(&config),
            controller,
            state,
            policy,
            ledger: DoseLedger::new(),
            rng,
            config,
            step_count: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the background ledger purge against `clock`.
    pub fn start_purge<C>(&mut self, clock: Arc<C>) -> io::Result<()>
    where
        C: ClockPort + Send + Sync + ?Sized + 'static,
    {
        let interval = Duration::from_secs(u64::from(self.config.purge_interval_secs));
        self.ledger.start_purge(clock, interval)
    }

    pub fn stop_purge(&mut self) {
        self.ledger.stop_purge();
    }

    // ── Per-step orchestration ────────────────────────────────

    /// Run one step at `now`: update glucose, let the controller act on the
    /// previous reading, and publish.
    ///
    /// On error nothing is published and the state is unchanged.
    pub fn step(&mut self, now: Timestamp, publisher: &mut impl TelemetryPublisher) -> Result<StepReport> {
        let last_glucose = self.state.glucose;
        let time = now.time();

        // 1. Aggregates as of now, before this step's own entries
        let on_board = OnBoard {
            carbs: self.ledger.total_carbs_on_board(now),
            bolus: self.ledger.total_insulin_on_board(now),
            basal: self.policy.basal(time)?,
        };

        // 2. Glucose update
        let glucose_after = self.model.next(last_glucose, on_board);

        // 3. Decision on the previous reading
        let action = self.controller.decide(
            &mut self.state,
            last_glucose,
            now,
            &self.policy,
            &self.ledger,
            &mut self.rng,
        )?;
        self.state.glucose = glucose_after;

        // 4. Telemetry
        let reading = Reading {
            patient_id: self.config.patient_id.clone(),
            glucose: last_glucose,
            insulin: action.as_ref().map_or(0.0, |a| a.insulin()),
            carbs: action.as_ref().map_or(0.0, |a| a.carbs()),
            timestamp: now,
        };
        publisher.publish(&reading);

        self.step_count += 1;
        debug!(
            "step {} at {}: {:.1} -> {:.1} mg/dL ({:?})",
            self.step_count, now, last_glucose, glucose_after, action
        );

        Ok(StepReport {
            reading,
            action,
            glucose_after,
        })
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn ledger(&self) -> &DoseLedger {
        &self.ledger
    }

    pub fn policy(&self) -> &PolicyTable {
        &self.policy
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Steps completed since construction.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }
}

impl<R: RandomSource> Drop for AppService<R> {
    fn drop(&mut self) {
        self.ledger.stop_purge();
    }
}
