//! glucosim: closed-loop glucose/insulin simulator.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  JsonConfigFile   SettingsFile    SystemClock / SimulatedClock │
//! │  (ConfigPort)     (SettingsPort)  (ClockPort)                  │
//! │  SeededDice       JsonLinesPublisher / LogPublisher            │
//! │  (RandomSource)   (TelemetryPublisher)                         │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  GlucoseModel · Controller · DoseLedger · PolicyTable  │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Purge threads (one per ledger, own cadence)                   │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::env;
use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::TimeDelta;
use log::{info, warn};

use glucosim::adapters::config_file::JsonConfigFile;
use glucosim::adapters::dice::SeededDice;
use glucosim::adapters::json_sink::JsonLinesPublisher;
use glucosim::adapters::log_sink::LogPublisher;
use glucosim::adapters::settings_file::SettingsFile;
use glucosim::adapters::time::{SimulatedClock, SystemClock};
use glucosim::app::ports::{ClockPort, ConfigError, ConfigPort, SettingsPort, TelemetryPublisher};
use glucosim::app::service::AppService;
use glucosim::clock::fixed_zone;
use glucosim::config::{ClockMode, SimConfig, TelemetryTarget};
use glucosim::pump::PolicyTable;

const CONFIG_ENV: &str = "GLUCOSIM_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "glucosim.json";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("╔══════════════════════════════════════╗");
    info!("║  glucosim v{}                     ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 1. Configuration ──────────────────────────────────────
    let config_path = env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_owned());
    let config = match JsonConfigFile::new(&config_path).load() {
        Ok(config) => {
            info!("Config loaded from {config_path}");
            config
        }
        Err(ConfigError::NotFound) => {
            warn!("{config_path} not found, using defaults");
            SimConfig::default()
        }
        Err(e) => {
            warn!("{config_path} unusable ({e}), using defaults");
            SimConfig::default()
        }
    };
    config.validate().context("invalid configuration")?;

    // ── 2. Pump settings ──────────────────────────────────────
    let policy = SettingsFile::new(&config.settings_path)
        .load_settings()
        .with_context(|| format!("loading pump settings from {}", config.settings_path))?;

    // ── 3. Clock, randomness, telemetry ───────────────────────
    let zone = fixed_zone(config.utc_offset_hours).context("utc_offset_hours out of range")?;
    let step = TimeDelta::minutes(i64::from(config.step_minutes));
    let rng = SeededDice::from_config(config.seed);
    let publisher: Box<dyn TelemetryPublisher> = match config.telemetry {
        TelemetryTarget::Stdout => Box::new(JsonLinesPublisher::new(io::stdout())),
        TelemetryTarget::Log => Box::new(LogPublisher::new()),
    };

    // ── 4. Step loop ──────────────────────────────────────────
    match config.clock {
        ClockMode::Wall => {
            let pause = Duration::from_secs(u64::from(config.step_minutes) * 60);
            let clock = Arc::new(SystemClock::new(zone));
            run(clock, config, policy, rng, publisher, |_| thread::sleep(pause))
        }
        ClockMode::Simulated => {
            let pause = Duration::from_millis(config.simulated_step_delay_ms);
            let clock = Arc::new(SimulatedClock::new(SystemClock::new(zone).now()));
            run(clock, config, policy, rng, publisher, |clock| {
                clock.advance(step);
                if !pause.is_zero() {
                    thread::sleep(pause);
                }
            })
        }
    }
}

/// Step until `max_steps` (or forever), calling `pace` between steps.
fn run<C>(
    clock: Arc<C>,
    config: SimConfig,
    policy: PolicyTable,
    rng: SeededDice,
    mut publisher: Box<dyn TelemetryPublisher>,
    mut pace: impl FnMut(&C),
) -> Result<()>
where
    C: ClockPort + Send + Sync + 'static,
{
    let max_steps = config.max_steps;
    let mut app = AppService::new(config, policy, rng, clock.now())?;
    app.start_purge(Arc::clone(&clock))
        .context("starting ledger purge")?;

    info!("System ready. Entering step loop.");

    loop {
        app.step(clock.now(), &mut publisher)?;
        if max_steps.is_some_and(|max| app.step_count() >= max) {
            break;
        }
        pace(clock.as_ref());
    }

    app.stop_purge();
    info!("Simulation finished after {} steps", app.step_count());
    Ok(())
}
