//! End-to-end runs through the file and telemetry adapters.

use std::fs;

use chrono::TimeDelta;
use glucosim::adapters::config_file::JsonConfigFile;
use glucosim::adapters::dice::SeededDice;
use glucosim::adapters::json_sink::JsonLinesPublisher;
use glucosim::adapters::settings_file::SettingsFile;
use glucosim::adapters::time::SimulatedClock;
use glucosim::app::ports::{ClockPort, ConfigError, ConfigPort, SettingsPort};
use glucosim::app::service::AppService;
use glucosim::config::{ClockMode, SimConfig};

use crate::mock_ports::{MemConfig, SETTINGS, at};

#[test]
fn files_to_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let settings_path = dir.path().join("pump_settings.txt");
    fs::write(&settings_path, SETTINGS).unwrap();

    let config_store = JsonConfigFile::new(dir.path().join("glucosim.json"));
    config_store
        .save(&SimConfig {
            patient_id: "carol".into(),
            clock: ClockMode::Simulated,
            seed: Some(5),
            settings_path: settings_path.display().to_string(),
            ..SimConfig::default()
        })
        .unwrap();

    let config = config_store.load().unwrap();
    let policy = SettingsFile::new(&config.settings_path)
        .load_settings()
        .unwrap();
    let clock = SimulatedClock::new(at(6, 0));
    let rng = SeededDice::from_config(config.seed);
    let mut app = AppService::new(config, policy, rng, clock.now()).unwrap();
    let mut publisher = JsonLinesPublisher::new(Vec::new());

    for _ in 0..12 {
        app.step(clock.now(), &mut publisher).unwrap();
        clock.advance(TimeDelta::minutes(5));
    }

    assert_eq!(publisher.failures(), 0);
    let text = String::from_utf8(publisher.into_inner()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 12);

    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first[0]["carol"]["Glucose"], 120.0);
    assert_eq!(first[0]["carol"]["Date"], "2024-03-04 06:00:00");
    let last: serde_json::Value = serde_json::from_str(lines[11]).unwrap();
    assert_eq!(last[0]["carol"]["Date"], "2024-03-04 06:55:00");
}

#[test]
fn settings_survive_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let store = SettingsFile::new(dir.path().join("pump.txt"));
    let table = glucosim::pump::PolicyTable::load(SETTINGS).unwrap();

    store.save_settings(&table).unwrap();
    let reloaded = store.load_settings().unwrap();

    assert_eq!(reloaded, table);
}

#[test]
fn config_port_validates_on_save() {
    let store = MemConfig::default();
    assert!(matches!(store.load(), Err(ConfigError::NotFound)));

    let bad = SimConfig {
        min_glucose: 400.0,
        ..SimConfig::default()
    };
    assert!(matches!(
        store.save(&bad),
        Err(ConfigError::ValidationFailed(_))
    ));
    assert!(store.load().is_err());

    store.save(&SimConfig::default()).unwrap();
    assert_eq!(store.load().unwrap(), SimConfig::default());
}
