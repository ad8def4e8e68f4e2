//! Integration tests for the AppService step pipeline:
//! ledger aggregates → glucose model → controller → telemetry.

use chrono::TimeDelta;
use glucosim::adapters::dice::SeededDice;
use glucosim::adapters::time::SimulatedClock;
use glucosim::app::ports::{ClockPort, RandomSource};
use glucosim::app::service::AppService;
use glucosim::clock::Timestamp;
use glucosim::config::SimConfig;
use glucosim::control::{Action, MealKind, Rule};

use crate::mock_ports::{RecordingPublisher, ScriptedRandom, at, policy};

fn make_app<R: RandomSource>(glucose: f64, rng: R, start: Timestamp) -> AppService<R> {
    let config = SimConfig {
        initial_glucose: glucose,
        ..SimConfig::default()
    };
    AppService::new(config, policy(), rng, start).unwrap()
}

// ── High / low glucose ────────────────────────────────────────

#[test]
fn high_glucose_correction_is_published() {
    let now = at(3, 0);
    let mut app = make_app(320.0, ScriptedRandom::never_eat(), now);
    let mut sink = RecordingPublisher::new();

    let report = app.step(now, &mut sink).unwrap();

    assert_eq!(report.action, Some(Action::CorrectionBolus { units: 5.0 }));
    assert_eq!(sink.readings[0].insulin, 5.0);
    assert_eq!(sink.readings[0].carbs, 0.0);
    assert_eq!(sink.readings[0].glucose, 320.0);
    assert_eq!(app.ledger().total_insulin_on_board(now), 5.0);
    assert!(app.state().correction_given);
}

#[test]
fn low_glucose_rescue_is_published() {
    let now = at(3, 0);
    let mut app = make_app(45.0, ScriptedRandom::never_eat(), now);
    let mut sink = RecordingPublisher::new();

    app.step(now, &mut sink).unwrap();

    assert_eq!(sink.readings[0].carbs, 15.0);
    assert_eq!(sink.readings[0].insulin, 0.0);
    assert_eq!(app.ledger().total_insulin_on_board(now), 0.0);
    assert_eq!(app.state().correction_end, now + TimeDelta::minutes(15));
}

#[test]
fn high_glucose_inside_breakfast_takes_priority() {
    let now = at(8, 0);
    let mut rng = ScriptedRandom::always_eat();
    let mut sink = RecordingPublisher::new();
    {
        let mut app = make_app(310.0, &mut rng, now);
        let report = app.step(now, &mut sink).unwrap();
        assert_eq!(report.rule(), Some(Rule::HighCorrection));
        assert!(!app.state().meal(MealKind::Breakfast).eaten);
        assert_eq!(app.ledger().total_carbs_on_board(now), 0.0);
    }
    assert_eq!(rng.uniform_calls, 0, "no meal draw on a correction step");
}

// ── Meal scheduling over time ─────────────────────────────────

#[test]
fn breakfast_flag_holds_until_lunch_opens() {
    let start = at(7, 30);
    let clock = SimulatedClock::new(start);
    let mut app = make_app(120.0, ScriptedRandom::always_eat(), start);
    let mut sink = RecordingPublisher::new();

    let first = app.step(clock.now(), &mut sink).unwrap();
    assert_eq!(
        first.action,
        Some(Action::MealEaten {
            kind: MealKind::Breakfast,
            grams: 30.0,
            units: 3.0,
        })
    );

    // 07:35 through 11:55
    while clock.advance(TimeDelta::minutes(5)) < at(12, 0) {
        let report = app.step(clock.now(), &mut sink).unwrap();
        assert!(app.state().meal(MealKind::Breakfast).eaten);
        assert!(report.reading.carbs == 0.0, "nothing else eaten before lunch");
    }

    let lunch = app.step(clock.now(), &mut sink).unwrap();
    assert_eq!(lunch.rule(), Some(Rule::Meal(MealKind::Lunch)));
    assert!(!app.state().meal(MealKind::Breakfast).eaten);
    assert!(app.state().meal(MealKind::Lunch).eaten);
}

#[test]
fn missed_draws_ramp_then_reset() {
    let start = at(12, 0);
    let clock = SimulatedClock::new(start);
    let mut app = make_app(120.0, ScriptedRandom::with_draws(&[0.99; 6]), start);
    let mut sink = RecordingPublisher::new();

    let mut last = app.state().meal(MealKind::Lunch).probability;
    for _ in 0..6 {
        let report = app.step(clock.now(), &mut sink).unwrap();
        assert!(matches!(report.action, Some(Action::MealDeferred { .. })));
        let p = app.state().meal(MealKind::Lunch).probability;
        assert!(p > last);
        last = p;
        clock.advance(TimeDelta::minutes(5));
    }
    assert!(!app.state().meal(MealKind::Lunch).eaten);
}

#[test]
fn correction_expires_after_ninety_minutes() {
    let start = at(3, 0);
    let clock = SimulatedClock::new(start);
    let mut app = make_app(320.0, ScriptedRandom::never_eat(), start);
    let mut sink = RecordingPublisher::new();

    let mut expired_at = None;
    for _ in 0..24 {
        let now = clock.now();
        let report = app.step(now, &mut sink).unwrap();
        if report.action == Some(Action::CorrectionExpired) {
            expired_at = Some(now);
            break;
        }
        clock.advance(TimeDelta::minutes(5));
    }

    assert_eq!(expired_at, Some(start + TimeDelta::minutes(95)));
    assert!(!app.state().correction_given);
    assert_eq!(sink.total_insulin(), 5.0);
}

// ── Whole-day run ─────────────────────────────────────────────

#[test]
fn seeded_day_publishes_one_reading_per_step() {
    let start = at(0, 0);
    let clock = SimulatedClock::new(start);
    let mut app = make_app(120.0, SeededDice::from_seed(2024), start);
    let mut sink = RecordingPublisher::new();

    for _ in 0..288 {
        app.step(clock.now(), &mut sink).unwrap();
        clock.advance(TimeDelta::minutes(5));
    }

    assert_eq!(sink.readings.len(), 288);
    assert_eq!(app.step_count(), 288);
    for pair in sink.readings.windows(2) {
        assert_eq!(pair[1].timestamp - pair[0].timestamp, TimeDelta::minutes(5));
    }
    for r in &sink.readings {
        let plausible = r.carbs == 0.0 || r.carbs == 15.0 || (15.0..=100.0).contains(&r.carbs);
        assert!(plausible, "unexpected carb amount {}", r.carbs);
        assert_eq!(r.patient_id, "patient");
    }
}

#[test]
fn same_seed_same_day() {
    let run = |seed| {
        let start = at(6, 0);
        let clock = SimulatedClock::new(start);
        let mut app = make_app(120.0, SeededDice::from_seed(seed), start);
        let mut sink = RecordingPublisher::new();
        for _ in 0..200 {
            app.step(clock.now(), &mut sink).unwrap();
            clock.advance(TimeDelta::minutes(5));
        }
        sink.readings
    };
    assert_eq!(run(11), run(11));
}
