//! Integration tests for the dose ledger and its background purge.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use chrono::TimeDelta;
use glucosim::adapters::time::SimulatedClock;
use glucosim::ledger::DoseLedger;

use crate::mock_ports::at;

fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    condition()
}

#[test]
fn background_purge_follows_the_shared_clock() {
    let start = at(8, 0);
    let clock = Arc::new(SimulatedClock::new(start));
    let mut ledger = DoseLedger::new();
    ledger.record_dose(start, 4.0);
    ledger.record_meal(start, 45.0);

    ledger
        .start_purge(Arc::clone(&clock), Duration::from_millis(10))
        .unwrap();
    assert!(ledger.is_purging());

    // Nothing is due yet.
    thread::sleep(Duration::from_millis(50));
    assert_eq!(ledger.insulin().len(), 1);
    assert_eq!(ledger.carbs().len(), 1);

    // Past the meal window only.
    clock.advance(TimeDelta::minutes(61));
    assert!(wait_for(|| ledger.carbs().is_empty()));
    assert_eq!(ledger.insulin().len(), 1);

    // Past the dose window too.
    clock.advance(TimeDelta::minutes(30));
    assert!(wait_for(|| ledger.insulin().is_empty()));

    ledger.stop_purge();
    assert!(!ledger.is_purging());
}

#[test]
fn totals_ignore_purge_lag() {
    let start = at(8, 0);
    let ledger = DoseLedger::new();
    ledger.record_dose(start, 2.0);
    ledger.record_dose(start + TimeDelta::minutes(30), 1.0);

    // No purge has run, yet the expired dose no longer counts.
    let later = start + TimeDelta::minutes(100);
    assert_eq!(ledger.insulin().len(), 2);
    assert_eq!(ledger.total_insulin_on_board(later), 1.0);
}

#[test]
fn recording_while_purging_loses_nothing() {
    let start = at(0, 0);
    let clock = Arc::new(SimulatedClock::new(start));
    let mut ledger = DoseLedger::new();
    ledger
        .start_purge(Arc::clone(&clock), Duration::from_millis(1))
        .unwrap();

    for i in 0..500 {
        ledger.record_dose(start + TimeDelta::minutes(i), 0.5);
    }

    assert_eq!(ledger.insulin().len(), 500);
    ledger.stop_purge();
}

#[test]
fn start_purge_twice_is_a_no_op() {
    let clock = Arc::new(SimulatedClock::new(at(0, 0)));
    let mut ledger = DoseLedger::new();
    ledger
        .start_purge(Arc::clone(&clock), Duration::from_millis(10))
        .unwrap();
    ledger
        .start_purge(Arc::clone(&clock), Duration::from_millis(10))
        .unwrap();
    assert!(ledger.is_purging());
    ledger.stop_purge();
}
