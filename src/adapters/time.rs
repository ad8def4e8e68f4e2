//! Clock adapters.
//!
//! - [`SystemClock`]: host wall clock, shifted into the simulation's fixed
//!   zone.  Used for real-time runs.
//! - [`SimulatedClock`]: a shared, explicitly advanced clock for
//!   accelerated runs and tests.  Cheap to share with the purge threads
//!   behind an `Arc`.

use std::sync::{Mutex, PoisonError};

use chrono::{FixedOffset, TimeDelta, Utc};

use crate::app::ports::ClockPort;
use crate::clock::{Timestamp, mountain_standard};

/// Wall clock in a fixed-offset zone.
pub struct SystemClock {
    zone: FixedOffset,
}

impl SystemClock {
    pub fn new(zone: FixedOffset) -> Self {
        Self { zone }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(mountain_standard())
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now().with_timezone(&self.zone)
    }
}

/// A clock that only moves when told to.
pub struct SimulatedClock {
    now: Mutex<Timestamp>,
}

impl SimulatedClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward by `delta`.  Returns the new time.
    pub fn advance(&self, delta: TimeDelta) -> Timestamp {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now = *now + delta;
        *now
    }

    /// Jump to an absolute instant.
    pub fn set(&self, at: Timestamp) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = at;
    }
}

impl ClockPort for SimulatedClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn simulated_clock_moves_only_when_advanced() {
        let start = mountain_standard()
            .with_ymd_and_hms(2024, 5, 1, 23, 58, 0)
            .unwrap();
        let clock = SimulatedClock::new(start);
        assert_eq!(clock.now(), start);

        let next = clock.advance(TimeDelta::minutes(5));
        assert_eq!(clock.now(), next);
        assert_eq!(
            next,
            mountain_standard()
                .with_ymd_and_hms(2024, 5, 2, 0, 3, 0)
                .unwrap()
        );

        clock.set(start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn system_clock_reports_in_its_zone() {
        let clock = SystemClock::default();
        assert_eq!(clock.now().offset().local_minus_utc(), -7 * 3600);
    }
}
