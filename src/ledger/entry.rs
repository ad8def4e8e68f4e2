//! Ledger entries: insulin doses and meals.
//!
//! Both are immutable once recorded and stay fully "on board" from their
//! start time until their end time, after which they contribute nothing.

use chrono::TimeDelta;
use serde::Serialize;

use crate::clock::Timestamp;

/// How long an insulin dose stays on board (minutes).
pub const DOSE_DURATION_MINUTES: i64 = 90;

/// How long a meal's carbohydrate stays on board (minutes).
pub const MEAL_DURATION_MINUTES: i64 = 60;

/// Anything with a fixed activity window and a quantity.
pub trait Expiring {
    fn end_time(&self) -> Timestamp;

    /// Units for a dose, grams for a meal.
    fn quantity(&self) -> f64;

    /// Still on board at `now` (the end instant itself counts).
    fn is_active(&self, now: Timestamp) -> bool {
        now <= self.end_time()
    }
}

/// One insulin injection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dose {
    start_time: Timestamp,
    end_time: Timestamp,
    units: f64,
}

impl Dose {
    pub fn new(start_time: Timestamp, units: f64) -> Self {
        Self {
            start_time,
            end_time: start_time + TimeDelta::minutes(DOSE_DURATION_MINUTES),
            units,
        }
    }

    pub fn start_time(&self) -> Timestamp {
        self.start_time
    }

    pub fn units(&self) -> f64 {
        self.units
    }
}

impl Expiring for Dose {
    fn end_time(&self) -> Timestamp {
        self.end_time
    }

    fn quantity(&self) -> f64 {
        self.units
    }
}

/// One carbohydrate intake.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Meal {
    start_time: Timestamp,
    end_time: Timestamp,
    carbs: f64,
}

impl Meal {
    pub fn new(start_time: Timestamp, carbs: f64) -> Self {
        Self {
            start_time,
            end_time: start_time + TimeDelta::minutes(MEAL_DURATION_MINUTES),
            carbs,
        }
    }

    pub fn start_time(&self) -> Timestamp {
        self.start_time
    }

    pub fn carbs(&self) -> f64 {
        self.carbs
    }
}

impl Expiring for Meal {
    fn end_time(&self) -> Timestamp {
        self.end_time
    }

    fn quantity(&self) -> f64 {
        self.carbs
    }
}
