//! Meal windows.
//!
//! Four daily windows in which the virtual patient may eat.  Inside a
//! window the chance of eating on a given step starts at a base value and
//! ramps linearly, so a meal becomes near certain before the window closes.
//!
//! ```text
//!   07:30─09:30   12:00─14:00   17:30─20:00   21:30─22:00
//!   breakfast     lunch         dinner        snack
//! ```
//!
//! Entering a window clears the eaten flag of the window before it (the
//! snack precedes breakfast), so a window re-arms only once its successor
//! has opened.

use core::fmt;

use chrono::{NaiveTime, Timelike};
use serde::Serialize;

/// The four daily meal slots, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum MealKind {
    Breakfast = 0,
    Lunch = 1,
    Dinner = 2,
    Snack = 3,
}

impl MealKind {
    pub const COUNT: usize = 4;

    pub const ALL: [Self; Self::COUNT] = [Self::Breakfast, Self::Lunch, Self::Dinner, Self::Snack];

    /// The window whose eaten flag is cleared when this one opens.
    pub const fn predecessor(self) -> Self {
        match self {
            Self::Breakfast => Self::Snack,
            Self::Lunch => Self::Breakfast,
            Self::Dinner => Self::Lunch,
            Self::Snack => Self::Dinner,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
        }
    }
}

impl fmt::Display for MealKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Seconds from midnight for `h:m`.
const fn hm(h: u32, m: u32) -> u32 {
    (h * 60 + m) * 60
}

/// One meal window and its eating behaviour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MealWindow {
    pub kind: MealKind,
    /// Opening time, seconds from midnight (inclusive).
    pub opens: u32,
    /// Closing time, seconds from midnight (inclusive).
    pub closes: u32,
    /// Smallest meal in grams.
    pub carbs_min: u32,
    /// Largest meal in grams.
    pub carbs_max: u32,
    /// Eating probability on entering the window and after each meal.
    pub base_probability: f64,
    /// Probability added over `ramp_minutes` of missed draws.
    pub ramp: f64,
    pub ramp_minutes: u32,
}

impl MealWindow {
    pub const fn standard(kind: MealKind) -> Self {
        match kind {
            MealKind::Breakfast => Self {
                kind,
                opens: hm(7, 30),
                closes: hm(9, 30),
                carbs_min: 30,
                carbs_max: 50,
                base_probability: 0.1,
                ramp: 0.8,
                ramp_minutes: 120,
            },
            MealKind::Lunch => Self {
                kind,
                opens: hm(12, 0),
                closes: hm(14, 0),
                carbs_min: 50,
                carbs_max: 80,
                base_probability: 0.1,
                ramp: 0.8,
                ramp_minutes: 120,
            },
            // The ramp spans 180 minutes although the window is 150 wide,
            // so dinner tops out just under 0.9.
            MealKind::Dinner => Self {
                kind,
                opens: hm(17, 30),
                closes: hm(20, 0),
                carbs_min: 40,
                carbs_max: 100,
                base_probability: 0.2,
                ramp: 0.7,
                ramp_minutes: 180,
            },
            MealKind::Snack => Self {
                kind,
                opens: hm(21, 30),
                closes: hm(22, 0),
                carbs_min: 15,
                carbs_max: 30,
                base_probability: 0.05,
                ramp: 0.15,
                ramp_minutes: 30,
            },
        }
    }

    /// Whether `time` falls inside the window, both ends inclusive.
    pub fn contains(&self, time: NaiveTime) -> bool {
        let secs = time.num_seconds_from_midnight();
        self.opens <= secs && secs <= self.closes
    }

    /// Probability added per missed step of `step_minutes`.
    pub fn increment(&self, step_minutes: u32) -> f64 {
        self.ramp / (f64::from(self.ramp_minutes) / f64::from(step_minutes))
    }
}

/// The standard daily windows, indexed by [`MealKind::index`].
pub const fn standard_windows() -> [MealWindow; MealKind::COUNT] {
    [
        MealWindow::standard(MealKind::Breakfast),
        MealWindow::standard(MealKind::Lunch),
        MealWindow::standard(MealKind::Dinner),
        MealWindow::standard(MealKind::Snack),
    ]
}
