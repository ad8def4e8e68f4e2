//! Time-of-day pump policy.
//!
//! ```text
//!   00:00        06:00            11:00                    00:00
//!     │ segment 0  │   segment 1    │        segment 2        │
//!     └────────────┴────────────────┴─────────────────────────┘
//! ```
//!
//! Each schedule is an ordered list of segments.  A segment takes effect at
//! its start time and holds until the next segment starts; the last segment
//! holds until midnight.  Segment 0 always starts at midnight.

use core::fmt;

use chrono::{NaiveTime, Timelike};
use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, ParseErrorKind};

/// Maximum number of segments per schedule (one per half hour).
pub const MAX_SEGMENTS: usize = 48;

/// The three schedules a pump is programmed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScheduleKind {
    InsulinToCarb,
    Basal,
    Correction,
}

impl ScheduleKind {
    /// All kinds, in the order they appear in a settings document.
    pub const ALL: [Self; 3] = [Self::InsulinToCarb, Self::Basal, Self::Correction];

    /// Section label used by the settings store.
    pub const fn label(self) -> &'static str {
        match self {
            Self::InsulinToCarb => "ItC",
            Self::Basal => "Basal",
            Self::Correction => "Correction",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.label() == label)
    }

    /// Number of values carried after the `hour,minute,second` prefix.
    pub const fn value_count(self) -> usize {
        match self {
            Self::InsulinToCarb | Self::Basal => 1,
            Self::Correction => 3,
        }
    }
}

impl fmt::Display for ScheduleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Correction parameters in effect for one segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrectionSetting {
    /// mg/dL lowered by one unit of insulin.
    pub ratio: f64,
    /// Glucose the correction aims for (mg/dL).
    pub target: f64,
    /// No correction while `|glucose - target| <= deadband`.
    pub deadband: f64,
}

/// One row of a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment<T> {
    pub start: NaiveTime,
    pub value: T,
}

/// An ordered, fixed-capacity time-of-day schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule<T> {
    segments: Vec<Segment<T>, MAX_SEGMENTS>,
}

impl<T: Copy> Schedule<T> {
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Append a segment.  The first segment must start at midnight and each
    /// subsequent one strictly after its predecessor.
    pub fn push(&mut self, start: NaiveTime, value: T) -> Result<(), ParseErrorKind> {
        match self.segments.last() {
            None if start.num_seconds_from_midnight() != 0 => {
                return Err(ParseErrorKind::MissingMidnightDefault);
            }
            Some(last) if start <= last.start => return Err(ParseErrorKind::OutOfOrder),
            _ => {}
        }
        self.segments
            .push(Segment { start, value })
            .map_err(|_| ParseErrorKind::TooManySegments)
    }

    /// Value in effect at `time`: the latest segment starting at or before
    /// it.  `None` for an empty schedule.
    pub fn at(&self, time: NaiveTime) -> Option<T> {
        let first = self.segments.first()?;
        let current = self
            .segments
            .iter()
            .take_while(|s| s.start <= time)
            .last()
            .unwrap_or(first);
        Some(current.value)
    }

    pub fn segments(&self) -> &[Segment<T>] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl<T: Copy> Default for Schedule<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The complete pump programme: insulin-to-carb, basal and correction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicyTable {
    pub(crate) insulin_to_carb: Schedule<f64>,
    pub(crate) basal: Schedule<f64>,
    pub(crate) correction: Schedule<CorrectionSetting>,
}

impl PolicyTable {
    /// An empty table.  Every lookup fails until segments are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grams of carbohydrate covered by one unit at `time`.
    pub fn insulin_to_carb(&self, time: NaiveTime) -> Result<f64, ConfigurationError> {
        self.insulin_to_carb
            .at(time)
            .ok_or(ConfigurationError::EmptySchedule(ScheduleKind::InsulinToCarb))
    }

    /// Basal rate (U/h) at `time`.
    pub fn basal(&self, time: NaiveTime) -> Result<f64, ConfigurationError> {
        self.basal
            .at(time)
            .ok_or(ConfigurationError::EmptySchedule(ScheduleKind::Basal))
    }

    /// Correction parameters at `time`.
    pub fn correction(&self, time: NaiveTime) -> Result<CorrectionSetting, ConfigurationError> {
        self.correction
            .at(time)
            .ok_or(ConfigurationError::EmptySchedule(ScheduleKind::Correction))
    }

    /// Fails on the first schedule with no segments.
    pub fn ensure_complete(&self) -> Result<(), ConfigurationError> {
        for kind in ScheduleKind::ALL {
            if self.segment_count(kind) == 0 {
                return Err(ConfigurationError::EmptySchedule(kind));
            }
        }
        Ok(())
    }

    pub fn segment_count(&self, kind: ScheduleKind) -> usize {
        match kind {
            ScheduleKind::InsulinToCarb => self.insulin_to_carb.len(),
            ScheduleKind::Basal => self.basal.len(),
            ScheduleKind::Correction => self.correction.len(),
        }
    }

    pub fn insulin_to_carb_schedule(&self) -> &Schedule<f64> {
        &self.insulin_to_carb
    }

    pub fn basal_schedule(&self) -> &Schedule<f64> {
        &self.basal
    }

    pub fn correction_schedule(&self) -> &Schedule<CorrectionSetting> {
        &self.correction
    }
}
