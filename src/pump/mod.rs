//! Insulin pump programme: time-of-day schedules and their text store.
//!
//! The [`PolicyTable`] answers "what ratio / rate / correction applies right
//! now"; [`settings`] reads and writes the plain-text format the pump
//! settings are stored in.

pub mod policy;
pub mod settings;

pub use policy::{CorrectionSetting, PolicyTable, Schedule, ScheduleKind, Segment};
