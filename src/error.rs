//! Unified error types for the simulator.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! start-up path and the step loop's error handling uniform.  All variants
//! are `Copy` so they can be passed around without allocation.

use core::fmt;

use crate::pump::policy::ScheduleKind;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the core funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The pump settings text could not be parsed.
    Parse(ParseError),
    /// A policy lookup hit an empty schedule.
    Configuration(ConfigurationError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "parse: {e}"),
            Self::Configuration(e) => write!(f, "configuration: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Settings parse errors
// ---------------------------------------------------------------------------

/// A malformed pump settings document.  `line` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub const fn new(line: usize, kind: ParseErrorKind) -> Self {
        Self { line, kind }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A non-numeric line that is not `ItC`, `Basal` or `Correction`.
    UnknownSection,
    /// The same section label appeared twice.
    DuplicateSection,
    /// A data row before any section label.
    RowOutsideSection,
    /// Wrong number of comma-separated fields for the section.
    FieldCount { expected: usize, found: usize },
    /// A field is not a number.
    InvalidNumber,
    /// Hour, minute or second out of range.
    InvalidTime,
    /// The first row of a section is not `0,0,0`.
    MissingMidnightDefault,
    /// Rows are not strictly ascending by time of day.
    OutOfOrder,
    /// More rows than a schedule can hold.
    TooManySegments,
    /// Insulin-to-carb or correction ratio is zero or negative.
    NonPositiveRatio,
    /// Basal rate or deadband is negative.
    NegativeValue,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSection => write!(f, "unknown section label"),
            Self::DuplicateSection => write!(f, "duplicate section label"),
            Self::RowOutsideSection => write!(f, "row appears before any section label"),
            Self::FieldCount { expected, found } => {
                write!(f, "expected {expected} fields, found {found}")
            }
            Self::InvalidNumber => write!(f, "invalid number"),
            Self::InvalidTime => write!(f, "invalid time of day"),
            Self::MissingMidnightDefault => write!(f, "first row must start at 0,0,0"),
            Self::OutOfOrder => write!(f, "rows must be strictly ascending by time"),
            Self::TooManySegments => write!(f, "too many schedule segments"),
            Self::NonPositiveRatio => write!(f, "ratio must be greater than zero"),
            Self::NegativeValue => write!(f, "value must not be negative"),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

impl std::error::Error for ParseError {}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Policy lookups on a table that was never loaded.  Fatal: a service built
/// from a complete table can never produce it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationError {
    EmptySchedule(ScheduleKind),
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySchedule(kind) => write!(f, "{kind} schedule is empty"),
        }
    }
}

impl std::error::Error for ConfigurationError {}

impl From<ConfigurationError> for Error {
    fn from(e: ConfigurationError) -> Self {
        Self::Configuration(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
