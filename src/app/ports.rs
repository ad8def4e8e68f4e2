//! Port traits: the hexagonal boundary between the simulation core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (clock, randomness, telemetry, config and settings
//! stores) implement these traits.  The [`AppService`](super::service::AppService)
//! consumes them via generics, so the core never reads the wall clock,
//! draws entropy or touches the filesystem directly.

use crate::clock::Timestamp;
use crate::config::SimConfig;
use crate::error::ParseError;
use crate::pump::PolicyTable;

use super::events::Reading;

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: time source → domain)
// ───────────────────────────────────────────────────────────────

/// Source of "now" in the simulation's fixed-offset zone.
///
/// Shared between the step loop and the purge threads, hence `&self`.
pub trait ClockPort {
    fn now(&self) -> Timestamp;
}

// ───────────────────────────────────────────────────────────────
// Random source port (driven adapter: entropy → domain)
// ───────────────────────────────────────────────────────────────

/// Draws used by the meal scheduler.
pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn uniform(&mut self) -> f64;

    /// Uniform integer gram amount in `[min, max]` (inclusive).
    fn carbs_between(&mut self, min: u32, max: u32) -> u32;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn uniform(&mut self) -> f64 {
        (**self).uniform()
    }

    fn carbs_between(&mut self, min: u32, max: u32) -> u32 {
        (**self).carbs_between(min, max)
    }
}

// ───────────────────────────────────────────────────────────────
// Telemetry port (driven adapter: domain → broker / log)
// ───────────────────────────────────────────────────────────────

/// Receives exactly one [`Reading`] per simulation step.
///
/// Delivery guarantees (retries, reconnects, offline queueing) belong to
/// the implementation; the core never learns whether a publish succeeded.
pub trait TelemetryPublisher {
    fn publish(&mut self, reading: &Reading);
}

impl<T: TelemetryPublisher + ?Sized> TelemetryPublisher for Box<T> {
    fn publish(&mut self, reading: &Reading) {
        (**self).publish(reading);
    }
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists the simulation configuration.
///
/// Implementations MUST validate before persisting and reject invalid
/// ranges with [`ConfigError::ValidationFailed`] rather than clamping.
pub trait ConfigPort {
    /// Load configuration.  [`ConfigError::NotFound`] if none is stored.
    fn load(&self) -> Result<SimConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SimConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Pump settings port (driven adapter: domain ↔ settings store)
// ───────────────────────────────────────────────────────────────

/// Loads and persists the pump's policy table.
pub trait SettingsPort {
    fn load_settings(&self) -> Result<PolicyTable, SettingsError>;

    fn save_settings(&self, table: &PolicyTable) -> Result<(), SettingsError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// No config stored yet.
    NotFound,
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

/// Errors from [`SettingsPort`] operations.
#[derive(Debug)]
pub enum SettingsError {
    /// The settings store does not exist.
    NotFound,
    /// Generic I/O error.
    IoError,
    /// The stored text is malformed.
    Parse(ParseError),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "pump settings not found"),
            Self::IoError => write!(f, "I/O error"),
            Self::Parse(e) => write!(f, "pump settings: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl std::error::Error for SettingsError {}

impl From<ParseError> for SettingsError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}
