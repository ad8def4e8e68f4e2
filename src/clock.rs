//! Simulation time base.
//!
//! All simulated instants carry a fixed UTC offset (no DST), so a run is
//! reproducible regardless of the host's time zone.

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// A local instant in the simulation's fixed-offset zone.
pub type Timestamp = DateTime<FixedOffset>;

/// Format used in telemetry readings.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default zone offset: UTC-7, no daylight saving.
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = -7;

/// Fixed zone `hours` east of UTC.  `None` outside ±23 h.
pub fn fixed_zone(hours: i32) -> Option<FixedOffset> {
    if !(-23..=23).contains(&hours) {
        return None;
    }
    FixedOffset::east_opt(hours * 3600)
}

/// The default UTC-7 zone.
pub fn mountain_standard() -> FixedOffset {
    fixed_zone(DEFAULT_UTC_OFFSET_HOURS).unwrap_or_else(|| Utc.fix())
}

/// Render a timestamp the way readings carry it.
pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}
