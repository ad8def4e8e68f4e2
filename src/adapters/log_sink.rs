//! Log-based telemetry adapter.
//!
//! Implements [`TelemetryPublisher`] by writing each reading through the
//! `log` facade.  A broker adapter would implement the same trait.

use log::info;

use crate::app::events::Reading;
use crate::app::ports::TelemetryPublisher;

/// Adapter that logs every [`Reading`].
#[derive(Debug, Default)]
pub struct LogPublisher;

impl LogPublisher {
    pub fn new() -> Self {
        Self
    }
}

impl TelemetryPublisher for LogPublisher {
    fn publish(&mut self, reading: &Reading) {
        info!(
            "READING | {} | {} | glucose={:.1}mg/dL | insulin={:.2}U | carbs={:.0}g",
            reading.patient_id,
            reading.date(),
            reading.glucose,
            reading.insulin,
            reading.carbs,
        );
    }
}
