//! JSON-lines telemetry adapter.
//!
//! Writes one broker payload per line to any [`Write`] (stdout, a file, a
//! pipe into an uploader).  Write failures are logged and dropped; the
//! simulation keeps stepping.

use std::io::Write;

use log::warn;

use crate::app::events::Reading;
use crate::app::ports::TelemetryPublisher;

pub struct JsonLinesPublisher<W: Write> {
    out: W,
    failures: u64,
}

impl<W: Write> JsonLinesPublisher<W> {
    pub fn new(out: W) -> Self {
        Self { out, failures: 0 }
    }

    /// Readings that could not be written.
    pub fn failures(&self) -> u64 {
        self.failures
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, reading: &Reading) -> std::io::Result<()> {
        let line = reading.to_payload_json()?;
        writeln!(self.out, "{line}")?;
        self.out.flush()
    }
}

impl<W: Write> TelemetryPublisher for JsonLinesPublisher<W> {
    fn publish(&mut self, reading: &Reading) {
        if let Err(e) = self.write_line(reading) {
            self.failures += 1;
            warn!("telemetry write failed ({e}), reading at {} dropped", reading.date());
        }
    }
}
