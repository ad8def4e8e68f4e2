//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) hands one [`Reading`] per
//! step to the [`TelemetryPublisher`](super::ports::TelemetryPublisher)
//! port.  Adapters on the other side decide what to do with it: log it,
//! write JSON lines, or forward it to a broker.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::clock::{Timestamp, format_timestamp};
use crate::control::{Action, Rule};

/// The per-step telemetry record.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub patient_id: String,
    /// Glucose at the start of the step, before the update (mg/dL).
    pub glucose: f64,
    /// Insulin given this step (U), 0 if none.
    pub insulin: f64,
    /// Carbohydrate eaten this step (g), 0 if none.
    pub carbs: f64,
    pub timestamp: Timestamp,
}

/// Wire body for one reading, keyed under the patient id.
#[derive(Serialize)]
struct Payload<'a> {
    #[serde(rename = "Glucose")]
    glucose: f64,
    #[serde(rename = "Insulin")]
    insulin: f64,
    #[serde(rename = "Carbs")]
    carbs: f64,
    #[serde(rename = "Date")]
    date: &'a str,
}

impl Reading {
    /// Timestamp rendered as `YYYY-MM-DD HH:MM:SS`.
    pub fn date(&self) -> String {
        format_timestamp(&self.timestamp)
    }

    /// `[{"<patient_id>": {"Glucose": .., "Insulin": .., "Carbs": .., "Date": ".."}}]`
    pub fn to_payload_json(&self) -> serde_json::Result<String> {
        let date = self.date();
        let body = BTreeMap::from([(
            self.patient_id.as_str(),
            Payload {
                glucose: self.glucose,
                insulin: self.insulin,
                carbs: self.carbs,
                date: &date,
            },
        )]);
        serde_json::to_string(&[body])
    }
}

/// Everything one step produced, for callers that want more than the
/// published reading.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub reading: Reading,
    /// Action the controller took, if any rule fired.
    pub action: Option<Action>,
    /// Glucose after this step's update.
    pub glucose_after: f64,
}

impl StepReport {
    pub fn rule(&self) -> Option<Rule> {
        self.action.as_ref().map(Action::rule)
    }
}
