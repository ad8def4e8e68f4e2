//! Pump settings text format.
//!
//! ```text
//! ItC
//! 0,0,0,10
//! 11,0,0,12
//! Basal
//! 0,0,0,0.8
//! Correction
//! 0,0,0,40,120,30
//! ```
//!
//! A section label on its own line, followed by `hour,minute,second,value..`
//! rows.  Correction rows carry ratio, target and deadband.  Blank lines and
//! lines starting with `#` are ignored.

use chrono::{NaiveTime, Timelike};

use crate::error::{ParseError, ParseErrorKind};

use super::policy::{CorrectionSetting, PolicyTable, ScheduleKind, Segment};

/// Parse a settings document into a [`PolicyTable`].
///
/// Sections that never appear stay empty; completeness is checked by
/// [`PolicyTable::ensure_complete`].
pub fn parse(source: &str) -> Result<PolicyTable, ParseError> {
    let mut table = PolicyTable::new();
    let mut section: Option<ScheduleKind> = None;
    let mut seen = [false; ScheduleKind::ALL.len()];

    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if !line.contains(',') {
            let kind = ScheduleKind::from_label(line)
                .ok_or(ParseError::new(line_no, ParseErrorKind::UnknownSection))?;
            if seen[kind as usize] {
                return Err(ParseError::new(line_no, ParseErrorKind::DuplicateSection));
            }
            seen[kind as usize] = true;
            section = Some(kind);
            continue;
        }

        let kind = section.ok_or(ParseError::new(line_no, ParseErrorKind::RowOutsideSection))?;
        parse_row(&mut table, kind, line).map_err(|kind| ParseError::new(line_no, kind))?;
    }

    Ok(table)
}

fn parse_row(table: &mut PolicyTable, kind: ScheduleKind, line: &str) -> Result<(), ParseErrorKind> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let expected = 3 + kind.value_count();
    if fields.len() != expected {
        return Err(ParseErrorKind::FieldCount {
            expected,
            found: fields.len(),
        });
    }

    let start = parse_time(&fields[..3])?;
    let values = fields[3..]
        .iter()
        .map(|f| parse_value(f))
        .collect::<Result<Vec<f64>, _>>()?;

    match kind {
        ScheduleKind::InsulinToCarb => {
            let ratio = values[0];
            if ratio <= 0.0 {
                return Err(ParseErrorKind::NonPositiveRatio);
            }
            table.insulin_to_carb.push(start, ratio)
        }
        ScheduleKind::Basal => {
            let rate = values[0];
            if rate < 0.0 {
                return Err(ParseErrorKind::NegativeValue);
            }
            table.basal.push(start, rate)
        }
        ScheduleKind::Correction => {
            let setting = CorrectionSetting {
                ratio: values[0],
                target: values[1],
                deadband: values[2],
            };
            if setting.ratio <= 0.0 {
                return Err(ParseErrorKind::NonPositiveRatio);
            }
            if setting.deadband < 0.0 {
                return Err(ParseErrorKind::NegativeValue);
            }
            table.correction.push(start, setting)
        }
    }
}

fn parse_time(fields: &[&str]) -> Result<NaiveTime, ParseErrorKind> {
    let mut hms = [0u32; 3];
    for (slot, field) in hms.iter_mut().zip(fields) {
        *slot = field.parse().map_err(|_| ParseErrorKind::InvalidNumber)?;
    }
    NaiveTime::from_hms_opt(hms[0], hms[1], hms[2]).ok_or(ParseErrorKind::InvalidTime)
}

fn parse_value(field: &str) -> Result<f64, ParseErrorKind> {
    match field.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ParseErrorKind::InvalidNumber),
    }
}

/// Render a table back into the settings format.  Parsing the output yields
/// an equal table.
pub fn render(table: &PolicyTable) -> String {
    let mut out = String::new();

    out.push_str(ScheduleKind::InsulinToCarb.label());
    out.push('\n');
    for seg in table.insulin_to_carb.segments() {
        push_row(&mut out, seg, &[seg.value]);
    }

    out.push_str(ScheduleKind::Basal.label());
    out.push('\n');
    for seg in table.basal.segments() {
        push_row(&mut out, seg, &[seg.value]);
    }

    out.push_str(ScheduleKind::Correction.label());
    out.push('\n');
    for seg in table.correction.segments() {
        let c = seg.value;
        push_row(&mut out, seg, &[c.ratio, c.target, c.deadband]);
    }

    out
}

fn push_row<T>(out: &mut String, seg: &Segment<T>, values: &[f64]) {
    out.push_str(&format!(
        "{},{},{}",
        seg.start.hour(),
        seg.start.minute(),
        seg.start.second()
    ));
    for v in values {
        out.push_str(&format!(",{v}"));
    }
    out.push('\n');
}

impl PolicyTable {
    /// Parse a settings document.  See [`parse`].
    pub fn load(source: &str) -> Result<Self, ParseError> {
        parse(source)
    }

    /// Render into the settings format.  See [`render`].
    pub fn render(&self) -> String {
        render(self)
    }
}
