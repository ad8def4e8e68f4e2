//! Correction dose calculation.

use crate::pump::CorrectionSetting;

/// Units needed to bring `glucose` to the setting's target.
///
/// Zero inside the deadband.  Negative below it, which reduces a meal bolus
/// the correction is added to.
pub fn correction_dose(glucose: f64, setting: &CorrectionSetting) -> f64 {
    let difference = glucose - setting.target;
    if difference.abs() > setting.deadband {
        difference / setting.ratio
    } else {
        0.0
    }
}
