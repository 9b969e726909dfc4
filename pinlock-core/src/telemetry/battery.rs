//! Voltage to charge mapping

use crate::config::BatteryCalibration;

/// Charge percentage for a pack voltage
///
/// Linear within each of the three calibrated bands, so the result is
/// monotonic in `voltage`. Clamped to [0, 100].
pub fn battery_percentage(voltage: f32, cal: &BatteryCalibration) -> f32 {
    if voltage.is_nan() || voltage <= cal.empty_v {
        return 0.0;
    }
    if voltage >= cal.full_v {
        return 100.0;
    }

    let (v0, v1, p0, p1) = if voltage < cal.low_knee_v {
        (cal.empty_v, cal.low_knee_v, 0.0, cal.low_knee_percent)
    } else if voltage < cal.high_knee_v {
        (cal.low_knee_v, cal.high_knee_v, cal.low_knee_percent, cal.high_knee_percent)
    } else {
        (cal.high_knee_v, cal.full_v, cal.high_knee_percent, 100.0)
    };

    let percent = p0 + (voltage - v0) / (v1 - v0) * (p1 - p0);
    percent.clamp(0.0, 100.0)
}
