//! Lock configuration compiled from lock.toml

use pinlock_core::config::{BatteryCalibration, ChargeThresholds, LockConfig};
use pinlock_core::pin::Pin;

mod generated {
    include!(concat!(env!("OUT_DIR"), "/lock_config.rs"));
}

pub use generated::PRODUCT_NAME;
use generated::*;

/// The configuration this firmware was built with
pub fn lock_config() -> LockConfig {
    LockConfig {
        pin: Pin::new(PIN_DIGITS),
        max_attempts: MAX_ATTEMPTS,
        lockout_duration_ms: LOCKOUT_DURATION_MS,
        key_debounce_ms: KEY_DEBOUNCE_MS,
        charge_debounce_ms: CHARGE_DEBOUNCE_MS,
        voltage_smoothing: VOLTAGE_SMOOTHING,
        telemetry_interval_ms: TELEMETRY_INTERVAL_MS,
        loop_period_ms: LOOP_PERIOD_MS,
        entry_pause_ms: ENTRY_PAUSE_MS,
        result_screen_ms: RESULT_SCREEN_MS,
        welcome_ms: WELCOME_MS,
        battery: BatteryCalibration {
            empty_v: BATTERY_EMPTY_V,
            low_knee_v: BATTERY_LOW_KNEE_V,
            high_knee_v: BATTERY_HIGH_KNEE_V,
            full_v: BATTERY_FULL_V,
            low_knee_percent: BATTERY_LOW_KNEE_PERCENT,
            high_knee_percent: BATTERY_HIGH_KNEE_PERCENT,
        },
        charge: ChargeThresholds::default(),
    }
}
