//! Configuration type definitions

use crate::pin::Pin;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest accepted attempt limit
///
/// 255 is the value of an erased attempt counter and is never a valid count.
pub const MAX_ATTEMPT_LIMIT: u8 = 254;

/// Voltage-to-charge mapping for the battery pack
///
/// Three linear bands: empty to low knee covers 0 to `low_knee_percent`,
/// low knee to high knee covers the middle, high knee to full covers the
/// rest up to 100%.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BatteryCalibration {
    /// Voltage reported as 0%
    pub empty_v: f32,
    /// Upper end of the lowest band
    pub low_knee_v: f32,
    /// Upper end of the middle band
    pub high_knee_v: f32,
    /// Voltage reported as 100%
    pub full_v: f32,
    /// Charge at `low_knee_v`
    pub low_knee_percent: f32,
    /// Charge at `high_knee_v`
    pub high_knee_percent: f32,
}

impl Default for BatteryCalibration {
    /// 3S lithium pack
    fn default() -> Self {
        Self {
            empty_v: 9.0,
            low_knee_v: 10.5,
            high_knee_v: 11.7,
            full_v: 12.6,
            low_knee_percent: 20.0,
            high_knee_percent: 80.0,
        }
    }
}

/// Current and shunt thresholds for charge detection
///
/// Negative current flows into the battery. A reading at or below either
/// charging threshold means charging; at or above either discharging
/// threshold means discharging. Anything in between keeps the last state.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChargeThresholds {
    /// Current at or below which the pack is charging (A)
    pub charging_current_a: f32,
    /// Current at or above which the pack is discharging (A)
    pub discharging_current_a: f32,
    /// Shunt voltage at or below which the pack is charging (V)
    pub charging_shunt_v: f32,
    /// Shunt voltage at or above which the pack is discharging (V)
    pub discharging_shunt_v: f32,
}

impl Default for ChargeThresholds {
    fn default() -> Self {
        Self {
            charging_current_a: -0.02,
            discharging_current_a: 0.02,
            charging_shunt_v: -0.01,
            discharging_shunt_v: 0.01,
        }
    }
}

/// Complete lock configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LockConfig {
    /// The correct PIN
    pub pin: Pin,
    /// Failed attempts that trigger a lockout
    pub max_attempts: u8,
    /// Lockout length (ms)
    pub lockout_duration_ms: u32,
    /// Minimum time between accepted key presses (ms)
    pub key_debounce_ms: u32,
    /// Time a disagreeing charge reading must persist before the state flips (ms)
    pub charge_debounce_ms: u32,
    /// Weight of a new voltage sample in the moving average (0, 1]
    pub voltage_smoothing: f32,
    /// Minimum time between power sensor reads (ms)
    pub telemetry_interval_ms: u32,
    /// Control loop period (ms)
    pub loop_period_ms: u32,
    /// Pause after the last digit before verifying (ms)
    pub entry_pause_ms: u32,
    /// How long the granted/denied screen stays up (ms)
    pub result_screen_ms: u32,
    /// How long the welcome screen stays up at boot (ms)
    pub welcome_ms: u32,
    /// Battery voltage mapping
    pub battery: BatteryCalibration,
    /// Charge detection thresholds
    pub charge: ChargeThresholds,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            pin: Pin::new([1, 9, 1, 1]),
            max_attempts: 5,
            lockout_duration_ms: 120_000,
            key_debounce_ms: 200,
            charge_debounce_ms: 1000,
            voltage_smoothing: 0.2,
            telemetry_interval_ms: 500,
            loop_period_ms: 50,
            entry_pause_ms: 500,
            result_screen_ms: 2000,
            welcome_ms: 3000,
            battery: BatteryCalibration::default(),
            charge: ChargeThresholds::default(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// PIN contains something other than decimal digits
    InvalidPin,
    /// Attempt limit is 0 or above [`MAX_ATTEMPT_LIMIT`]
    InvalidMaxAttempts,
    /// Lockout duration is zero
    InvalidLockoutDuration,
    /// Smoothing factor outside (0, 1]
    InvalidSmoothing,
    /// Battery bands are not strictly increasing
    InvalidBatteryCalibration,
    /// Charging thresholds are not below discharging thresholds
    InvalidChargeThresholds,
}

impl LockConfig {
    /// Check the configuration for values the lock logic cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.pin.is_valid() {
            return Err(ConfigError::InvalidPin);
        }
        if self.max_attempts == 0 || self.max_attempts > MAX_ATTEMPT_LIMIT {
            return Err(ConfigError::InvalidMaxAttempts);
        }
        if self.lockout_duration_ms == 0 {
            return Err(ConfigError::InvalidLockoutDuration);
        }
        let s = self.voltage_smoothing;
        if s.is_nan() || s <= 0.0 || s > 1.0 {
            return Err(ConfigError::InvalidSmoothing);
        }
        self.battery.validate()?;
        self.charge.validate()
    }
}

impl BatteryCalibration {
    /// Check that voltages and percentages increase across the bands
    pub fn validate(&self) -> Result<(), ConfigError> {
        let voltages_ok = self.empty_v < self.low_knee_v
            && self.low_knee_v < self.high_knee_v
            && self.high_knee_v < self.full_v;
        let percents_ok = 0.0 < self.low_knee_percent
            && self.low_knee_percent < self.high_knee_percent
            && self.high_knee_percent < 100.0;
        if voltages_ok && percents_ok {
            Ok(())
        } else {
            Err(ConfigError::InvalidBatteryCalibration)
        }
    }
}

impl ChargeThresholds {
    /// Check that the dead band between charging and discharging is not inverted
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.charging_current_a < self.discharging_current_a
            && self.charging_shunt_v < self.discharging_shunt_v
        {
            Ok(())
        } else {
            Err(ConfigError::InvalidChargeThresholds)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(LockConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_default_values() {
        let config = LockConfig::default();
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.lockout_duration_ms, 120_000);
        assert_eq!(config.key_debounce_ms, 200);
        assert_eq!(config.charge_debounce_ms, 1000);
        assert_eq!(config.pin, Pin::new([1, 9, 1, 1]));
    }

    #[test]
    fn test_invalid_max_attempts() {
        let mut config = LockConfig::default();
        config.max_attempts = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidMaxAttempts));
        config.max_attempts = 255;
        assert_eq!(config.validate(), Err(ConfigError::InvalidMaxAttempts));
        config.max_attempts = MAX_ATTEMPT_LIMIT;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_invalid_lockout_and_smoothing() {
        let mut config = LockConfig::default();
        config.lockout_duration_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidLockoutDuration));

        let mut config = LockConfig::default();
        config.voltage_smoothing = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidSmoothing));
        config.voltage_smoothing = 1.5;
        assert_eq!(config.validate(), Err(ConfigError::InvalidSmoothing));
        config.voltage_smoothing = f32::NAN;
        assert_eq!(config.validate(), Err(ConfigError::InvalidSmoothing));
    }

    #[test]
    fn test_invalid_pin() {
        let mut config = LockConfig::default();
        config.pin = Pin::new([1, 2, 3, 10]);
        assert_eq!(config.validate(), Err(ConfigError::InvalidPin));
    }

    #[test]
    fn test_invalid_battery_bands() {
        let mut config = LockConfig::default();
        config.battery.high_knee_v = 10.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidBatteryCalibration));

        let mut config = LockConfig::default();
        config.battery.low_knee_percent = 90.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidBatteryCalibration));
    }

    #[test]
    fn test_inverted_charge_thresholds() {
        let mut config = LockConfig::default();
        config.charge.charging_current_a = 0.05;
        assert_eq!(config.validate(), Err(ConfigError::InvalidChargeThresholds));
    }
}
