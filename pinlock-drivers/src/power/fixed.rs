//! Fixed-reading stand-in for boards without a power monitor fitted

use pinlock_core::telemetry::PowerSample;
use pinlock_core::traits::{PowerSensor, SensorError};

/// Power sensor that always returns the same sample
#[derive(Debug, Clone, Copy)]
pub struct FixedPowerSensor {
    sample: PowerSample,
}

impl FixedPowerSensor {
    pub const fn new(sample: PowerSample) -> Self {
        Self { sample }
    }

    /// A resting pack at `voltage`, no current flowing
    pub const fn resting(voltage: f32) -> Self {
        Self::new(PowerSample {
            shunt_voltage_v: 0.0,
            bus_voltage_v: voltage,
            current_a: 0.0,
            power_w: 0.0,
        })
    }

    pub fn set_sample(&mut self, sample: PowerSample) {
        self.sample = sample;
    }
}

impl Default for FixedPowerSensor {
    fn default() -> Self {
        Self::resting(12.0)
    }
}

impl PowerSensor for FixedPowerSensor {
    fn sample(&mut self) -> Result<PowerSample, SensorError> {
        Ok(self.sample)
    }
}
