//! Power sensor trait

use crate::telemetry::PowerSample;

/// Errors from the power sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Bus transaction failed
    Bus,
    /// Sensor did not respond
    NotPresent,
    /// Reading out of the measurable range
    Overflow,
}

/// Battery voltage/current sensor
pub trait PowerSensor {
    /// Take one reading
    fn sample(&mut self) -> Result<PowerSample, SensorError>;
}

impl<T: PowerSensor + ?Sized> PowerSensor for &mut T {
    fn sample(&mut self) -> Result<PowerSample, SensorError> {
        (**self).sample()
    }
}
