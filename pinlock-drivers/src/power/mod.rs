//! Power sensor drivers

mod fixed;
mod ina219;

pub use fixed::FixedPowerSensor;
pub use ina219::{Ina219, DEFAULT_ADDRESS as INA219_DEFAULT_ADDRESS};
