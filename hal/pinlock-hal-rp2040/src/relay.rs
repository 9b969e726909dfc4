//! Relay driver output

use embassy_rp::gpio::{Level, Output, Pin};
use embassy_rp::Peri;

/// Relay on an active-high GPIO
///
/// Starts de-energized.
pub struct RelayOutput<'d> {
    pin: Output<'d>,
}

impl<'d> RelayOutput<'d> {
    pub fn new(pin: Peri<'d, impl Pin>) -> Self {
        Self {
            pin: Output::new(pin, Level::Low),
        }
    }
}

impl pinlock_hal::OutputPin for RelayOutput<'_> {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}
