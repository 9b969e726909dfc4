//! Telemetry sampling

use pinlock_hal::Tick;

use super::battery::battery_percentage;
use crate::config::{BatteryCalibration, ChargeThresholds, LockConfig};
use crate::time::ticks_elapsed;

/// One raw reading from the power sensor
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerSample {
    /// Voltage across the shunt (V); negative while charging
    pub shunt_voltage_v: f32,
    /// Voltage on the load side of the shunt (V)
    pub bus_voltage_v: f32,
    /// Current (A); negative while charging
    pub current_a: f32,
    /// Power (W)
    pub power_w: f32,
}

impl PowerSample {
    /// Battery terminal voltage: bus plus shunt drop
    pub fn load_voltage_v(&self) -> f32 {
        self.bus_voltage_v + self.shunt_voltage_v
    }
}

/// Latest derived telemetry
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetrySnapshot {
    /// Unsmoothed terminal voltage of the latest sample (V)
    pub load_voltage_v: f32,
    /// Exponential moving average of the terminal voltage (V)
    pub smoothed_voltage_v: f32,
    pub current_a: f32,
    pub power_w: f32,
    /// Charge direction after hysteresis
    pub is_charging: bool,
    /// Charge percentage from the smoothed voltage
    pub battery_percent: f32,
}

/// Turns raw samples into a [`TelemetrySnapshot`]
#[derive(Debug, Clone)]
pub struct TelemetrySampler {
    smoothing: f32,
    charge_debounce_ms: u32,
    thresholds: ChargeThresholds,
    calibration: BatteryCalibration,
    snapshot: TelemetrySnapshot,
    last_charge_change: Tick,
    seeded: bool,
}

impl TelemetrySampler {
    pub fn new(config: &LockConfig) -> Self {
        Self {
            smoothing: config.voltage_smoothing,
            charge_debounce_ms: config.charge_debounce_ms,
            thresholds: config.charge,
            calibration: config.battery,
            snapshot: TelemetrySnapshot::default(),
            last_charge_change: 0,
            seeded: false,
        }
    }

    /// Fold a sample into the snapshot
    ///
    /// The first sample seeds the moving average so it does not ramp up
    /// from zero.
    pub fn update(&mut self, sample: PowerSample, now: Tick) -> &TelemetrySnapshot {
        let load = sample.load_voltage_v();
        let snap = &mut self.snapshot;

        snap.load_voltage_v = load;
        snap.current_a = sample.current_a;
        snap.power_w = sample.power_w;

        if self.seeded {
            snap.smoothed_voltage_v =
                snap.smoothed_voltage_v * (1.0 - self.smoothing) + load * self.smoothing;
        } else {
            snap.smoothed_voltage_v = load;
            self.last_charge_change = now;
            self.seeded = true;
        }

        let t = &self.thresholds;
        let reading = if sample.current_a <= t.charging_current_a
            || sample.shunt_voltage_v <= t.charging_shunt_v
        {
            true
        } else if sample.current_a >= t.discharging_current_a
            || sample.shunt_voltage_v >= t.discharging_shunt_v
        {
            false
        } else {
            snap.is_charging
        };

        if reading == snap.is_charging {
            self.last_charge_change = now;
        } else if ticks_elapsed(self.last_charge_change, now) > self.charge_debounce_ms {
            debug!("Charge state changed: charging={}", reading);
            snap.is_charging = reading;
            self.last_charge_change = now;
        }

        snap.battery_percent = battery_percentage(snap.smoothed_voltage_v, &self.calibration);
        &self.snapshot
    }

    pub fn snapshot(&self) -> &TelemetrySnapshot {
        &self.snapshot
    }

    /// Whether at least one sample has been taken
    pub fn is_seeded(&self) -> bool {
        self.seeded
    }
}
