//! Battery telemetry
//!
//! Raw samples from the power sensor are smoothed, classified as charging
//! or discharging with hysteresis, and mapped to a charge percentage.

mod battery;
mod sampler;

pub use battery::battery_percentage;
pub use sampler::{PowerSample, TelemetrySampler, TelemetrySnapshot};
