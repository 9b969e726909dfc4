//! Uptime clock backed by the embassy time driver

use embassy_time::Instant;
use pinlock_hal::{Tick, UptimeClock};

/// Milliseconds since boot, truncated to 32 bits
///
/// The truncation is the wraparound of the uptime counter: the value
/// restarts at 0 every 2^32 ms.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyUptime;

impl UptimeClock for EmbassyUptime {
    fn now_ticks(&self) -> Tick {
        Instant::now().as_millis() as Tick
    }
}
