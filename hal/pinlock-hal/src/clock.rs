//! Uptime clock abstraction
//!
//! The device has no real-time clock. All timing is derived from a
//! free-running uptime counter that starts at boot and wraps around at
//! [`TICK_MAX`].

/// A reading of the uptime counter
///
/// One tick is one millisecond on every supported board. The counter wraps
/// from [`TICK_MAX`] back to 0 after roughly 49.7 days of uptime.
pub type Tick = u32;

/// Largest representable tick value before wraparound
pub const TICK_MAX: Tick = u32::MAX;

/// Free-running monotonic uptime counter
pub trait UptimeClock {
    /// Current value of the uptime counter
    fn now_ticks(&self) -> Tick;

    /// Number of ticks per second
    fn ticks_per_second(&self) -> u32 {
        1000
    }
}

impl<T: UptimeClock + ?Sized> UptimeClock for &T {
    fn now_ticks(&self) -> Tick {
        (**self).now_ticks()
    }

    fn ticks_per_second(&self) -> u32 {
        (**self).ticks_per_second()
    }
}
