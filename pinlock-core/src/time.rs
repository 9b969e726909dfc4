//! Elapsed-time derivation from the uptime counter
//!
//! There is no real-time clock. "Seconds since boot" is computed from the
//! boot tick captured at startup and the current tick, both read from the
//! same free-running counter.

use pinlock_hal::{Tick, UptimeClock, TICK_MAX};

/// Ticks from `start` to `now`, tolerating one counter wraparound
///
/// When `now < start` the counter is assumed to have wrapped exactly once.
pub fn ticks_elapsed(start: Tick, now: Tick) -> u32 {
    if now >= start {
        now - start
    } else {
        (TICK_MAX - start) + now + 1
    }
}

/// Source of elapsed seconds since boot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ElapsedTimeSource {
    boot_tick: Tick,
    ticks_per_second: u32,
}

impl ElapsedTimeSource {
    /// Create a source anchored at `boot_tick`
    pub fn new(boot_tick: Tick, ticks_per_second: u32) -> Self {
        Self {
            boot_tick,
            ticks_per_second: ticks_per_second.max(1),
        }
    }

    /// Anchor at the clock's current reading
    pub fn from_clock<C: UptimeClock>(clock: &C) -> Self {
        Self::new(clock.now_ticks(), clock.ticks_per_second())
    }

    /// Tick captured at startup
    pub fn boot_tick(&self) -> Tick {
        self.boot_tick
    }

    /// Whole seconds elapsed between boot and `now`
    pub fn elapsed_seconds_since_boot(&self, now: Tick) -> u32 {
        ticks_elapsed(self.boot_tick, now) / self.ticks_per_second
    }

    /// Convert a tick count to milliseconds, saturating at `u32::MAX`
    pub fn ticks_to_ms(&self, ticks: u32) -> u32 {
        if self.ticks_per_second == 1000 {
            return ticks;
        }
        let ms = u64::from(ticks) * 1000 / u64::from(self.ticks_per_second);
        u32::try_from(ms).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ticks_elapsed_without_wrap() {
        assert_eq!(ticks_elapsed(100, 100), 0);
        assert_eq!(ticks_elapsed(100, 350), 250);
    }

    #[test]
    fn test_ticks_elapsed_across_wrap() {
        assert_eq!(ticks_elapsed(TICK_MAX, 0), 1);
        assert_eq!(ticks_elapsed(TICK_MAX - 10_000, 110_000), 120_001);
    }

    #[test]
    fn test_elapsed_seconds_since_boot() {
        let time = ElapsedTimeSource::new(1_500, 1000);
        assert_eq!(time.elapsed_seconds_since_boot(1_500), 0);
        assert_eq!(time.elapsed_seconds_since_boot(2_499), 0);
        assert_eq!(time.elapsed_seconds_since_boot(2_500), 1);
        assert_eq!(time.elapsed_seconds_since_boot(121_500), 120);
    }

    #[test]
    fn test_elapsed_seconds_across_wrap() {
        let time = ElapsedTimeSource::new(TICK_MAX - 999, 1000);
        assert_eq!(time.elapsed_seconds_since_boot(0), 1);
    }

    #[test]
    fn test_ticks_to_ms() {
        let ms = ElapsedTimeSource::new(0, 1000);
        assert_eq!(ms.ticks_to_ms(1234), 1234);

        let fast = ElapsedTimeSource::new(0, 1_000_000);
        assert_eq!(fast.ticks_to_ms(2_500_000), 2500);

        let slow = ElapsedTimeSource::new(0, 1);
        assert_eq!(slow.ticks_to_ms(u32::MAX), u32::MAX);
    }

    proptest! {
        #[test]
        fn prop_elapsed_matches_wrapping_sub(start in any::<u32>(), now in any::<u32>()) {
            prop_assert_eq!(ticks_elapsed(start, now), now.wrapping_sub(start));
        }

        #[test]
        fn prop_elapsed_inverts_offset(start in any::<u32>(), delta in any::<u32>()) {
            prop_assert_eq!(ticks_elapsed(start, start.wrapping_add(delta)), delta);
        }
    }
}
