//! Lockout elapsed-time resolution

use pinlock_hal::Tick;

use crate::time::{ticks_elapsed, ElapsedTimeSource};

/// Milliseconds elapsed since the lockout began
///
/// The seconds-since-boot record is preferred when present. If it is
/// later than the current seconds-since-boot it comes from an earlier boot,
/// and only the time since this boot is counted. Otherwise the tick delta
/// is used, with wraparound.
///
/// The record only has one-second resolution, so its value is capped by
/// the tick delta: within one boot the tick delta is exact, and the lockout
/// never ends before its full duration.
pub fn resolve_lockout_elapsed_ms(
    time: &ElapsedTimeSource,
    real_start_s: Option<u32>,
    start_ticks: Tick,
    now: Tick,
) -> u32 {
    let tick_ms = time.ticks_to_ms(ticks_elapsed(start_ticks, now));

    let Some(real_start_s) = real_start_s else {
        return tick_ms;
    };

    let now_s = time.elapsed_seconds_since_boot(now);
    let real_s = if now_s >= real_start_s {
        now_s - real_start_s
    } else {
        now_s
    };
    let real_ms = u32::try_from(u64::from(real_s) * 1000).unwrap_or(u32::MAX);
    real_ms.min(tick_ms)
}
