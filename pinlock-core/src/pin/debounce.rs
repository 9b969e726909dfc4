//! Key press debouncing

use pinlock_hal::Tick;

use super::key::Key;
use crate::time::ticks_elapsed;

/// Drops key events that arrive too soon after the last accepted one
///
/// Any key needs `window_ms` since the last accepted key. Repeating the
/// same key needs twice that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyDebouncer {
    window_ms: u32,
    last: Option<(Key, Tick)>,
}

impl KeyDebouncer {
    pub const fn new(window_ms: u32) -> Self {
        Self {
            window_ms,
            last: None,
        }
    }

    /// Decide whether `key` at `now` is a real press
    ///
    /// Accepted presses become the new reference point; rejected ones
    /// leave it alone.
    pub fn accept(&mut self, key: Key, now: Tick) -> bool {
        if let Some((last_key, last_tick)) = self.last {
            let since = ticks_elapsed(last_tick, now);
            if since < self.window_ms {
                return false;
            }
            if key == last_key && since < self.window_ms.saturating_mul(2) {
                return false;
            }
        }
        self.last = Some((key, now));
        true
    }
}
