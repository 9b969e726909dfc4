//! Security record

use pinlock_hal::Tick;

/// Attempt counter and lockout timing
///
/// Loaded once at boot, mutated only by [`LockoutPolicy`](super::LockoutPolicy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SecurityState {
    pub(crate) failed_attempts: u8,
    /// 0 means no lockout
    pub(crate) lockout_start_ticks: Tick,
    pub(crate) lockout_real_start_s: Option<u32>,
    pub(crate) locked: bool,
}

impl SecurityState {
    /// Consecutive failed verifications
    pub fn failed_attempts(&self) -> u8 {
        self.failed_attempts
    }

    /// Tick at which the current lockout began, 0 if none
    pub fn lockout_start_ticks(&self) -> Tick {
        self.lockout_start_ticks
    }

    /// Seconds since boot at which the current lockout began
    pub fn lockout_real_start_s(&self) -> Option<u32> {
        self.lockout_real_start_s
    }

    /// Result of the most recent lockout evaluation
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Attempts left before a lockout
    pub fn attempts_left(&self, max_attempts: u8) -> u8 {
        max_attempts.saturating_sub(self.failed_attempts)
    }

    pub(crate) fn has_lockout_record(&self) -> bool {
        self.lockout_start_ticks != 0 || self.lockout_real_start_s.is_some()
    }

    pub(crate) fn clear_lockout(&mut self) {
        self.lockout_start_ticks = 0;
        self.lockout_real_start_s = None;
        self.locked = false;
    }
}
