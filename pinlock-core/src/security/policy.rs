//! Lockout policy
//!
//! Stateless rules over a [`SecurityState`]. Every mutation that matters
//! after a reboot is written through the [`SecurityStore`] before the call
//! returns. Storage failures are logged and otherwise ignored: the
//! in-memory state stays authoritative for the rest of the session.

use pinlock_hal::{ByteStorage, Tick};

use super::elapsed::resolve_lockout_elapsed_ms;
use super::state::SecurityState;
use crate::config::LockConfig;
use crate::persist::SecurityStore;
use crate::pin::Pin;
use crate::time::ElapsedTimeSource;

/// Outcome of a lockout evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LockStatus {
    /// PIN entry allowed
    Unlocked,
    /// Lockout in force
    Locked {
        /// Time until the lockout ends (ms)
        remaining_ms: u32,
    },
}

impl LockStatus {
    pub fn is_locked(&self) -> bool {
        matches!(self, LockStatus::Locked { .. })
    }
}

/// Outcome of a PIN verification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VerifyOutcome {
    /// PIN matched
    Granted,
    /// PIN did not match, attempts remain
    Denied {
        /// Attempts left before a lockout
        attempts_left: u8,
    },
    /// No attempts left: this attempt started a lockout, or one was already
    /// in force and the PIN was not checked
    LockedOut,
}

/// Lockout rules
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LockoutPolicy {
    pin: Pin,
    max_attempts: u8,
    lockout_duration_ms: u32,
    time: ElapsedTimeSource,
}

impl LockoutPolicy {
    pub fn new(config: &LockConfig, time: ElapsedTimeSource) -> Self {
        Self {
            pin: config.pin,
            max_attempts: config.max_attempts,
            lockout_duration_ms: config.lockout_duration_ms,
            time,
        }
    }

    pub fn max_attempts(&self) -> u8 {
        self.max_attempts
    }

    pub fn lockout_duration_ms(&self) -> u32 {
        self.lockout_duration_ms
    }

    pub fn time(&self) -> &ElapsedTimeSource {
        &self.time
    }

    /// Decide whether a lockout is in force at `now`
    ///
    /// Called at boot and on every tick while locked. Repeated calls at the
    /// same `now` leave state and storage unchanged after the first.
    pub fn evaluate_lockout<S: ByteStorage>(
        &self,
        state: &mut SecurityState,
        store: &mut SecurityStore<S>,
        now: Tick,
    ) -> LockStatus {
        if state.failed_attempts < self.max_attempts {
            state.locked = false;
            if state.has_lockout_record() {
                debug!("Clearing stale lockout record");
                state.clear_lockout();
                self.persist_cleared(state, store);
            }
            return LockStatus::Unlocked;
        }

        if state.lockout_start_ticks == 0 {
            // Attempts exhausted but the start tick never made it to storage
            warn!("Lockout without start tick, restarting lockout");
            self.begin_lockout(state, store, now);
            return LockStatus::Locked {
                remaining_ms: self.lockout_duration_ms,
            };
        }

        let elapsed = self.lockout_elapsed_ms(state, now);
        if elapsed < self.lockout_duration_ms {
            state.locked = true;
            return LockStatus::Locked {
                remaining_ms: self.lockout_duration_ms - elapsed,
            };
        }

        info!("Lockout expired after {} ms", elapsed);
        state.failed_attempts = 0;
        state.clear_lockout();
        self.persist_cleared(state, store);
        LockStatus::Unlocked
    }

    /// Check a candidate PIN
    ///
    /// Must only be called while PIN entry is allowed. When attempts are
    /// already exhausted the candidate is not compared and nothing changes.
    pub fn verify<S: ByteStorage>(
        &self,
        state: &mut SecurityState,
        store: &mut SecurityStore<S>,
        candidate: &Pin,
        now: Tick,
    ) -> VerifyOutcome {
        if state.failed_attempts >= self.max_attempts {
            return VerifyOutcome::LockedOut;
        }

        if self.pin.matches(candidate) {
            info!("PIN accepted");
            state.failed_attempts = 0;
            state.clear_lockout();
            self.persist_cleared(state, store);
            return VerifyOutcome::Granted;
        }

        state.failed_attempts += 1;
        if state.failed_attempts >= self.max_attempts {
            warn!("PIN rejected, {} attempts used, locking out", state.failed_attempts);
            self.begin_lockout(state, store, now);
            return VerifyOutcome::LockedOut;
        }

        let attempts_left = state.attempts_left(self.max_attempts);
        info!("PIN rejected, {} attempts left", attempts_left);
        // Writes the start tick too: an erased start tick would reset the
        // counter on the next load
        if let Err(e) = store.save_state(state) {
            warn!("Failed to persist attempt counter: {}", e);
        }
        VerifyOutcome::Denied { attempts_left }
    }

    /// Milliseconds since the current lockout began
    pub fn lockout_elapsed_ms(&self, state: &SecurityState, now: Tick) -> u32 {
        resolve_lockout_elapsed_ms(
            &self.time,
            state.lockout_real_start_s,
            state.lockout_start_ticks,
            now,
        )
    }

    fn begin_lockout<S: ByteStorage>(
        &self,
        state: &mut SecurityState,
        store: &mut SecurityStore<S>,
        now: Tick,
    ) {
        // 0 marks "no lockout"
        let start = if now == 0 { 1 } else { now };
        let real_start_s = self.time.elapsed_seconds_since_boot(now);

        state.lockout_start_ticks = start;
        state.lockout_real_start_s = if real_start_s == 0 {
            None
        } else {
            Some(real_start_s)
        };
        state.locked = true;

        info!("Lockout started at tick {}", start);
        if let Err(e) = store.save_lockout_timestamp(real_start_s, self.time.boot_tick()) {
            warn!("Failed to persist lockout timestamp: {}", e);
        }
        if let Err(e) = store.save_state(state) {
            warn!("Failed to persist security state: {}", e);
        }
    }

    fn persist_cleared<S: ByteStorage>(&self, state: &SecurityState, store: &mut SecurityStore<S>) {
        if let Err(e) = store.clear_lockout_timestamp() {
            warn!("Failed to clear lockout timestamp: {}", e);
        }
        if let Err(e) = store.save_state(state) {
            warn!("Failed to persist security state: {}", e);
        }
    }
}
