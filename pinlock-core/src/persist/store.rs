//! Load and save of the security record

use pinlock_hal::{ByteStorage, StorageError, Tick};

use super::layout::*;
use super::value::StorageExt;
use crate::security::SecurityState;

/// Persistence errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PersistError {
    /// Backing storage failed
    Storage(StorageError),
    /// Region is smaller than [`MIN_REGION_SIZE`]
    RegionTooSmall,
}

impl From<StorageError> for PersistError {
    fn from(e: StorageError) -> Self {
        PersistError::Storage(e)
    }
}

/// Which fields were found corrupt and reset during [`SecurityStore::load`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LoadReport {
    /// Attempt counter was erased or above the limit
    pub attempts_reset: bool,
    /// Lockout start tick was erased or in the future
    pub lockout_reset: bool,
    /// Diagnostic flag as found; never used to decide anything
    pub stored_lockout_flag: bool,
}

impl LoadReport {
    /// Whether any field had to be reset
    pub fn any_reset(&self) -> bool {
        self.attempts_reset || self.lockout_reset
    }
}

/// Security record on top of a [`ByteStorage`] region
pub struct SecurityStore<S> {
    storage: S,
}

impl<S: ByteStorage> SecurityStore<S> {
    /// Wrap a storage region
    pub fn new(storage: S) -> Result<Self, PersistError> {
        if storage.capacity() < MIN_REGION_SIZE {
            return Err(PersistError::RegionTooSmall);
        }
        Ok(Self { storage })
    }

    /// Read the record, resetting corrupt fields
    ///
    /// - an attempt count of 0xFF or above `max_attempts` becomes 0
    /// - a start tick of 0xFFFFFFFF or later than `now + lockout_duration_ms`
    ///   becomes 0, and the attempt count with it
    ///
    /// The diagnostic lockout flag is reported but not trusted; the returned
    /// state always starts unlocked until the policy evaluates it.
    pub fn load(
        &self,
        now: Tick,
        max_attempts: u8,
        lockout_duration_ms: u32,
    ) -> Result<(SecurityState, LoadReport), PersistError> {
        let mut report = LoadReport::default();

        let mut failed_attempts: u8 = self.storage.get(FAILED_ATTEMPTS)?;
        if failed_attempts == ERASED_U8 || failed_attempts > max_attempts {
            failed_attempts = 0;
            report.attempts_reset = true;
        }

        let mut lockout_start_ticks: u32 = self.storage.get(LOCKOUT_START_TICKS)?;
        let latest_valid = u64::from(now) + u64::from(lockout_duration_ms);
        if lockout_start_ticks == ERASED_U32 || u64::from(lockout_start_ticks) > latest_valid {
            lockout_start_ticks = 0;
            failed_attempts = 0;
            report.lockout_reset = true;
        }

        let flag: u8 = self.storage.get(LOCKOUT_ACTIVE_FLAG)?;
        report.stored_lockout_flag = flag == 1;

        let state = SecurityState {
            failed_attempts,
            lockout_start_ticks,
            lockout_real_start_s: self.lockout_timestamp()?,
            locked: false,
        };
        Ok((state, report))
    }

    /// The seconds-since-boot lockout record, if one is present
    ///
    /// Absent when either the record or its boot tick reads as erased, or
    /// when the record is 0.
    pub fn lockout_timestamp(&self) -> Result<Option<u32>, PersistError> {
        let real_start: u32 = self.storage.get(LOCKOUT_REAL_START_S)?;
        let boot: u32 = self.storage.get(BOOT_TIMESTAMP)?;
        if real_start == ERASED_U32 || boot == ERASED_U32 || real_start == 0 {
            Ok(None)
        } else {
            Ok(Some(real_start))
        }
    }

    /// Write attempts, start tick and diagnostic flag, then commit
    pub fn save_state(&mut self, state: &SecurityState) -> Result<(), PersistError> {
        self.storage.put(FAILED_ATTEMPTS, state.failed_attempts)?;
        self.storage.put(LOCKOUT_START_TICKS, state.lockout_start_ticks)?;
        self.storage.put(LOCKOUT_ACTIVE_FLAG, u8::from(state.locked))?;
        self.storage.commit()?;
        Ok(())
    }

    /// Write the seconds-since-boot record and the boot tick, then commit
    pub fn save_lockout_timestamp(&mut self, real_start_s: u32, boot_tick: Tick) -> Result<(), PersistError> {
        self.storage.put(LOCKOUT_REAL_START_S, real_start_s)?;
        self.storage.put(BOOT_TIMESTAMP, boot_tick)?;
        self.storage.commit()?;
        Ok(())
    }

    /// Mark the seconds-since-boot record as not recorded
    ///
    /// Not committed on its own; the following [`save_state`](Self::save_state)
    /// commits it.
    pub fn clear_lockout_timestamp(&mut self) -> Result<(), PersistError> {
        self.storage.put(LOCKOUT_REAL_START_S, ERASED_U32)?;
        Ok(())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_inner(self) -> S {
        self.storage
    }
}
