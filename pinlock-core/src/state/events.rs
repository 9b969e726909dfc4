//! Events that trigger state transitions

use crate::security::{LockStatus, VerifyOutcome};

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Lockout evaluation
    /// A lockout is in force
    LockoutActive,
    /// No lockout is in force (never was, or it expired)
    LockoutExpired,

    // Verification
    /// Entered PIN matched
    PinAccepted,
    /// Entered PIN did not match, attempts remain
    PinRejected,
    /// Entered PIN did not match and no attempts remain
    AttemptsExhausted,
}

impl From<LockStatus> for Event {
    fn from(status: LockStatus) -> Self {
        match status {
            LockStatus::Locked { .. } => Event::LockoutActive,
            LockStatus::Unlocked => Event::LockoutExpired,
        }
    }
}

impl From<VerifyOutcome> for Event {
    fn from(outcome: VerifyOutcome) -> Self {
        match outcome {
            VerifyOutcome::Granted => Event::PinAccepted,
            VerifyOutcome::Denied { .. } => Event::PinRejected,
            VerifyOutcome::LockedOut => Event::AttemptsExhausted,
        }
    }
}
