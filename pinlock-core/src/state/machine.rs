//! State machine definition

use super::events::Event;

/// Lock states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Keypad active, collecting digits
    #[default]
    AwaitingPin,
    /// Too many failed attempts; keypad ignored until the lockout expires
    Locked,
    /// Correct PIN entered; relay energized until reset
    Authenticated,
}

impl State {
    /// Check if the relay should be energized in this state
    pub fn relay_energized(&self) -> bool {
        matches!(self, State::Authenticated)
    }

    /// Check if key presses are processed in this state
    pub fn accepts_pin(&self) -> bool {
        matches!(self, State::AwaitingPin)
    }

    /// Process an event and return the next state
    ///
    /// Authenticated is only left by a device reset, so every event keeps it.
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use State::*;

        match (self, event) {
            // AwaitingPin transitions
            (AwaitingPin, LockoutActive) => Locked,
            (AwaitingPin, PinAccepted) => Authenticated,
            (AwaitingPin, AttemptsExhausted) => Locked,
            (AwaitingPin, PinRejected) => AwaitingPin,

            // Locked transitions
            (Locked, LockoutExpired) => AwaitingPin,

            // Default: stay in current state
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::{LockStatus, VerifyOutcome};

    #[test]
    fn test_boot_into_lockout() {
        let next = State::AwaitingPin.transition(LockStatus::Locked { remaining_ms: 10 }.into());
        assert_eq!(next, State::Locked);
    }

    #[test]
    fn test_boot_without_lockout() {
        let next = State::AwaitingPin.transition(LockStatus::Unlocked.into());
        assert_eq!(next, State::AwaitingPin);
    }

    #[test]
    fn test_verification_outcomes() {
        assert_eq!(
            State::AwaitingPin.transition(VerifyOutcome::Granted.into()),
            State::Authenticated
        );
        assert_eq!(
            State::AwaitingPin.transition(VerifyOutcome::Denied { attempts_left: 3 }.into()),
            State::AwaitingPin
        );
        assert_eq!(
            State::AwaitingPin.transition(VerifyOutcome::LockedOut.into()),
            State::Locked
        );
    }

    #[test]
    fn test_lockout_expiry() {
        assert_eq!(State::Locked.transition(Event::LockoutExpired), State::AwaitingPin);
        assert_eq!(State::Locked.transition(Event::LockoutActive), State::Locked);
    }

    #[test]
    fn test_locked_ignores_pin_events() {
        for event in [Event::PinAccepted, Event::PinRejected, Event::AttemptsExhausted] {
            assert_eq!(State::Locked.transition(event), State::Locked);
        }
    }

    #[test]
    fn test_authenticated_is_absorbing() {
        let events = [
            Event::LockoutActive,
            Event::LockoutExpired,
            Event::PinAccepted,
            Event::PinRejected,
            Event::AttemptsExhausted,
        ];
        for event in events {
            assert_eq!(State::Authenticated.transition(event), State::Authenticated);
        }
    }

    #[test]
    fn test_relay_only_when_authenticated() {
        assert!(!State::AwaitingPin.relay_energized());
        assert!(!State::Locked.relay_energized());
        assert!(State::Authenticated.relay_energized());
        assert!(State::AwaitingPin.accepts_pin());
        assert!(!State::Locked.accepts_pin());
    }
}
