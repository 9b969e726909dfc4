//! Key handling for the PIN entry screen

use pinlock_hal::Tick;

use super::buffer::PinEntryBuffer;
use super::debounce::KeyDebouncer;
use super::key::{Key, Pin};

/// Result of feeding one key event to [`PinEntry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EntryAction {
    /// Debounced away or had no effect
    Ignored,
    /// Buffer changed, redraw the entry screen
    Updated,
    /// Fourth digit entered, verify this PIN
    Complete(Pin),
}

/// PIN entry controller: debouncer plus buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinEntry {
    buffer: PinEntryBuffer,
    debouncer: KeyDebouncer,
}

impl PinEntry {
    pub const fn new(debounce_ms: u32) -> Self {
        Self {
            buffer: PinEntryBuffer::new(),
            debouncer: KeyDebouncer::new(debounce_ms),
        }
    }

    /// Handle a raw key event
    pub fn handle_key(&mut self, key: Key, now: Tick) -> EntryAction {
        if !self.debouncer.accept(key, now) {
            return EntryAction::Ignored;
        }

        match key {
            Key::Digit(d) => {
                if !self.buffer.push_digit(d) {
                    return EntryAction::Ignored;
                }
                match self.buffer.as_pin() {
                    Some(pin) => EntryAction::Complete(pin),
                    None => EntryAction::Updated,
                }
            }
            Key::Hash => {
                if self.buffer.delete_last() {
                    EntryAction::Updated
                } else {
                    EntryAction::Ignored
                }
            }
            Key::Star => EntryAction::Ignored,
        }
    }

    /// Start a fresh entry
    pub fn reset(&mut self) {
        self.buffer.reset();
    }

    pub fn buffer(&self) -> &PinEntryBuffer {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn type_keys(entry: &mut PinEntry, keys: &str, start: Tick, spacing: u32) -> EntryAction {
        let mut last = EntryAction::Ignored;
        for (i, c) in keys.chars().enumerate() {
            let key = Key::from_char(c).unwrap();
            last = entry.handle_key(key, start + i as u32 * spacing);
        }
        last
    }

    #[test]
    fn test_complete_pin() {
        let mut entry = PinEntry::new(200);
        let action = type_keys(&mut entry, "1911", 0, 500);
        assert_eq!(action, EntryAction::Complete(Pin::new([1, 9, 1, 1])));
    }

    #[test]
    fn test_backspace_then_complete() {
        let mut entry = PinEntry::new(200);
        assert_eq!(type_keys(&mut entry, "12#", 0, 500), EntryAction::Updated);
        assert_eq!(entry.buffer().position(), 1);
        let action = type_keys(&mut entry, "911", 2000, 500);
        assert_eq!(action, EntryAction::Complete(Pin::new([1, 9, 1, 1])));
    }

    #[test]
    fn test_backspace_on_empty_is_ignored() {
        let mut entry = PinEntry::new(200);
        assert_eq!(entry.handle_key(Key::Hash, 0), EntryAction::Ignored);
        assert!(entry.buffer().is_empty());
    }

    #[test]
    fn test_star_is_ignored() {
        let mut entry = PinEntry::new(200);
        assert_eq!(entry.handle_key(Key::Star, 0), EntryAction::Ignored);
        assert!(entry.buffer().is_empty());
    }

    #[test]
    fn test_repeated_digit_within_double_window_counts_once() {
        let mut entry = PinEntry::new(200);
        assert_eq!(entry.handle_key(Key::Digit(1), 1000), EntryAction::Updated);
        assert_eq!(entry.handle_key(Key::Digit(1), 1300), EntryAction::Ignored);
        assert_eq!(entry.buffer().position(), 1);
    }

    #[test]
    fn test_different_digits_within_double_window_both_count() {
        let mut entry = PinEntry::new(200);
        assert_eq!(entry.handle_key(Key::Digit(1), 1000), EntryAction::Updated);
        assert_eq!(entry.handle_key(Key::Digit(9), 1300), EntryAction::Updated);
        assert_eq!(entry.buffer().position(), 2);
    }

    proptest! {
        #[test]
        fn prop_same_digit_inside_double_window_accepted_once(
            digit in 0u8..10,
            start in any::<u32>(),
            gap in 0u32..400,
        ) {
            let mut entry = PinEntry::new(200);
            entry.handle_key(Key::Digit(digit), start);
            entry.handle_key(Key::Digit(digit), start.wrapping_add(gap));
            prop_assert_eq!(entry.buffer().position(), 1);
        }

        #[test]
        fn prop_different_digits_past_window_both_accepted(
            a in 0u8..10,
            b in 0u8..10,
            start in any::<u32>(),
            gap in 200u32..400,
        ) {
            prop_assume!(a != b);
            let mut entry = PinEntry::new(200);
            entry.handle_key(Key::Digit(a), start);
            entry.handle_key(Key::Digit(b), start.wrapping_add(gap));
            prop_assert_eq!(entry.buffer().position(), 2);
        }
    }
}
