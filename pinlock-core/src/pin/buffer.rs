//! Fixed-size PIN entry buffer

use super::key::{Pin, PIN_LENGTH};

/// Digits typed so far
///
/// Digits are appended at the cursor, which then advances. Backspace moves
/// the cursor back and clears the vacated slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinEntryBuffer {
    slots: [Option<u8>; PIN_LENGTH],
    position: usize,
}

impl PinEntryBuffer {
    /// Create an empty buffer
    pub const fn new() -> Self {
        Self {
            slots: [None; PIN_LENGTH],
            position: 0,
        }
    }

    /// Append a digit
    ///
    /// Returns `false` and leaves the buffer untouched when it is full or
    /// `digit` is not 0-9.
    pub fn push_digit(&mut self, digit: u8) -> bool {
        if digit > 9 || self.position >= PIN_LENGTH {
            return false;
        }
        self.slots[self.position] = Some(digit);
        self.position += 1;
        true
    }

    /// Remove the last digit, returns `false` when already empty
    pub fn delete_last(&mut self) -> bool {
        if self.position == 0 {
            return false;
        }
        self.position -= 1;
        self.slots[self.position] = None;
        true
    }

    /// Clear every slot
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Number of digits entered
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_empty(&self) -> bool {
        self.position == 0
    }

    pub fn is_complete(&self) -> bool {
        self.position == PIN_LENGTH
    }

    /// Slot contents, `None` for placeholders
    pub fn slots(&self) -> &[Option<u8>; PIN_LENGTH] {
        &self.slots
    }

    /// The entered PIN once all slots are filled
    pub fn as_pin(&self) -> Option<Pin> {
        if !self.is_complete() {
            return None;
        }
        let mut digits = [0u8; PIN_LENGTH];
        for (out, slot) in digits.iter_mut().zip(self.slots.iter()) {
            *out = (*slot)?;
        }
        Some(Pin::new(digits))
    }
}
