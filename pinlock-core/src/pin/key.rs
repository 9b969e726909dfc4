//! Keys and PINs

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of digits in a PIN
pub const PIN_LENGTH: usize = 4;

/// A key on the 4x3 keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    /// Decimal digit 0-9
    Digit(u8),
    /// `*` (unused)
    Star,
    /// `#` (backspace)
    Hash,
}

impl Key {
    /// Map a keypad legend character to a key
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0'..='9' => Some(Key::Digit(c as u8 - b'0')),
            '*' => Some(Key::Star),
            '#' => Some(Key::Hash),
            _ => None,
        }
    }

    /// Legend printed on the key
    pub fn as_char(self) -> char {
        match self {
            Key::Digit(d) if d <= 9 => (b'0' + d) as char,
            Key::Digit(_) => '?',
            Key::Star => '*',
            Key::Hash => '#',
        }
    }
}

/// A 4-digit PIN
///
/// `Debug` and `defmt::Format` never print the digits.
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pin([u8; PIN_LENGTH]);

impl Pin {
    /// Create a PIN from digit values (not ASCII)
    pub const fn new(digits: [u8; PIN_LENGTH]) -> Self {
        Self(digits)
    }

    /// Parse four ASCII digits
    pub fn parse(text: &str) -> Option<Self> {
        let bytes = text.as_bytes();
        if bytes.len() != PIN_LENGTH {
            return None;
        }
        let mut digits = [0u8; PIN_LENGTH];
        for (slot, &b) in digits.iter_mut().zip(bytes) {
            if !b.is_ascii_digit() {
                return None;
            }
            *slot = b - b'0';
        }
        Some(Self(digits))
    }

    /// Whether every slot holds a decimal digit
    pub fn is_valid(&self) -> bool {
        self.0.iter().all(|&d| d <= 9)
    }

    /// Compare against a candidate without stopping at the first mismatch
    pub fn matches(&self, candidate: &Pin) -> bool {
        self.0
            .iter()
            .zip(candidate.0.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl core::fmt::Debug for Pin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Pin(****)")
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Pin {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Pin(****)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_char() {
        assert_eq!(Key::from_char('7'), Some(Key::Digit(7)));
        assert_eq!(Key::from_char('*'), Some(Key::Star));
        assert_eq!(Key::from_char('#'), Some(Key::Hash));
        assert_eq!(Key::from_char('A'), None);
        assert_eq!(Key::Digit(0).as_char(), '0');
    }

    #[test]
    fn test_pin_parse() {
        assert_eq!(Pin::parse("1911"), Some(Pin::new([1, 9, 1, 1])));
        assert_eq!(Pin::parse("191"), None);
        assert_eq!(Pin::parse("19a1"), None);
        assert_eq!(Pin::parse("19111"), None);
    }

    #[test]
    fn test_pin_matches() {
        let pin = Pin::new([1, 9, 1, 1]);
        assert!(pin.matches(&Pin::new([1, 9, 1, 1])));
        assert!(!pin.matches(&Pin::new([1, 9, 1, 2])));
        assert!(!pin.matches(&Pin::new([0, 9, 1, 1])));
    }

    #[test]
    fn test_pin_debug_hides_digits() {
        let text = format!("{:?}", Pin::new([1, 9, 1, 1]));
        assert!(!text.contains('9'));
    }
}
