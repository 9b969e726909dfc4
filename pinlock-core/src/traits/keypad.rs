//! Keypad input trait

use crate::pin::Key;

/// Source of key press events
///
/// Implementations report each physical press once. Timing-based
/// debouncing of accepted presses happens in [`PinEntry`](crate::pin::PinEntry).
pub trait KeySource {
    /// Return the key pressed since the last poll, if any
    fn poll_key(&mut self) -> Option<Key>;
}

impl<T: KeySource + ?Sized> KeySource for &mut T {
    fn poll_key(&mut self) -> Option<Key> {
        (**self).poll_key()
    }
}
