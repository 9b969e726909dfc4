//! PIN entry
//!
//! Key events from the keypad pass through a [`KeyDebouncer`] and land in a
//! [`PinEntryBuffer`]. [`PinEntry`] combines the two and reports when a
//! complete PIN is ready for verification.

mod buffer;
mod debounce;
mod entry;
mod key;

pub use buffer::PinEntryBuffer;
pub use debounce::KeyDebouncer;
pub use entry::{EntryAction, PinEntry};
pub use key::{Key, Pin, PIN_LENGTH};
