//! Keypad drivers

mod matrix;

pub use matrix::{MatrixKeypad, COLS, DEFAULT_SCAN_DEBOUNCE_MS, LAYOUT, ROWS};
