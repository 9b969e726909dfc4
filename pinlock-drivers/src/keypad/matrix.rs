//! 4x3 matrix keypad
//!
//! Rows are outputs, idle high. Columns are inputs with pull-ups. A key
//! connects its row to its column, so with only its row driven low the
//! column reads low.

use embedded_hal::digital::{InputPin, OutputPin};
use pinlock_core::pin::Key;
use pinlock_core::time::ticks_elapsed;
use pinlock_core::traits::KeySource;
use pinlock_hal::{Tick, UptimeClock};

pub const ROWS: usize = 4;
pub const COLS: usize = 3;

/// Key legends by row and column
pub const LAYOUT: [[char; COLS]; ROWS] = [
    ['1', '2', '3'],
    ['4', '5', '6'],
    ['7', '8', '9'],
    ['*', '0', '#'],
];

/// How long a reading must stay unchanged before it counts (ms)
pub const DEFAULT_SCAN_DEBOUNCE_MS: u32 = 50;

/// Scanned matrix keypad
///
/// Reports a key once, on the press edge, after the scan result has been
/// stable for the debounce time. Holding a key does not repeat it.
pub struct MatrixKeypad<R, C, K> {
    rows: [R; ROWS],
    cols: [C; COLS],
    clock: K,
    debounce_ms: u32,
    /// Latest raw reading and when it first appeared
    candidate: Option<Key>,
    candidate_since: Tick,
    /// Last reading that passed the debounce
    stable: Option<Key>,
}

impl<R, C, K> MatrixKeypad<R, C, K>
where
    R: OutputPin,
    C: InputPin,
    K: UptimeClock,
{
    pub fn new(rows: [R; ROWS], cols: [C; COLS], clock: K) -> Self {
        let mut keypad = Self {
            rows,
            cols,
            clock,
            debounce_ms: DEFAULT_SCAN_DEBOUNCE_MS,
            candidate: None,
            candidate_since: 0,
            stable: None,
        };
        keypad.release_rows();
        keypad
    }

    /// Override the scan debounce time
    pub fn with_debounce(mut self, debounce_ms: u32) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    /// Read the matrix once; the first closed key found wins
    ///
    /// Pin errors read as "not pressed".
    pub fn scan(&mut self) -> Option<Key> {
        let mut found = None;
        for (r, row) in self.rows.iter_mut().enumerate() {
            if row.set_low().is_err() {
                continue;
            }
            for (c, col) in self.cols.iter_mut().enumerate() {
                if found.is_none() && col.is_low().unwrap_or(false) {
                    found = Key::from_char(LAYOUT[r][c]);
                }
            }
            let _ = row.set_high();
            if found.is_some() {
                break;
            }
        }
        found
    }

    fn release_rows(&mut self) {
        for row in self.rows.iter_mut() {
            let _ = row.set_high();
        }
    }
}

impl<R, C, K> KeySource for MatrixKeypad<R, C, K>
where
    R: OutputPin,
    C: InputPin,
    K: UptimeClock,
{
    fn poll_key(&mut self) -> Option<Key> {
        let reading = self.scan();
        let now = self.clock.now_ticks();

        if reading != self.candidate {
            self.candidate = reading;
            self.candidate_since = now;
            return None;
        }
        if ticks_elapsed(self.candidate_since, now) < self.debounce_ms || reading == self.stable {
            return None;
        }

        self.stable = reading;
        reading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Shared wiring state: which row is driven low and which key is held
    #[derive(Default)]
    struct Matrix {
        low_row: Cell<Option<usize>>,
        held: Cell<Option<(usize, usize)>>,
    }

    struct RowPin {
        index: usize,
        matrix: Rc<Matrix>,
    }

    impl embedded_hal::digital::ErrorType for RowPin {
        type Error = Infallible;
    }

    impl OutputPin for RowPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.matrix.low_row.set(Some(self.index));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            if self.matrix.low_row.get() == Some(self.index) {
                self.matrix.low_row.set(None);
            }
            Ok(())
        }
    }

    struct ColPin {
        index: usize,
        matrix: Rc<Matrix>,
    }

    impl embedded_hal::digital::ErrorType for ColPin {
        type Error = Infallible;
    }

    impl InputPin for ColPin {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(!self.is_low()?)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            let pressed = match (self.matrix.held.get(), self.matrix.low_row.get()) {
                (Some((r, c)), Some(low)) => r == low && c == self.index,
                _ => false,
            };
            Ok(pressed)
        }
    }

    struct TestClock(Rc<Cell<u32>>);

    impl UptimeClock for TestClock {
        fn now_ticks(&self) -> Tick {
            self.0.get()
        }
    }

    fn keypad(matrix: &Rc<Matrix>, time: &Rc<Cell<u32>>) -> MatrixKeypad<RowPin, ColPin, TestClock> {
        let rows = [0, 1, 2, 3].map(|index| RowPin { index, matrix: matrix.clone() });
        let cols = [0, 1, 2].map(|index| ColPin { index, matrix: matrix.clone() });
        MatrixKeypad::new(rows, cols, TestClock(time.clone()))
    }

    #[test]
    fn test_scan_finds_every_key() {
        let matrix = Rc::new(Matrix::default());
        let time = Rc::new(Cell::new(0));
        let mut pad = keypad(&matrix, &time);

        assert_eq!(pad.scan(), None);
        for (r, row) in LAYOUT.iter().enumerate() {
            for (c, &legend) in row.iter().enumerate() {
                matrix.held.set(Some((r, c)));
                assert_eq!(pad.scan(), Key::from_char(legend));
            }
        }
        assert_eq!(matrix.low_row.get(), None);
    }

    #[test]
    fn test_press_reported_once_after_debounce() {
        let matrix = Rc::new(Matrix::default());
        let time = Rc::new(Cell::new(1000));
        let mut pad = keypad(&matrix, &time);

        matrix.held.set(Some((3, 2)));
        assert_eq!(pad.poll_key(), None);
        time.set(1049);
        assert_eq!(pad.poll_key(), None);
        time.set(1050);
        assert_eq!(pad.poll_key(), Some(Key::Hash));

        // Held: no repeat
        time.set(1500);
        assert_eq!(pad.poll_key(), None);

        // Release then press again
        matrix.held.set(None);
        assert_eq!(pad.poll_key(), None);
        time.set(1600);
        assert_eq!(pad.poll_key(), None);
        matrix.held.set(Some((3, 2)));
        assert_eq!(pad.poll_key(), None);
        time.set(1700);
        assert_eq!(pad.poll_key(), Some(Key::Hash));
    }

    #[test]
    fn test_bounce_restarts_debounce() {
        let matrix = Rc::new(Matrix::default());
        let time = Rc::new(Cell::new(0));
        let mut pad = keypad(&matrix, &time);

        matrix.held.set(Some((0, 0)));
        pad.poll_key();
        time.set(30);
        matrix.held.set(None);
        pad.poll_key();
        time.set(40);
        matrix.held.set(Some((0, 0)));
        assert_eq!(pad.poll_key(), None);
        time.set(80);
        assert_eq!(pad.poll_key(), None);
        time.set(90);
        assert_eq!(pad.poll_key(), Some(Key::Digit(1)));
    }
}
