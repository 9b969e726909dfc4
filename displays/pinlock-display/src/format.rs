//! Text formatting for screen readouts

use core::fmt::Write;

use heapless::String;

/// Longest line that fits the panel at 6 px per character
pub const LINE_LEN: usize = 21;

pub type Line = String<LINE_LEN>;

/// `M:SS` of a remaining duration, seconds truncated
pub fn countdown(remaining_ms: u32) -> Line {
    let minutes = remaining_ms / 60_000;
    let seconds = (remaining_ms % 60_000) / 1000;
    let mut line = Line::new();
    let _ = write!(line, "{}:{:02}", minutes, seconds);
    line
}

/// PIN cells: `* ` per entered digit, `- ` per empty slot
pub fn pin_cells(entered: usize, slots: usize) -> Line {
    let mut line = Line::new();
    for i in 0..slots {
        let _ = line.push_str(if i < entered { "* " } else { "- " });
    }
    line
}

/// `Voltage: 11.75V`
pub fn voltage(volts: f32) -> Line {
    let mut line = Line::new();
    let _ = write!(line, "Voltage: {:.2}V", volts);
    line
}

/// Whole percent, rounded
pub fn percent(value: f32) -> Line {
    let mut line = Line::new();
    let _ = write!(line, "{:.0}%", value);
    line
}
