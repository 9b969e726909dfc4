//! Display traits
//!
//! [`DrawSurface`] is the small drawing API of the OLED. [`StatusPresenter`]
//! turns lock state into screens on top of it.

use pinlock_hal::Tick;

use crate::telemetry::TelemetrySnapshot;

/// Width of one character cell of the display font (px)
pub const CHAR_WIDTH: i32 = 6;

/// Errors that can occur when drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus transaction with the panel failed
    Communication,
    /// Coordinates outside the surface
    InvalidCoordinates,
    /// Panel not initialized
    NotInitialized,
}

/// How a primitive is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DrawMode {
    /// Outline in the foreground color
    Stroke,
    /// Filled with the foreground color
    Fill,
    /// Filled with the background color
    Clear,
}

/// Monochrome drawing surface
///
/// Drawing goes to an off-screen buffer; nothing is visible until
/// [`update`](DrawSurface::update).
pub trait DrawSurface {
    /// Surface size in pixels
    fn size(&self) -> (u32, u32) {
        (128, 64)
    }

    /// Clear the buffer
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Rectangle spanning the two corners, inclusive
    fn rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, mode: DrawMode) -> Result<(), DisplayError>;

    /// Line between two points, inclusive; `Fill` draws like `Stroke`
    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, mode: DrawMode) -> Result<(), DisplayError>;

    /// Move the text cursor (top-left of the next character)
    fn set_cursor(&mut self, x: i32, y: i32) -> Result<(), DisplayError>;

    /// Draw text at the cursor and advance it
    fn print(&mut self, text: &str) -> Result<(), DisplayError>;

    /// Push the buffer to the panel
    fn update(&mut self) -> Result<(), DisplayError>;
}

/// Layout helpers over [`DrawSurface`]
pub trait DrawSurfaceExt: DrawSurface {
    /// Print `text` with its top-left at (x, y)
    fn print_at(&mut self, x: i32, y: i32, text: &str) -> Result<(), DisplayError> {
        self.set_cursor(x, y)?;
        self.print(text)
    }

    /// Print `text` horizontally centered on row `y`
    fn print_centered(&mut self, y: i32, text: &str) -> Result<(), DisplayError> {
        let (width, _) = self.size();
        let x = (width as i32 - text.len() as i32 * CHAR_WIDTH) / 2;
        self.print_at(x.max(0), y, text)
    }

    /// Outline around the whole surface
    fn frame(&mut self) -> Result<(), DisplayError> {
        let (width, height) = self.size();
        self.rect(0, 0, width as i32 - 1, height as i32 - 1, DrawMode::Stroke)
    }
}

impl<T: DrawSurface + ?Sized> DrawSurfaceExt for T {}

/// A screen to present
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusScreen {
    /// Boot greeting
    Welcome,
    /// PIN entry with `entered` digits typed
    PinEntry {
        entered: usize,
        /// Shown once an attempt has failed
        attempts_left: Option<u8>,
    },
    /// Correct PIN
    AccessGranted,
    /// Wrong PIN
    AccessDenied { attempts_left: u8 },
    /// Lockout countdown
    Lockout { remaining_ms: u32 },
    /// Battery status after authentication
    Home {
        telemetry: TelemetrySnapshot,
        /// Drives the charging animation
        now: Tick,
    },
}

/// Renders [`StatusScreen`]s
///
/// Presentation only: implementations never feed anything back into the
/// lock logic.
pub trait StatusPresenter {
    fn present(&mut self, screen: &StatusScreen) -> Result<(), DisplayError>;
}

impl<T: StatusPresenter + ?Sized> StatusPresenter for &mut T {
    fn present(&mut self, screen: &StatusScreen) -> Result<(), DisplayError> {
        (**self).present(screen)
    }
}
