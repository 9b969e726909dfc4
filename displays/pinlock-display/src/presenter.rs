//! Screen layouts for the 128x64 OLED

use core::fmt::Write;

use pinlock_core::pin::PIN_LENGTH;
use pinlock_core::telemetry::TelemetrySnapshot;
use pinlock_core::traits::{DisplayError, DrawSurface, DrawSurfaceExt, StatusPresenter, StatusScreen};
use pinlock_hal::Tick;

use crate::battery;
use crate::format::{self, Line};

/// Name shown on the welcome and home screens
pub const DEFAULT_PRODUCT_NAME: &str = "Energram";

/// PIN cells start here: four `* ` cells centered on the panel
const PIN_CELLS_X: i32 = (128 - 32) / 2;
const PIN_CELLS_Y: i32 = 30;

/// Remaining-attempts hint under the PIN cells
const HINT_X: i32 = (128 - 96) / 2;
const HINT_Y: i32 = 50;

/// [`StatusPresenter`] that draws every screen on a [`DrawSurface`]
///
/// Each screen is drawn from scratch: clear, frame, content, update.
pub struct Presenter<S> {
    surface: S,
    product_name: &'static str,
}

impl<S: DrawSurface> Presenter<S> {
    pub fn new(surface: S) -> Self {
        Self::with_product_name(surface, DEFAULT_PRODUCT_NAME)
    }

    pub fn with_product_name(surface: S, product_name: &'static str) -> Self {
        Self {
            surface,
            product_name,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_inner(self) -> S {
        self.surface
    }

    fn welcome(&mut self) -> Result<(), DisplayError> {
        let name = self.product_name;
        self.surface.print_centered(20, "Welcome to")?;
        let mut upper = Line::new();
        for c in name.chars() {
            let _ = upper.push(c.to_ascii_uppercase());
        }
        self.surface.print_centered(35, &upper)
    }

    fn pin_entry(&mut self, entered: usize, attempts_left: Option<u8>) -> Result<(), DisplayError> {
        self.surface.print_centered(15, "Enter your PIN:")?;
        let cells = format::pin_cells(entered, PIN_LENGTH);
        self.surface.print_at(PIN_CELLS_X, PIN_CELLS_Y, &cells)?;

        if let Some(left) = attempts_left {
            let mut hint = Line::new();
            let _ = write!(hint, "Attempts left: {}", left);
            self.surface.print_at(HINT_X, HINT_Y, &hint)?;
        }
        Ok(())
    }

    fn access_denied(&mut self, attempts_left: u8) -> Result<(), DisplayError> {
        self.surface.print_centered(20, "Incorrect PIN!")?;
        let mut line = Line::new();
        let _ = write!(line, "{} attempts left", attempts_left);
        self.surface.print_centered(40, &line)
    }

    fn lockout(&mut self, remaining_ms: u32) -> Result<(), DisplayError> {
        self.surface.print_centered(10, "System Locked")?;
        self.surface.print_centered(25, "Try again in")?;
        self.surface.print_centered(40, &format::countdown(remaining_ms))
    }

    fn home(&mut self, telemetry: &TelemetrySnapshot, now: Tick) -> Result<(), DisplayError> {
        battery::draw(
            &mut self.surface,
            telemetry.battery_percent,
            telemetry.is_charging,
            now,
        )?;
        self.surface
            .print_at(13, 25, &format::percent(telemetry.battery_percent))?;
        self.surface.print_at(60, 5, self.product_name)?;
        self.surface
            .print_at(30, 48, &format::voltage(telemetry.smoothed_voltage_v))
    }
}

impl<S: DrawSurface> StatusPresenter for Presenter<S> {
    fn present(&mut self, screen: &StatusScreen) -> Result<(), DisplayError> {
        self.surface.clear()?;
        self.surface.frame()?;

        match *screen {
            StatusScreen::Welcome => self.welcome()?,
            StatusScreen::PinEntry {
                entered,
                attempts_left,
            } => self.pin_entry(entered, attempts_left)?,
            StatusScreen::AccessGranted => self.surface.print_centered(30, "Access Granted!")?,
            StatusScreen::AccessDenied { attempts_left } => self.access_denied(attempts_left)?,
            StatusScreen::Lockout { remaining_ms } => self.lockout(remaining_ms)?,
            StatusScreen::Home { telemetry, now } => self.home(&telemetry, now)?,
        }

        self.surface.update()
    }
}
