//! SH1106 OLED display driver
//!
//! Driver for 128x64 SH1106-based OLED displays via blocking I2C. Drawing
//! goes to a page-organized frame buffer through `embedded-graphics`;
//! [`DrawSurface::update`] pushes it to the panel.

use core::convert::Infallible;

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use embedded_hal::i2c::I2c;
use pinlock_core::traits::{DisplayError, DrawMode, DrawSurface, CHAR_WIDTH};

/// SH1106 I2C address (typically 0x3C or 0x3D)
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// Display dimensions
pub const WIDTH: usize = 128;
pub const HEIGHT: usize = 64;
const PAGES: usize = HEIGHT / 8;

/// The 132-column controller RAM is centered on the 128-column glass
const COLUMN_OFFSET: u8 = 2;

/// SH1106 commands
#[allow(dead_code)]
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_INVERSE: u8 = 0xA7;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const SET_PAGE_ADDR: u8 = 0xB0;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
}

/// Control byte: command stream follows
const CONTROL_COMMAND: u8 = 0x00;
/// Control byte: display data follows
const CONTROL_DATA: u8 = 0x40;

/// SH1106 OLED driver
pub struct Sh1106<I2C> {
    i2c: I2C,
    address: u8,
    /// Frame buffer (1 bit per pixel, organized as pages)
    buffer: [[u8; WIDTH]; PAGES],
    cursor: Point,
    initialized: bool,
}

impl<I2C: I2c> Sh1106<I2C> {
    /// Create a new SH1106 driver
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            buffer: [[0; WIDTH]; PAGES],
            cursor: Point::zero(),
            initialized: false,
        }
    }

    /// Initialize the display
    pub fn init(&mut self) -> Result<(), DisplayError> {
        let init_cmds: &[u8] = &[
            cmd::DISPLAY_OFF,
            cmd::SET_CLOCK_DIV,
            0x80, // Default clock
            cmd::SET_MUX_RATIO,
            0x3F, // 64 lines
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE,
            cmd::SET_CHARGE_PUMP,
            0x14,                  // Enable charge pump
            cmd::SET_SEG_REMAP,    // Flip horizontally
            cmd::SET_COM_SCAN_DEC, // Flip vertically
            cmd::SET_COM_PINS,
            0x12, // Alternative COM config
            cmd::SET_CONTRAST,
            0xCF, // High contrast
            cmd::SET_PRECHARGE,
            0xF1,
            cmd::SET_VCOM_DETECT,
            0x40,
            cmd::SET_NORMAL,
            cmd::DISPLAY_ON,
        ];

        for &c in init_cmds {
            self.command(c)?;
        }
        self.initialized = true;
        Ok(())
    }

    /// Set display contrast (0-255)
    pub fn set_contrast(&mut self, contrast: u8) -> Result<(), DisplayError> {
        self.command(cmd::SET_CONTRAST)?;
        self.command(contrast)
    }

    /// Pixel state in the frame buffer; out of range reads as off
    pub fn pixel(&self, x: i32, y: i32) -> bool {
        match Self::locate(x, y) {
            Some((page, column, bit)) => self.buffer[page][column] & bit != 0,
            None => false,
        }
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        if let Some((page, column, bit)) = Self::locate(x, y) {
            if on {
                self.buffer[page][column] |= bit;
            } else {
                self.buffer[page][column] &= !bit;
            }
        }
    }

    fn locate(x: i32, y: i32) -> Option<(usize, usize, u8)> {
        let x = usize::try_from(x).ok().filter(|&x| x < WIDTH)?;
        let y = usize::try_from(y).ok().filter(|&y| y < HEIGHT)?;
        Some((y / 8, x, 1 << (y % 8)))
    }

    fn command(&mut self, cmd: u8) -> Result<(), DisplayError> {
        self.i2c
            .write(self.address, &[CONTROL_COMMAND, cmd])
            .map_err(|_| DisplayError::Communication)
    }

    fn style(mode: DrawMode) -> PrimitiveStyle<BinaryColor> {
        match mode {
            DrawMode::Stroke => PrimitiveStyle::with_stroke(BinaryColor::On, 1),
            DrawMode::Fill => PrimitiveStyle::with_fill(BinaryColor::On),
            DrawMode::Clear => PrimitiveStyle::with_fill(BinaryColor::Off),
        }
    }
}

fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

impl<I2C> OriginDimensions for Sh1106<I2C> {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl<I2C: I2c> DrawTarget for Sh1106<I2C> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color.is_on());
        }
        Ok(())
    }
}

impl<I2C: I2c> DrawSurface for Sh1106<I2C> {
    fn size(&self) -> (u32, u32) {
        (WIDTH as u32, HEIGHT as u32)
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        for page in self.buffer.iter_mut() {
            page.fill(0);
        }
        self.cursor = Point::zero();
        Ok(())
    }

    fn rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, mode: DrawMode) -> Result<(), DisplayError> {
        let rect = Rectangle::with_corners(Point::new(x0, y0), Point::new(x1, y1));
        infallible(rect.into_styled(Self::style(mode)).draw(self));
        Ok(())
    }

    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, mode: DrawMode) -> Result<(), DisplayError> {
        let color = match mode {
            DrawMode::Clear => BinaryColor::Off,
            DrawMode::Stroke | DrawMode::Fill => BinaryColor::On,
        };
        let line = Line::new(Point::new(x0, y0), Point::new(x1, y1));
        infallible(line.into_styled(PrimitiveStyle::with_stroke(color, 1)).draw(self));
        Ok(())
    }

    fn set_cursor(&mut self, x: i32, y: i32) -> Result<(), DisplayError> {
        if x < 0 || y < 0 || x >= WIDTH as i32 || y >= HEIGHT as i32 {
            return Err(DisplayError::InvalidCoordinates);
        }
        self.cursor = Point::new(x, y);
        Ok(())
    }

    fn print(&mut self, text: &str) -> Result<(), DisplayError> {
        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        infallible(Text::with_baseline(text, self.cursor, style, Baseline::Top).draw(self));
        self.cursor.x += text.chars().count() as i32 * CHAR_WIDTH;
        Ok(())
    }

    fn update(&mut self) -> Result<(), DisplayError> {
        if !self.initialized {
            return Err(DisplayError::NotInitialized);
        }
        for page in 0..PAGES {
            self.command(cmd::SET_PAGE_ADDR | page as u8)?;
            self.command(cmd::SET_LOW_COLUMN | COLUMN_OFFSET)?;
            self.command(cmd::SET_HIGH_COLUMN)?;

            let mut data = [0u8; WIDTH + 1];
            data[0] = CONTROL_DATA;
            data[1..].copy_from_slice(&self.buffer[page]);
            self.i2c
                .write(self.address, &data)
                .map_err(|_| DisplayError::Communication)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};

    #[derive(Default)]
    struct RecordingBus {
        writes: Vec<Vec<u8>>,
        fail: bool,
    }

    impl ErrorType for RecordingBus {
        type Error = ErrorKind;
    }

    impl I2c for RecordingBus {
        fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), ErrorKind> {
            assert_eq!(address, DEFAULT_ADDRESS);
            if self.fail {
                return Err(ErrorKind::Bus);
            }
            for op in operations {
                if let Operation::Write(bytes) = op {
                    self.writes.push(bytes.to_vec());
                }
            }
            Ok(())
        }
    }

    fn display() -> Sh1106<RecordingBus> {
        let mut oled = Sh1106::new(RecordingBus::default(), DEFAULT_ADDRESS);
        oled.init().unwrap();
        oled
    }

    #[test]
    fn test_update_requires_init() {
        let mut oled = Sh1106::new(RecordingBus::default(), DEFAULT_ADDRESS);
        assert_eq!(oled.update(), Err(DisplayError::NotInitialized));
    }

    #[test]
    fn test_init_ends_with_display_on() {
        let oled = display();
        let bus = oled.release();
        assert_eq!(bus.writes.last().unwrap(), &vec![CONTROL_COMMAND, cmd::DISPLAY_ON]);
    }

    #[test]
    fn test_stroke_rect_draws_outline_only() {
        let mut oled = display();
        oled.rect(0, 0, 127, 63, DrawMode::Stroke).unwrap();
        assert!(oled.pixel(0, 0));
        assert!(oled.pixel(127, 63));
        assert!(oled.pixel(64, 0));
        assert!(!oled.pixel(64, 32));
    }

    #[test]
    fn test_fill_and_clear_rect() {
        let mut oled = display();
        oled.rect(10, 10, 20, 20, DrawMode::Fill).unwrap();
        assert!(oled.pixel(15, 15));
        oled.rect(12, 12, 18, 18, DrawMode::Clear).unwrap();
        assert!(!oled.pixel(15, 15));
        assert!(oled.pixel(10, 10));
    }

    #[test]
    fn test_line_and_erase() {
        let mut oled = display();
        oled.line(0, 5, 10, 5, DrawMode::Stroke).unwrap();
        assert!(oled.pixel(5, 5));
        oled.line(0, 5, 10, 5, DrawMode::Clear).unwrap();
        assert!(!oled.pixel(5, 5));
    }

    #[test]
    fn test_print_advances_cursor() {
        let mut oled = display();
        oled.set_cursor(0, 0).unwrap();
        oled.print("AB").unwrap();
        assert_eq!(oled.cursor, Point::new(12, 0));
        assert!((0..12).any(|x| (0..10).any(|y| oled.pixel(x, y))));
    }

    #[test]
    fn test_cursor_bounds() {
        let mut oled = display();
        assert_eq!(oled.set_cursor(128, 0), Err(DisplayError::InvalidCoordinates));
        assert_eq!(oled.set_cursor(0, -1), Err(DisplayError::InvalidCoordinates));
    }

    #[test]
    fn test_update_sends_eight_pages_with_offset() {
        let mut oled = display();
        oled.rect(0, 0, 0, 0, DrawMode::Fill).unwrap();
        let init_writes = 22;
        oled.update().unwrap();

        let bus = oled.release();
        let frame = &bus.writes[init_writes..];
        assert_eq!(frame.len(), PAGES * 4);
        assert_eq!(frame[0], vec![CONTROL_COMMAND, cmd::SET_PAGE_ADDR]);
        assert_eq!(frame[1], vec![CONTROL_COMMAND, cmd::SET_LOW_COLUMN | 2]);
        assert_eq!(frame[3].len(), WIDTH + 1);
        assert_eq!(frame[3][0], CONTROL_DATA);
        assert_eq!(frame[3][1], 0x01);
    }

    #[test]
    fn test_bus_failure() {
        let mut oled = display();
        oled.i2c.fail = true;
        assert_eq!(oled.update(), Err(DisplayError::Communication));
    }
}
