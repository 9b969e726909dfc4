//! Battery gauge icon
//!
//! A 32x12 outline with a nub on the right. The inner 30 px fill tracks
//! the battery percentage. While charging the fill is animated in four
//! frames that advance every [`CHARGING_FRAME_MS`].

use pinlock_core::traits::{DisplayError, DrawMode, DrawSurface};
use pinlock_hal::Tick;

/// Top-left corner of the icon outline
pub const ICON_X: i32 = 5;
pub const ICON_Y: i32 = 5;

/// Width of the fill at 100 %
pub const FILL_MAX: i32 = 30;

/// Duration of one charging animation frame
pub const CHARGING_FRAME_MS: u32 = 300;

const CHARGING_FRAMES: u32 = 4;

/// Fill width in pixels for a percentage, truncated
pub fn fill_width(percent: f32) -> i32 {
    if percent.is_nan() {
        return 0;
    }
    let whole = percent.clamp(0.0, 100.0) as i32;
    whole * FILL_MAX / 100
}

/// Charging animation frame shown at `now`
pub fn charging_frame(now: Tick) -> u32 {
    (now / CHARGING_FRAME_MS) % CHARGING_FRAMES
}

/// Draw the icon with its fill
///
/// Without charging the fill is solid. While charging the solid fill is
/// drawn first and the current animation frame on top of it.
pub fn draw<S: DrawSurface + ?Sized>(
    surface: &mut S,
    percent: f32,
    charging: bool,
    now: Tick,
) -> Result<(), DisplayError> {
    let (x, y) = (ICON_X, ICON_Y);
    surface.rect(x, y, x + 32, y + 12, DrawMode::Stroke)?;
    surface.rect(x + 32, y + 4, x + 35, y + 8, DrawMode::Fill)?;

    let fill = fill_width(percent);
    if fill > 0 {
        surface.rect(x + 1, y + 1, x + 1 + fill, y + 11, DrawMode::Fill)?;
    }
    if charging {
        draw_charging_frame(surface, fill, charging_frame(now))?;
    }
    Ok(())
}

fn draw_charging_frame<S: DrawSurface + ?Sized>(
    surface: &mut S,
    fill: i32,
    frame: u32,
) -> Result<(), DisplayError> {
    let (x, y) = (ICON_X + 1, ICON_Y + 1);
    match frame {
        0 => draw_bolt(surface, 0),
        1 => {
            // Sparkle: notches along the top edge of the fill
            for i in (0..FILL_MAX).step_by(6).take_while(|i| *i < fill) {
                surface.line(x + i, y, x + i + 2, y, DrawMode::Clear)?;
            }
            Ok(())
        }
        2 => draw_bolt(surface, 1),
        _ => {
            // Pulse: a short block past the end of the fill
            if fill < FILL_MAX {
                let pulse = (FILL_MAX - fill).min(5);
                surface.rect(x + fill, y, x + fill + pulse, y + 10, DrawMode::Fill)?;
            }
            Ok(())
        }
    }
}

fn draw_bolt<S: DrawSurface + ?Sized>(surface: &mut S, dx: i32) -> Result<(), DisplayError> {
    let (x, y) = (ICON_X + 15 + dx, ICON_Y + 3);
    surface.line(x, y, x + 3, y + 3, DrawMode::Stroke)?;
    surface.line(x + 3, y + 3, x - 1, y + 3, DrawMode::Stroke)?;
    surface.line(x - 1, y + 3, x + 2, y + 6, DrawMode::Stroke)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Op, RecordingSurface};

    #[test]
    fn test_fill_width() {
        assert_eq!(fill_width(0.0), 0);
        assert_eq!(fill_width(3.0), 0);
        assert_eq!(fill_width(57.0), 17);
        assert_eq!(fill_width(100.0), 30);
        assert_eq!(fill_width(140.0), 30);
        assert_eq!(fill_width(-5.0), 0);
        assert_eq!(fill_width(f32::NAN), 0);
    }

    #[test]
    fn test_charging_frame_cycles() {
        assert_eq!(charging_frame(0), 0);
        assert_eq!(charging_frame(299), 0);
        assert_eq!(charging_frame(300), 1);
        assert_eq!(charging_frame(900), 3);
        assert_eq!(charging_frame(1200), 0);
    }

    #[test]
    fn test_icon_outline_and_fill() {
        let mut surface = RecordingSurface::default();
        draw(&mut surface, 57.0, false, 0).unwrap();

        assert_eq!(
            surface.ops,
            vec![
                Op::Rect(5, 5, 37, 17, DrawMode::Stroke),
                Op::Rect(37, 9, 40, 13, DrawMode::Fill),
                Op::Rect(6, 6, 23, 16, DrawMode::Fill),
            ]
        );
    }

    #[test]
    fn test_empty_battery_has_no_fill() {
        let mut surface = RecordingSurface::default();
        draw(&mut surface, 0.0, false, 0).unwrap();
        assert_eq!(surface.ops.len(), 2);
    }

    #[test]
    fn test_charging_bolt() {
        let mut surface = RecordingSurface::default();
        draw(&mut surface, 57.0, true, 0).unwrap();

        assert_eq!(
            &surface.ops[3..],
            &[
                Op::Line(20, 8, 23, 11, DrawMode::Stroke),
                Op::Line(23, 11, 19, 11, DrawMode::Stroke),
                Op::Line(19, 11, 22, 14, DrawMode::Stroke),
            ]
        );

        let mut surface = RecordingSurface::default();
        draw(&mut surface, 57.0, true, 600).unwrap();
        assert_eq!(surface.ops[3], Op::Line(21, 8, 24, 11, DrawMode::Stroke));
    }

    #[test]
    fn test_charging_sparkle_stays_inside_fill() {
        let mut surface = RecordingSurface::default();
        // 57 % fills 17 px: notches at 0, 6 and 12
        draw(&mut surface, 57.0, true, 300).unwrap();

        assert_eq!(
            &surface.ops[3..],
            &[
                Op::Line(6, 6, 8, 6, DrawMode::Clear),
                Op::Line(12, 6, 14, 6, DrawMode::Clear),
                Op::Line(18, 6, 20, 6, DrawMode::Clear),
            ]
        );
    }

    #[test]
    fn test_charging_pulse() {
        let mut surface = RecordingSurface::default();
        draw(&mut surface, 57.0, true, 900).unwrap();
        assert_eq!(surface.ops[3], Op::Rect(23, 6, 28, 16, DrawMode::Fill));

        // Near full the pulse shrinks to the remaining width
        let mut surface = RecordingSurface::default();
        draw(&mut surface, 90.0, true, 900).unwrap();
        assert_eq!(surface.ops[3], Op::Rect(33, 6, 36, 16, DrawMode::Fill));

        let mut surface = RecordingSurface::default();
        draw(&mut surface, 100.0, true, 900).unwrap();
        assert_eq!(surface.ops.len(), 3);
    }
}
