//! Collaborator traits
//!
//! These traits define the interface between the lock logic and the
//! keypad, power sensor and display implementations.

pub mod display;
pub mod keypad;
pub mod power;

pub use display::{
    DisplayError, DrawMode, DrawSurface, DrawSurfaceExt, StatusPresenter, StatusScreen, CHAR_WIDTH,
};
pub use keypad::KeySource;
pub use power::{PowerSensor, SensorError};
