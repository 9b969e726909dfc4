//! Display drivers

mod sh1106;

pub use sh1106::{Sh1106, DEFAULT_ADDRESS as SH1106_DEFAULT_ADDRESS, HEIGHT, WIDTH};
