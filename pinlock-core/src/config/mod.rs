//! Lock configuration
//!
//! Board-independent tuning values. Firmware builds generate their values
//! from `lock.toml` at compile time; host tests use [`LockConfig::default`].

mod types;

pub use types::*;
