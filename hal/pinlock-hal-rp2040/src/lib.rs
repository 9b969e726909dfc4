//! RP2040-specific HAL for the pinlock firmware
//!
//! This crate provides RP2040 implementations of the `pinlock-hal` traits:
//!
//! - Emulated EEPROM on a wear-levelled flash partition
//!   (implements `pinlock_hal::ByteStorage`)
//! - Relay output on a GPIO (implements `pinlock_hal::OutputPin`)
//! - Uptime clock from the embassy time driver
//!   (implements `pinlock_hal::UptimeClock`)

#![no_std]

pub mod clock;
pub mod eeprom;
pub mod relay;

pub use clock::EmbassyUptime;
pub use eeprom::Rp2040Eeprom;
pub use relay::RelayOutput;

// Re-export shared types from pinlock-hal for convenience
pub use pinlock_hal::{ByteStorage, StorageKey};
