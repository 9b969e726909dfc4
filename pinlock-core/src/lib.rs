//! Board-agnostic core logic for the pinlock firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Persistent security state layout and corruption checks
//! - Elapsed-time derivation from the uptime counter
//! - Lockout policy and the AWAITING_PIN / LOCKED / AUTHENTICATED machine
//! - PIN entry buffer and key debouncing
//! - Battery telemetry smoothing and charge detection
//! - The cooperative control loop tying them together
//! - Traits for the keypad, power sensor and display collaborators

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod config;
pub mod controller;
pub mod persist;
pub mod pin;
pub mod security;
pub mod state;
pub mod telemetry;
pub mod time;
pub mod traits;

pub use controller::LockController;
