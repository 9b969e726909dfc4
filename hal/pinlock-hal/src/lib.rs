//! pinlock Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that chip-specific HALs
//! implement, so the lock logic in `pinlock-core` never touches registers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (pinlock-firmware)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  pinlock-core (security, pin, telemetry)│
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  pinlock-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ pinlock-hal-  │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Digital output (relay)
//! - [`clock::UptimeClock`] - Free-running uptime counter
//! - [`storage::ByteStorage`] - Flat byte storage with explicit commit

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod clock;
pub mod gpio;
pub mod storage;

// Re-export key traits at crate root for convenience
pub use clock::{Tick, UptimeClock, TICK_MAX};
pub use gpio::OutputPin;
pub use storage::{ByteStorage, RamStorage, StorageError, StorageKey, ERASED_BYTE};
