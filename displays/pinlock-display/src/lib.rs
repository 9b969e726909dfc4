//! Status screens for pinlock
//!
//! This crate provides:
//! - [`Presenter`], the [`StatusPresenter`](pinlock_core::traits::StatusPresenter)
//!   for the 128x64 OLED
//! - Battery icon and charging animation drawing
//! - Text formatting for the countdown and voltage readouts
//!
//! Everything draws through [`DrawSurface`](pinlock_core::traits::DrawSurface),
//! so the screens render the same on any panel driver.

#![cfg_attr(not(test), no_std)]

pub mod battery;
pub mod format;
pub mod presenter;

#[cfg(test)]
pub(crate) mod mock;

pub use presenter::{Presenter, DEFAULT_PRODUCT_NAME};
