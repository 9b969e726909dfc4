//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in pinlock-core, written against `embedded-hal` 1.0 blocking traits:
//!
//! - 4x3 matrix keypad
//! - INA219 power monitor, plus a fixed stand-in sensor
//! - SH1106 128x64 OLED

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod display;
pub mod keypad;
pub mod power;
