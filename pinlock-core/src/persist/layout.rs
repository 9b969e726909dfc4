//! Byte layout of the security region
//!
//! | Offset | Field | Size |
//! |---|---|---|
//! | 0 | failed attempts | 1 |
//! | 4 | lockout start tick | 4 |
//! | 8 | lockout active flag (diagnostic) | 1 |
//! | 12 | lockout start, seconds since boot | 4 |
//! | 20 | boot tick at lockout (diagnostic) | 4 |
//!
//! Multi-byte values are little-endian.

pub const FAILED_ATTEMPTS: usize = 0;
pub const LOCKOUT_START_TICKS: usize = 4;
pub const LOCKOUT_ACTIVE_FLAG: usize = 8;
pub const LOCKOUT_REAL_START_S: usize = 12;
pub const BOOT_TIMESTAMP: usize = 20;

/// Smallest region that holds every field
pub const MIN_REGION_SIZE: usize = 24;

/// Size of the region allocated on the device
pub const REGION_SIZE: usize = 32;

/// Erased 8-bit field
pub const ERASED_U8: u8 = 0xFF;

/// Erased 32-bit field, also written to mark "not recorded"
pub const ERASED_U32: u32 = 0xFFFF_FFFF;
