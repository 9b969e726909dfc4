//! Attempt counting and lockout enforcement
//!
//! [`SecurityState`] is the single record of failed attempts and lockout
//! timing. It is passed explicitly to [`LockoutPolicy`], which evaluates and
//! mutates it, and to [`SecurityStore`](crate::persist::SecurityStore),
//! which persists it.

mod elapsed;
mod policy;
mod state;

pub use elapsed::resolve_lockout_elapsed_ms;
pub use policy::{LockStatus, LockoutPolicy, VerifyOutcome};
pub use state::SecurityState;
