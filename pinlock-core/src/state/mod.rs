//! Lock state machine
//!
//! Explicit, finite and deterministic. The relay output and the screen
//! shown are functions of the current state.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::State;
