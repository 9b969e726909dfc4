//! Persistent security state
//!
//! The attempt counter and lockout record live in a small byte region at
//! fixed offsets (see [`layout`]). [`SecurityStore`] reads them back at boot
//! with corruption checks and writes them after every security transition.

pub mod layout;
mod store;
mod value;

pub use store::{LoadReport, PersistError, SecurityStore};
pub use value::{StorageExt, StorageValue};
