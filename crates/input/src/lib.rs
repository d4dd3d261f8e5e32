//! Keyboard input as an explicitly owned, polled state object.
//!
//! # Invariants
//! - No process-wide state: the host owns an [`InputState`] and passes it by
//!   reference to whatever polls it.
//! - Input is polled, never pushed; consumers ask "is this held right now".

pub mod action;
pub mod key;
mod state;

pub use action::{Action, Bindings};
pub use key::{Key, UnknownKey};
pub use state::InputState;
