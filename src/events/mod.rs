//! Event handling for signaldesk.
//!
//! Terminal key and mouse input is mapped to store [`Action`](crate::state::Action)s
//! through the configurable [`KeyBindings`](crate::config::KeyBindings).

mod handler;
mod input;

pub use handler::EventHandler;
pub use input::{InputEvent, Key, KeyBinding, Modifiers};
