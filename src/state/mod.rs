//! Application state management module.
//!
//! This module contains the core state management for the application, including:
//! - Main `State` struct that routes gestures to the board
//! - Navigation types (Mode, Gesture, Flow)
//! - Tab model and the typing session
//! - State error handling

mod error;
mod navigation;
mod tabs;
mod typing;

pub use error::StateError;
pub use navigation::{AssistKind, Flow, Gesture, Mode};
pub use tabs::{Tab, TabModel};
pub use typing::{TypingSession, CARET_BLINK};

// State struct, methods and Default impl are in state_impl.rs
#[path = "state_impl.rs"]
mod state_impl;

pub use state_impl::{AssistPanel, State, NOTE_COLORS};
