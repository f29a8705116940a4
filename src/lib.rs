//! A notepad-style task canvas for the terminal.
//!
//! Tasks sit on ruled lines and are typed in place, sticky notes float above
//! them or pin to a task row, and every page lives in its own tab. Finished
//! tasks fade out with a crumbling animation and move to the completed list.
//! The current page is saved to a plain text file after every change, and an
//! optional chat-completions endpoint can answer questions about the list or
//! propose a cleaned up version of it.

pub mod animation;
pub mod app;
pub mod assist;
pub mod canvas;
pub mod config;
pub mod error;
pub mod events;
pub mod logger;
pub mod persistence;
pub mod state;
pub mod ui;
pub mod utils;
