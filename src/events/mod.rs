//! Event handling module.
//!
//! This module contains handlers for different types of events:
//! - Assist events: requests to the text-assist service, answered on a
//!   worker thread
//! - Terminal events: keys, mouse, resize and the animation tick

pub mod assist;
pub mod terminal;
