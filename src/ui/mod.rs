//! User interface module.
//!
//! This module handles all UI rendering using the `ratatui` library, including:
//! - Screen layout shared with gesture routing
//! - Light and dark palettes
//! - Styling helpers
//! - Region rendering (tab bar, canvas, side panels, log, footer)

type Frame<'a> = ratatui::Frame<'a>;

mod layout;
mod render;
mod theme;
mod widgets;

pub use layout::{Areas, LOG_HEIGHT, SIDE_WIDTH};
pub use render::render;
pub use theme::{ColorSpec, Theme};
