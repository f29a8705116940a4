//! Input and mode types.
//!
//! This module contains the gestures the host terminal delivers and the modes
//! that decide how key presses are routed.

use crossterm::event::KeyEvent;

/// Specifying the different input modes.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Mode {
    /// Keys drive the canvas: typing session, shortcuts.
    Canvas,
    /// The footer prompt collects the text of a new post-it.
    Compose,
    /// The footer prompt collects a question for the assistant.
    Ask,
}

/// Specifying the gestures consumed from the terminal. Pointer coordinates
/// are terminal cells.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Gesture {
    PrimaryDown { x: u16, y: u16 },
    PrimaryDrag { x: u16, y: u16 },
    PrimaryUp { x: u16, y: u16 },
    SecondaryClick { x: u16, y: u16 },
    PointerMove { x: u16, y: u16 },
    Key(KeyEvent),
    Resize { width: u16, height: u16 },
}

/// Specifying what a gesture asks of the event loop.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Flow {
    Continue,
    Exit,
}

/// Which request produced an assistant reply.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AssistKind {
    Chat,
    Cleanup,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode() {
        assert_eq!(Mode::Canvas, Mode::Canvas);
        assert_ne!(Mode::Compose, Mode::Ask);
    }

    #[test]
    fn test_flow() {
        assert_ne!(Flow::Continue, Flow::Exit);
    }
}
