//! Canvas item model.
//!
//! This module contains everything that lives on the drawable notepad surface:
//! - `Renderer`: registry of addressable render handles (glyphs, boxes, rules)
//! - `TaskStore`: ordered tasks laid out on dense slots
//! - `PostitStore`: free or pinned sticky notes plus the placement ghost
//! - `Board`: composition of the above with the animation engine
//!
//! Coordinates are terminal cells. The origin is the top-left corner of the
//! canvas area, `x` grows to the right and `y` grows downwards.

mod board;
mod error;
mod postit_store;
mod renderer;
mod task_store;

pub use board::{Board, BoardSnapshot, CompletedEntry, Viewport};
pub use error::CanvasError;
pub use postit_store::{
    Anchor, Ghost, PinOutcome, Postit, PostitSeed, PostitSnapshot, PostitStore,
};
pub use renderer::{
    Item, ItemKind, Paint, Renderer, Role, LAYER_CONTROLS, LAYER_EFFECTS, LAYER_GHOST,
    LAYER_NOTES, LAYER_RULES, LAYER_TASKS,
};

pub(crate) use postit_store::{draw_note, NoteStyle};
pub use task_store::{Task, TaskPhase, TaskSnapshot, TaskStore, Toggle};

/// Row of the first task slot.
pub const LINE_START_Y: i32 = 2;
/// Rows between two consecutive task slots.
pub const LINE_HEIGHT: i32 = 2;
/// Per-character advance width.
pub const CHAR_WIDTH: i32 = 1;

pub const CHECKBOX_X: i32 = 1;
pub const CHECKMARK_X: i32 = 2;
pub const PRIORITY_X: i32 = 5;
pub const TEXT_START_X: i32 = 9;
pub const MAX_PRIORITY: u8 = 3;

pub const POSTIT_WIDTH: i32 = 20;
pub const POSTIT_HEIGHT: i32 = 5;
/// Rows between a pinned note's top edge and its anchor task row.
pub const PIN_OFFSET: i32 = 1;

/// Return the row of the given slot index.
///
pub fn slot_y(slot: usize) -> i32 {
    LINE_START_Y + slot as i32 * LINE_HEIGHT
}

/// Return the slot whose row band contains `y`, if any. A band starts at the
/// slot row and covers `LINE_HEIGHT` rows.
///
pub fn slot_at(y: i32) -> Option<usize> {
    if y < LINE_START_Y {
        return None;
    }
    Some(((y - LINE_START_Y) / LINE_HEIGHT) as usize)
}

/// Identity of a render handle.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(pub(crate) u64);

/// Identity of a task, stable for the task's lifetime.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub(crate) u64);

/// Identity of a post-it, stable for the note's lifetime.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PostitId(pub(crate) u64);

/// Which part of a task row a pointer landed on.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskPart {
    Toggle,
    Priority,
}

/// Which part of a post-it a pointer landed on.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PostitPart {
    Body,
    Pin,
    Delete,
}

/// Gesture binding attached to a render handle.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Binding {
    Task(TaskId, TaskPart),
    Postit(PostitId, PostitPart),
    ThemeToggle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_rows_are_evenly_spaced() {
        assert_eq!(slot_y(0), LINE_START_Y);
        assert_eq!(slot_y(3), LINE_START_Y + 3 * LINE_HEIGHT);
    }

    #[test]
    fn slot_at_covers_the_whole_band() {
        assert_eq!(slot_at(LINE_START_Y - 1), None);
        assert_eq!(slot_at(slot_y(0)), Some(0));
        assert_eq!(slot_at(slot_y(0) + LINE_HEIGHT - 1), Some(0));
        assert_eq!(slot_at(slot_y(4)), Some(4));
    }
}
