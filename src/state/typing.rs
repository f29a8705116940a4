//! In-place text entry on the next empty task row.

use crate::canvas::{
    slot_y, HandleId, Item, ItemKind, Paint, Renderer, Role, CHAR_WIDTH, LAYER_GHOST,
    TEXT_START_X,
};
use log::*;
use std::time::Duration;

/// Interval at which the caret toggles its visibility.
///
pub const CARET_BLINK: Duration = Duration::from_millis(530);

#[derive(Debug)]
struct Draft {
    slot: usize,
    text: String,
    glyphs: Vec<HandleId>,
    caret: HandleId,
    caret_on: bool,
    since_blink: Duration,
}

impl Draft {
    fn caret_x(&self) -> i32 {
        TEXT_START_X + self.glyphs.len() as i32 * CHAR_WIDTH
    }

    fn discard(self, renderer: &mut Renderer) {
        renderer.delete_all(&self.glyphs);
        renderer.delete(self.caret);
    }
}

/// Single-slot typing state machine. At most one draft exists; starting a new
/// one discards the previous buffer without creating a task from it.
///
#[derive(Debug, Default)]
pub struct TypingSession {
    draft: Option<Draft>,
}

impl TypingSession {
    pub fn new() -> Self {
        TypingSession::default()
    }

    pub fn is_active(&self) -> bool {
        self.draft.is_some()
    }

    /// Buffered text of the active draft.
    ///
    pub fn text(&self) -> Option<&str> {
        self.draft.as_ref().map(|draft| draft.text.as_str())
    }

    /// Slot the active draft is typed on.
    ///
    pub fn slot(&self) -> Option<usize> {
        self.draft.as_ref().map(|draft| draft.slot)
    }

    /// Whether the caret is currently shown.
    ///
    pub fn caret_visible(&self) -> bool {
        self.draft.as_ref().is_some_and(|draft| draft.caret_on)
    }

    /// Begin typing on `slot`, discarding any active draft.
    ///
    pub fn start(&mut self, renderer: &mut Renderer, slot: usize) {
        if self.cancel(renderer) {
            debug!("Discarded previous draft for a new typing session.");
        }
        let caret = renderer.spawn(Item::text(
            ItemKind::Caret,
            "▏",
            TEXT_START_X,
            slot_y(slot),
            Paint::Solid(Role::Caret),
            LAYER_GHOST,
        ));
        self.draft = Some(Draft {
            slot,
            text: String::new(),
            glyphs: vec![],
            caret,
            caret_on: true,
            since_blink: Duration::ZERO,
        });
    }

    /// Echo a printable character and advance the caret. Control characters
    /// are ignored. Returns whether the character was accepted.
    ///
    pub fn input_char(&mut self, renderer: &mut Renderer, ch: char) -> bool {
        let Some(draft) = self.draft.as_mut() else {
            return false;
        };
        if ch.is_control() {
            return false;
        }
        let x = draft.caret_x();
        let y = slot_y(draft.slot);
        let glyph = renderer.draw_text(&ch.to_string(), x, y, Paint::Solid(Role::Ink), LAYER_GHOST, None);
        draft.glyphs.extend(glyph);
        draft.text.push(ch);
        renderer.move_to(draft.caret, draft.caret_x(), y);
        true
    }

    /// Remove the last character. Returns false when there is nothing to
    /// remove.
    ///
    pub fn delete_last(&mut self, renderer: &mut Renderer) -> bool {
        let Some(draft) = self.draft.as_mut() else {
            return false;
        };
        let Some(glyph) = draft.glyphs.pop() else {
            return false;
        };
        draft.text.pop();
        renderer.delete(glyph);
        renderer.move_to(draft.caret, draft.caret_x(), slot_y(draft.slot));
        true
    }

    /// End the session and return the trimmed text, if any is left. The
    /// draft's handles are discarded either way.
    ///
    pub fn confirm(&mut self, renderer: &mut Renderer) -> Option<String> {
        let draft = self.draft.take()?;
        let text = draft.text.trim().to_string();
        draft.discard(renderer);
        if text.is_empty() {
            debug!("Typing session confirmed without text.");
            return None;
        }
        Some(text)
    }

    /// Drop the active draft without creating a task. Returns whether a draft
    /// was active.
    ///
    pub fn cancel(&mut self, renderer: &mut Renderer) -> bool {
        match self.draft.take() {
            Some(draft) => {
                draft.discard(renderer);
                true
            }
            None => false,
        }
    }

    /// Move the draft to another slot, e.g. after the row above it was removed.
    ///
    pub fn relocate(&mut self, renderer: &mut Renderer, slot: usize) {
        let Some(draft) = self.draft.as_mut() else {
            return;
        };
        if draft.slot == slot {
            return;
        }
        let dy = slot_y(slot) - slot_y(draft.slot);
        renderer.translate_all(&draft.glyphs, 0, dy);
        renderer.translate(draft.caret, 0, dy);
        draft.slot = slot;
    }

    /// Blink the caret by elapsed wall-clock time.
    ///
    pub fn advance(&mut self, renderer: &mut Renderer, elapsed: Duration) {
        let Some(draft) = self.draft.as_mut() else {
            return;
        };
        draft.since_blink += elapsed;
        while draft.since_blink >= CARET_BLINK {
            draft.since_blink -= CARET_BLINK;
            draft.caret_on = !draft.caret_on;
        }
        renderer.set_visible(draft.caret, draft.caret_on);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(renderer: &mut Renderer, text: &str) -> TypingSession {
        let mut session = TypingSession::new();
        session.start(renderer, 0);
        for ch in text.chars() {
            session.input_char(renderer, ch);
        }
        session
    }

    #[test]
    fn characters_echo_and_advance_caret() {
        let mut renderer = Renderer::new();
        let session = typed(&mut renderer, "hey");
        assert_eq!(session.text(), Some("hey"));
        // three glyphs and the caret
        assert_eq!(renderer.len(), 4);
        let caret = renderer
            .paint_order()
            .into_iter()
            .find(|item| item.kind == ItemKind::Caret)
            .map(|item| item.x);
        assert_eq!(caret, Some(TEXT_START_X + 3));
    }

    #[test]
    fn control_characters_are_ignored() {
        let mut renderer = Renderer::new();
        let mut session = typed(&mut renderer, "a");
        assert!(!session.input_char(&mut renderer, '\u{7}'));
        assert!(!session.input_char(&mut renderer, '\t'));
        assert_eq!(session.text(), Some("a"));
    }

    #[test]
    fn delete_last_on_empty_buffer_is_a_no_op() {
        let mut renderer = Renderer::new();
        let mut session = typed(&mut renderer, "ab");
        assert!(session.delete_last(&mut renderer));
        assert!(session.delete_last(&mut renderer));
        assert!(!session.delete_last(&mut renderer));
        assert_eq!(session.text(), Some(""));
        assert_eq!(renderer.len(), 1);
    }

    #[test]
    fn starting_again_discards_previous_buffer() {
        let mut renderer = Renderer::new();
        let mut session = typed(&mut renderer, "first");
        session.start(&mut renderer, 2);
        assert_eq!(session.text(), Some(""));
        assert_eq!(session.slot(), Some(2));
        assert_eq!(renderer.len(), 1);
    }

    #[test]
    fn whitespace_only_commits_nothing() {
        let mut renderer = Renderer::new();
        let mut session = typed(&mut renderer, "   ");
        assert_eq!(session.confirm(&mut renderer), None);
        assert!(!session.is_active());
        assert!(renderer.is_empty());
    }

    #[test]
    fn confirm_returns_trimmed_text() {
        let mut renderer = Renderer::new();
        let mut session = typed(&mut renderer, "  Buy milk ");
        assert_eq!(session.confirm(&mut renderer), Some("Buy milk".to_string()));
        assert!(renderer.is_empty());
    }

    #[test]
    fn caret_blinks_while_active_only() {
        let mut renderer = Renderer::new();
        let mut session = typed(&mut renderer, "x");
        assert!(session.caret_visible());
        session.advance(&mut renderer, CARET_BLINK);
        assert!(!session.caret_visible());
        session.advance(&mut renderer, CARET_BLINK);
        assert!(session.caret_visible());
        session.cancel(&mut renderer);
        session.advance(&mut renderer, CARET_BLINK);
        assert!(!session.caret_visible());
    }

    #[test]
    fn relocate_moves_draft_rows() {
        let mut renderer = Renderer::new();
        let mut session = TypingSession::new();
        session.start(&mut renderer, 3);
        session.input_char(&mut renderer, 'z');
        session.relocate(&mut renderer, 1);
        assert!(renderer.paint_order().iter().all(|item| item.y == slot_y(1)));
    }
}
