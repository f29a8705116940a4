use super::*;
use crate::state::{Mode, State};
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const CANVAS_HELP: &str = " n: note  a: ask  c: clean up  t: new tab  [ ]: switch tab  m: theme  l: log  q: quit";
const TYPING_HELP: &str = " Enter: add task  Backspace: delete  Esc: cancel";
const PLACING_HELP: &str = " Move: position note  Right-click: drop  Esc: discard";

/// Render footer widget: the open prompt, or the status line with the help
/// of the current interaction.
///
pub fn footer(frame: &mut Frame, size: Rect, state: &mut State, theme: &Theme) {
    let title = match state.mode() {
        Mode::Compose => Some("New note (Enter: place, Esc: cancel)"),
        Mode::Ask => Some("Ask the assistant (Enter: send, Esc: cancel)"),
        Mode::Canvas => None,
    };
    if let Some(title) = title {
        let block = Block::default()
            .title(Span::styled(title, styling::block_title_style(theme)))
            .borders(Borders::ALL)
            .border_style(styling::block_border_style(theme));
        let textarea = state.prompt_mut();
        textarea.set_block(block);
        textarea.set_style(styling::normal_text_style(theme));
        frame.render_widget(textarea.widget(), size);
        return;
    }

    let line = match state.status() {
        Some(status) => Line::from(Span::styled(format!(" {}", status), styling::error_style(theme))),
        None => Line::from(Span::styled(help_text(state), styling::footer_style(theme))),
    };
    frame.render_widget(Paragraph::new(line).style(styling::footer_style(theme)), size);
}

fn help_text(state: &State) -> &'static str {
    if state.typing().is_active() {
        TYPING_HELP
    } else if state.board().is_placing() {
        PLACING_HELP
    } else {
        CANVAS_HELP
    }
}
