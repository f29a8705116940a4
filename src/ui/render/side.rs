use super::*;
use crate::canvas::CompletedEntry;
use crate::state::{AssistKind, State};
use crate::ui::widgets::styling;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

/// Render the completed list above the assistant panel.
///
pub fn side(frame: &mut Frame, size: Rect, state: &State, theme: &Theme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(size);
    completed(frame, rows[0], state.board().completed(), theme);
    assistant(frame, rows[1], state, theme);
}

fn panel<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(Span::styled(title, styling::block_title_style(theme)))
        .borders(Borders::ALL)
        .border_style(styling::block_border_style(theme))
}

fn completed(frame: &mut Frame, size: Rect, entries: &[CompletedEntry], theme: &Theme) {
    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| ListItem::new(Line::styled(completed_label(entry), styling::completed_text_style(theme))))
        .collect();
    let list = List::new(items)
        .style(styling::normal_text_style(theme))
        .block(panel("Completed", theme));
    frame.render_widget(list, size);
}

/// Return the label of a finished task, its stars first.
///
fn completed_label(entry: &CompletedEntry) -> String {
    if entry.priority == 0 {
        entry.text.clone()
    } else {
        format!("{} {}", "★".repeat(entry.priority as usize), entry.text)
    }
}

fn assistant(frame: &mut Frame, size: Rect, state: &State, theme: &Theme) {
    let panel_state = state.assist();
    let mut lines: Vec<Line> = vec![];
    match panel_state.pending {
        Some(AssistKind::Chat) => lines.push(Line::from("Thinking...")),
        Some(AssistKind::Cleanup) => lines.push(Line::from("Tidying up the list...")),
        None => {}
    }
    if let Some(proposal) = &panel_state.proposal {
        lines.push(Line::from(Span::styled("Proposed list:", styling::block_title_style(theme))));
        lines.extend(proposal.iter().map(|task| Line::from(format!("• {}", task))));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("y: apply  x: discard", styling::footer_style(theme))));
    } else if let Some(reply) = &panel_state.reply {
        lines.extend(reply.lines().map(|line| Line::from(line.to_string())));
    } else if panel_state.pending.is_none() {
        lines.push(Line::from(Span::styled(
            "a: ask  c: clean up tasks",
            styling::footer_style(theme),
        )));
    }
    let paragraph = Paragraph::new(lines)
        .style(styling::normal_text_style(theme))
        .wrap(Wrap { trim: false })
        .block(panel("Assistant", theme));
    frame.render_widget(paragraph, size);
}
