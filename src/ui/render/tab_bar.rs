use super::*;
use crate::state::State;
use crate::ui::widgets::styling;
use ratatui::{text::Span, widgets::Paragraph};

/// Render one label per tab over the hit regions of the tab bar.
///
pub fn tab_bar(frame: &mut Frame, areas: &Areas, state: &State, theme: &Theme) {
    let current = state.tabs().current_name();
    for (rect, name) in &areas.tabs {
        let style = if name == current {
            styling::active_tab_style(theme)
        } else {
            styling::inactive_tab_style(theme)
        };
        let label = Paragraph::new(Span::styled(format!(" {} ", name), style));
        frame.render_widget(label, *rect);
    }
}
