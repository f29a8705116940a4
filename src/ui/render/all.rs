use super::*;
use crate::state::State;
use ratatui::{style::Style, widgets::Block};

/// Render every region of the screen according to state. Regions come from
/// the areas the state computed for the current terminal size.
///
pub fn all(frame: &mut Frame, state: &mut State) {
    let theme = Theme::for_mode(state.dark_mode());
    let areas = state.areas().clone();
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.paper.to_color())),
        frame.size(),
    );
    tab_bar(frame, &areas, state, &theme);
    canvas(frame, areas.canvas, state, &theme);
    side(frame, areas.side, state, &theme);
    if let Some(area) = areas.log {
        log(frame, area, &theme);
    }
    footer(frame, areas.footer, state, &theme);
}
