use super::*;
use crate::logger::TIMESTAMP_FORMAT;
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    text::Span,
    widgets::{Block, Borders},
};
use tui_logger::{TuiLoggerLevelOutput, TuiLoggerWidget};

/// Render log widget from the logger's buffer, newest entries at the bottom.
///
pub fn log(frame: &mut Frame, size: Rect, theme: &Theme) {
    let block = Block::default()
        .title(Span::styled("Log (l: hide)", styling::block_title_style(theme)))
        .borders(Borders::ALL)
        .border_style(styling::block_border_style(theme));

    let widget = TuiLoggerWidget::default()
        .block(block)
        .style(styling::normal_text_style(theme))
        .style_error(styling::error_style(theme))
        .style_warn(styling::error_style(theme))
        .output_separator(' ')
        .output_timestamp(Some(TIMESTAMP_FORMAT.to_string()))
        .output_level(Some(TuiLoggerLevelOutput::Abbreviated))
        .output_target(false)
        .output_file(false)
        .output_line(false);
    frame.render_widget(widget, size);
}
