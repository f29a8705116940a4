use crate::ui::theme::Theme;
use ratatui::style::{Modifier, Style};

/// Return the border style for panel blocks.
///
pub fn block_border_style(theme: &Theme) -> Style {
    Style::default().fg(theme.border.to_color()).bg(theme.paper.to_color())
}

/// Return the title style for panel blocks.
///
pub fn block_title_style(theme: &Theme) -> Style {
    Style::default()
        .fg(theme.text.to_color())
        .add_modifier(Modifier::BOLD)
}

/// Return the style for normal text.
///
pub fn normal_text_style(theme: &Theme) -> Style {
    Style::default().fg(theme.text.to_color()).bg(theme.paper.to_color())
}

/// Return the style for finished tasks.
///
pub fn completed_text_style(theme: &Theme) -> Style {
    Style::default()
        .fg(theme.muted.to_color())
        .bg(theme.paper.to_color())
        .add_modifier(Modifier::CROSSED_OUT)
}

/// Return the style of the current tab label.
///
pub fn active_tab_style(theme: &Theme) -> Style {
    Style::default()
        .fg(theme.paper.to_color())
        .bg(theme.accent.to_color())
        .add_modifier(Modifier::BOLD)
}

/// Return the style of the other tab labels.
///
pub fn inactive_tab_style(theme: &Theme) -> Style {
    Style::default().fg(theme.muted.to_color()).bg(theme.paper.to_color())
}

pub fn footer_style(theme: &Theme) -> Style {
    Style::default().fg(theme.footer.to_color()).bg(theme.paper.to_color())
}

pub fn error_style(theme: &Theme) -> Style {
    Style::default().fg(theme.error.to_color()).bg(theme.paper.to_color())
}
