use super::*;
use crate::canvas::{Item, Renderer};
use crate::state::State;
use ratatui::{buffer::Buffer, layout::Rect};

/// Render the notepad canvas according to state.
///
pub fn canvas(frame: &mut Frame, size: Rect, state: &State, theme: &Theme) {
    paint_items(frame.buffer_mut(), size, state.board().renderer(), theme);
}

/// Paint every visible item in layer order into the buffer, clipped to the
/// area. Items with a background fill their cells; text items without one
/// keep whatever lies underneath.
///
pub fn paint_items(buf: &mut Buffer, area: Rect, renderer: &Renderer, theme: &Theme) {
    let paper = theme.paper.to_color();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            buf.get_mut(x, y).set_char(' ').set_bg(paper);
        }
    }
    for item in renderer.paint_order() {
        if item.content.is_empty() {
            fill(buf, area, item, theme);
        } else {
            text(buf, area, item, theme);
        }
    }
}

fn fill(buf: &mut Buffer, area: Rect, item: &Item, theme: &Theme) {
    let Some(bg) = item.bg else {
        return;
    };
    let color = theme.resolve(bg);
    for dy in 0..item.height {
        for dx in 0..item.width {
            if let Some((x, y)) = cell(area, item.x + dx, item.y + dy) {
                buf.get_mut(x, y).set_char(' ').set_bg(color);
            }
        }
    }
}

fn text(buf: &mut Buffer, area: Rect, item: &Item, theme: &Theme) {
    let fg = theme.resolve(item.fg);
    let bg = item.bg.map(|paint| theme.resolve(paint));
    for (i, ch) in item.content.chars().enumerate() {
        if let Some((x, y)) = cell(area, item.x + i as i32, item.y) {
            let cell = buf.get_mut(x, y);
            cell.set_char(ch).set_fg(fg);
            if let Some(bg) = bg {
                cell.set_bg(bg);
            }
        }
    }
}

/// Map canvas coordinates to a buffer cell inside the area.
///
fn cell(area: Rect, x: i32, y: i32) -> Option<(u16, u16)> {
    if x < 0 || y < 0 || x >= area.width as i32 || y >= area.height as i32 {
        return None;
    }
    Some((area.x + x as u16, area.y + y as u16))
}
