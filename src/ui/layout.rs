use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Width of the completed/assistant column.
///
pub const SIDE_WIDTH: u16 = 32;
/// Height of the log panel when shown.
///
pub const LOG_HEIGHT: u16 = 8;
const PROMPT_HEIGHT: u16 = 3;
const STATUS_HEIGHT: u16 = 1;

/// Screen regions of one frame. Computed from the terminal size whenever it
/// or the panel visibility changes, and used both to draw and to route
/// pointer gestures.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Areas {
    pub tab_bar: Rect,
    /// One hit region per tab label, in tab order.
    pub tabs: Vec<(Rect, String)>,
    pub canvas: Rect,
    pub side: Rect,
    pub log: Option<Rect>,
    pub footer: Rect,
}

impl Areas {
    pub fn compute(size: Rect, tab_names: &[&str], show_log: bool, prompt_open: bool) -> Areas {
        let footer_height = if prompt_open { PROMPT_HEIGHT } else { STATUS_HEIGHT };
        let log_height = if show_log { LOG_HEIGHT } else { 0 };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(log_height),
                Constraint::Length(footer_height),
            ])
            .split(size);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(SIDE_WIDTH)])
            .split(rows[1]);

        let tab_bar = rows[0];
        let mut tabs = vec![];
        let mut x = tab_bar.x;
        let right = tab_bar.x.saturating_add(tab_bar.width);
        for name in tab_names {
            let width = (name.chars().count() as u16).saturating_add(2);
            if x >= right {
                break;
            }
            let width = width.min(right - x);
            tabs.push((Rect::new(x, tab_bar.y, width, tab_bar.height), name.to_string()));
            x = x.saturating_add(width).saturating_add(1);
        }

        Areas {
            tab_bar,
            tabs,
            canvas: columns[0],
            side: columns[1],
            log: if show_log { Some(rows[2]) } else { None },
            footer: rows[3],
        }
    }

    /// Return the name of the tab whose label covers the cell.
    ///
    pub fn tab_at(&self, x: u16, y: u16) -> Option<&str> {
        self.tabs
            .iter()
            .find(|(rect, _)| contains(*rect, x, y))
            .map(|(_, name)| name.as_str())
    }

    /// Translate a terminal cell into canvas coordinates, if the canvas
    /// covers it.
    ///
    pub fn canvas_point(&self, x: u16, y: u16) -> Option<(i32, i32)> {
        if contains(self.canvas, x, y) {
            Some(self.relative(x, y))
        } else {
            None
        }
    }

    /// Translate a terminal cell into canvas coordinates, even when outside
    /// the canvas.
    ///
    pub fn relative(&self, x: u16, y: u16) -> (i32, i32) {
        (x as i32 - self.canvas.x as i32, y as i32 - self.canvas.y as i32)
    }
}

fn contains(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.x.saturating_add(rect.width) && y >= rect.y && y < rect.y.saturating_add(rect.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_canvas_side_and_footer() {
        let areas = Areas::compute(Rect::new(0, 0, 100, 30), &["Page 1"], false, false);
        assert_eq!(areas.tab_bar, Rect::new(0, 0, 100, 1));
        assert_eq!(areas.canvas, Rect::new(0, 1, 100 - SIDE_WIDTH, 28));
        assert_eq!(areas.side.width, SIDE_WIDTH);
        assert_eq!(areas.footer, Rect::new(0, 29, 100, 1));
        assert_eq!(areas.log, None);
    }

    #[test]
    fn log_and_prompt_take_rows_from_canvas() {
        let areas = Areas::compute(Rect::new(0, 0, 100, 30), &[], true, true);
        assert_eq!(areas.canvas.height, 30 - 1 - LOG_HEIGHT - 3);
        assert_eq!(areas.log.map(|log| log.height), Some(LOG_HEIGHT));
    }

    #[test]
    fn tab_labels_are_hit_regions() {
        let areas = Areas::compute(Rect::new(0, 0, 80, 24), &["Page 1", "Page 2"], false, false);
        assert_eq!(areas.tab_at(0, 0), Some("Page 1"));
        assert_eq!(areas.tab_at(7, 0), Some("Page 1"));
        assert_eq!(areas.tab_at(8, 0), None);
        assert_eq!(areas.tab_at(9, 0), Some("Page 2"));
        assert_eq!(areas.tab_at(9, 1), None);
    }

    #[test]
    fn canvas_points_are_relative() {
        let areas = Areas::compute(Rect::new(0, 0, 80, 24), &[], false, false);
        assert_eq!(areas.canvas_point(3, 5), Some((3, 4)));
        assert_eq!(areas.canvas_point(79, 5), None);
        assert_eq!(areas.relative(79, 0), (79, -1));
    }
}
