use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub const PANEL_WIDTH: u16 = 34;
/// Below this width the settings panel is dropped and the viewer takes
/// every column.
const MIN_WIDTH_FOR_PANEL: u16 = PANEL_WIDTH + 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiLayout {
    pub viewer: Rect,
    pub panel: Rect,
    pub status: Rect,
}

pub fn split_layout(area: Rect) -> UiLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    let body = rows[0];

    if body.width < MIN_WIDTH_FOR_PANEL {
        return UiLayout {
            viewer: body,
            panel: Rect::new(body.x + body.width, body.y, 0, body.height),
            status: rows[1],
        };
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(PANEL_WIDTH)])
        .split(body);

    UiLayout {
        viewer: columns[0],
        panel: columns[1],
        status: rows[1],
    }
}

pub(crate) fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.max(1).min(area.width);
    let height = height.max(1).min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
