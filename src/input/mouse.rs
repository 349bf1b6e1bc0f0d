use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

use crate::command::Command;
use crate::overlay::{ViewportTransform, cell_center_px};
use crate::session::PointSlot;

/// Where the image sits on screen during the last drawn frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerGeometry {
    pub area: Rect,
    pub cell_px: (u16, u16),
    pub transform: ViewportTransform,
    pub image_size: (u32, u32),
}

pub fn map_mouse_to_command(
    event: MouseEvent,
    geometry: Option<&ViewerGeometry>,
    target: PointSlot,
) -> Option<Command> {
    let geometry = geometry?;
    if !geometry.area.contains(Position::new(event.column, event.row)) {
        return None;
    }

    let horizontal = event.modifiers.contains(KeyModifiers::SHIFT);
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let (screen_x, screen_y) = cell_center_px(event.column, event.row, geometry.cell_px);
            let point = geometry
                .transform
                .pick(screen_x, screen_y, geometry.image_size)?;
            Some(Command::MarkAt {
                slot: target,
                x: point.x,
                y: point.y,
            })
        }
        MouseEventKind::ScrollDown if horizontal => Some(Command::Scroll { dx: 1, dy: 0 }),
        MouseEventKind::ScrollUp if horizontal => Some(Command::Scroll { dx: -1, dy: 0 }),
        MouseEventKind::ScrollDown => Some(Command::Scroll { dx: 0, dy: 1 }),
        MouseEventKind::ScrollUp => Some(Command::Scroll { dx: 0, dy: -1 }),
        MouseEventKind::ScrollRight => Some(Command::Scroll { dx: 1, dy: 0 }),
        MouseEventKind::ScrollLeft => Some(Command::Scroll { dx: -1, dy: 0 }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
    use ratatui::layout::Rect;

    use super::{ViewerGeometry, map_mouse_to_command};
    use crate::command::Command;
    use crate::overlay::ViewportTransform;
    use crate::scale::PixelPoint;
    use crate::session::PointSlot;

    fn geometry(scroll: (f64, f64)) -> ViewerGeometry {
        // Viewer starts at cell (2, 1) with 10x20 px cells, one screen px per source px.
        ViewerGeometry {
            area: Rect::new(2, 1, 40, 20),
            cell_px: (10, 20),
            transform: ViewportTransform::new(
                (20.0, 20.0),
                PixelPoint::new(scroll.0, scroll.1),
                1.0,
            ),
            image_size: (300, 200),
        }
    }

    fn event(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn left_click_marks_current_target_at_cell_center() {
        let click = event(MouseEventKind::Down(MouseButton::Left), 4, 2);
        let command = map_mouse_to_command(click, Some(&geometry((0.0, 0.0))), PointSlot::End);
        // Cell (4, 2) centre is screen (45, 50); minus origin (20, 20).
        assert_eq!(
            command,
            Some(Command::MarkAt {
                slot: PointSlot::End,
                x: 25.0,
                y: 30.0,
            })
        );
    }

    #[test]
    fn scrolled_view_shifts_click_by_scroll_delta() {
        let click = event(MouseEventKind::Down(MouseButton::Left), 4, 2);
        let base = map_mouse_to_command(click, Some(&geometry((0.0, 0.0))), PointSlot::Start);
        let scrolled =
            map_mouse_to_command(click, Some(&geometry((120.0, 60.0))), PointSlot::Start);
        let (Some(Command::MarkAt { x: bx, y: by, .. }), Some(Command::MarkAt { x, y, .. })) =
            (base, scrolled)
        else {
            panic!("both clicks should mark");
        };
        assert_eq!((x - bx, y - by), (120.0, 60.0));
    }

    #[test]
    fn clicks_outside_viewer_or_image_are_ignored() {
        let outside_viewer = event(MouseEventKind::Down(MouseButton::Left), 0, 0);
        assert_eq!(
            map_mouse_to_command(outside_viewer, Some(&geometry((0.0, 0.0))), PointSlot::Start),
            None
        );

        // Cell (40, 15) maps past the 300 px image width.
        let past_image = event(MouseEventKind::Down(MouseButton::Left), 40, 15);
        let mut narrow = geometry((0.0, 0.0));
        narrow.image_size = (100, 100);
        assert_eq!(
            map_mouse_to_command(past_image, Some(&narrow), PointSlot::Start),
            None
        );

        let click = event(MouseEventKind::Down(MouseButton::Left), 4, 2);
        assert_eq!(map_mouse_to_command(click, None, PointSlot::Start), None);
    }

    #[test]
    fn wheel_scrolls_and_shift_wheel_scrolls_sideways() {
        let down = event(MouseEventKind::ScrollDown, 5, 5);
        assert_eq!(
            map_mouse_to_command(down, Some(&geometry((0.0, 0.0))), PointSlot::Start),
            Some(Command::Scroll { dx: 0, dy: 1 })
        );
        let mut sideways = event(MouseEventKind::ScrollUp, 5, 5);
        sideways.modifiers = KeyModifiers::SHIFT;
        assert_eq!(
            map_mouse_to_command(sideways, Some(&geometry((0.0, 0.0))), PointSlot::Start),
            Some(Command::Scroll { dx: -1, dy: 0 })
        );
    }
}
