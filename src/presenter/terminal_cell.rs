use crossterm::terminal;
use ratatui_image::picker::{Capability, Picker, ProtocolType};

/// Pixel size assumed for one cell when the terminal reports nothing.
pub(crate) const FALLBACK_CELL_PX: (u16, u16) = (8, 16);

/// Rebuilds `picker` when the window metrics disagree with its font size, so
/// pixel math for clicks and frames matches what the terminal draws.
pub(crate) fn picker_with_resolved_cell_size(
    picker: Picker,
    protocol_type: ProtocolType,
) -> Picker {
    let current = picker.font_size();
    let resolved = cell_size_from_window_size()
        .or_else(|| cell_size_from_capabilities(&picker))
        .unwrap_or(current);
    if resolved == current {
        return picker;
    }

    #[allow(deprecated)]
    let mut rebuilt = Picker::from_fontsize(resolved);
    rebuilt.set_protocol_type(protocol_type);
    rebuilt
}

pub(crate) fn sanitize_cell_px(cell_px: (u16, u16)) -> (u16, u16) {
    if cell_px.0 == 0 || cell_px.1 == 0 {
        return FALLBACK_CELL_PX;
    }
    cell_px
}

fn cell_size_from_capabilities(picker: &Picker) -> Option<(u16, u16)> {
    picker.capabilities().iter().find_map(|cap| match cap {
        Capability::CellSize(Some((width, height))) if *width > 0 && *height > 0 => {
            Some((*width, *height))
        }
        _ => None,
    })
}

fn cell_size_from_window_size() -> Option<(u16, u16)> {
    let window = terminal::window_size().ok()?;
    cell_size_from_window_metrics(window.width, window.height, window.columns, window.rows)
}

pub(crate) fn cell_size_from_window_metrics(
    width_px: u16,
    height_px: u16,
    columns: u16,
    rows: u16,
) -> Option<(u16, u16)> {
    if width_px == 0 || height_px == 0 || columns == 0 || rows == 0 {
        return None;
    }
    let cell = (width_px / columns, height_px / rows);
    (cell.0 > 0 && cell.1 > 0).then_some(cell)
}

pub(crate) fn protocol_type_label(protocol: ProtocolType) -> &'static str {
    match protocol {
        ProtocolType::Halfblocks => "halfblocks",
        ProtocolType::Sixel => "sixel",
        ProtocolType::Kitty => "kitty",
        ProtocolType::Iterm2 => "iterm2",
    }
}
