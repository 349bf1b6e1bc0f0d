use image::RgbaImage;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::widgets::Clear;
use ratatui_image::Resize;
use ratatui_image::StatefulImage;
use ratatui_image::picker::{Picker, ProtocolType};
use ratatui_image::protocol::StatefulProtocol;
use tracing::debug;

use crate::error::{AppError, AppResult};

use super::image_ops::create_protocol_with_picker;
use super::terminal_cell::{
    picker_with_resolved_cell_size, protocol_type_label, sanitize_cell_px,
};
use super::traits::{FrameKey, ImagePresenter, PresenterCaps};

pub(crate) const ENCODE_FAILURE_MESSAGE: &str = "failed to encode terminal image";

pub(crate) struct PresenterConfig {
    pub(crate) picker: Picker,
    pub(crate) protocol_type: ProtocolType,
    pub(crate) protocol_label: &'static str,
}

struct PreparedFrame {
    key: FrameKey,
    size_px: (u32, u32),
    protocol: StatefulProtocol,
    failed: bool,
}

pub struct RatatuiImagePresenter {
    pub(crate) config: PresenterConfig,
    terminal_initialized: bool,
    current: Option<PreparedFrame>,
}

impl Default for RatatuiImagePresenter {
    fn default() -> Self {
        Self {
            config: PresenterConfig {
                picker: Picker::halfblocks(),
                protocol_type: ProtocolType::Halfblocks,
                protocol_label: "halfblocks",
            },
            terminal_initialized: false,
            current: None,
        }
    }
}

impl RatatuiImagePresenter {
    pub fn new() -> Self {
        Self::default()
    }

    fn cell_px(&self) -> (u16, u16) {
        sanitize_cell_px(self.config.picker.font_size())
    }

    fn draw_protocol(
        frame: &mut Frame<'_>,
        area: Rect,
        protocol: &mut StatefulProtocol,
    ) -> AppResult<()> {
        frame.render_stateful_widget(
            StatefulImage::<StatefulProtocol>::default().resize(Resize::Fit(None)),
            area,
            protocol,
        );

        if let Some(result) = protocol.last_encoding_result() {
            result.map_err(|_| AppError::unsupported(ENCODE_FAILURE_MESSAGE))?;
        }
        Ok(())
    }
}

impl ImagePresenter for RatatuiImagePresenter {
    fn initialize_terminal(&mut self) -> AppResult<()> {
        if self.terminal_initialized {
            return Ok(());
        }

        if let Ok(picker) = Picker::from_query_stdio() {
            let protocol_type = picker.protocol_type();
            self.config.protocol_type = protocol_type;
            self.config.protocol_label = protocol_type_label(protocol_type);
            self.config.picker = picker_with_resolved_cell_size(picker, protocol_type);
            self.current = None;
        }
        debug!(
            protocol = self.config.protocol_label,
            cell_px = ?self.cell_px(),
            "terminal graphics initialized"
        );

        self.terminal_initialized = true;
        Ok(())
    }

    fn status_label(&self) -> String {
        format!("ratatui-image/{}", self.config.protocol_label)
    }

    fn is_prepared(&self, key: FrameKey) -> bool {
        self.current
            .as_ref()
            .is_some_and(|prepared| prepared.key == key && !prepared.failed)
    }

    fn prepare(&mut self, key: FrameKey, frame: RgbaImage) -> AppResult<()> {
        if self.is_prepared(key) {
            return Ok(());
        }
        let size_px = frame.dimensions();
        if size_px.0 == 0 || size_px.1 == 0 {
            return Err(AppError::invalid_argument("display frame is empty"));
        }
        let protocol = create_protocol_with_picker(&self.config.picker, frame);
        self.current = Some(PreparedFrame {
            key,
            size_px,
            protocol,
            failed: false,
        });
        Ok(())
    }

    fn clear(&mut self) {
        self.current = None;
    }

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect) -> AppResult<bool> {
        if area.width == 0 || area.height == 0 {
            return Ok(false);
        }
        let cell_px = self.cell_px();
        let Some(prepared) = self.current.as_mut() else {
            return Ok(false);
        };
        if prepared.failed {
            return Err(AppError::unsupported(ENCODE_FAILURE_MESSAGE));
        }

        let width = px_to_cells(prepared.size_px.0, u32::from(cell_px.0), area.width);
        let height = px_to_cells(prepared.size_px.1, u32::from(cell_px.1), area.height);
        let render_area = Rect::new(area.x, area.y, width, height);
        frame.render_widget(Clear, area);
        if let Err(err) = Self::draw_protocol(frame, render_area, &mut prepared.protocol) {
            prepared.failed = true;
            return Err(err);
        }
        Ok(true)
    }

    fn capabilities(&self) -> PresenterCaps {
        PresenterCaps {
            backend_name: "ratatui-image",
            cell_px: self.cell_px(),
        }
    }
}

fn px_to_cells(px: u32, cell_px: u32, max_cells: u16) -> u16 {
    let cells = px.saturating_add(cell_px.saturating_sub(1)) / cell_px.max(1);
    cells.max(1).min(u32::from(max_cells)) as u16
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;

    use super::{RatatuiImagePresenter, px_to_cells};
    use crate::presenter::{FrameKey, ImagePresenter};

    #[test]
    fn px_to_cells_rounds_up_and_clamps() {
        assert_eq!(px_to_cells(17, 8, 40), 3);
        assert_eq!(px_to_cells(16, 8, 40), 2);
        assert_eq!(px_to_cells(10_000, 8, 40), 40);
        assert_eq!(px_to_cells(0, 8, 40), 1);
    }

    #[test]
    fn prepare_tracks_the_current_key() {
        let mut presenter = RatatuiImagePresenter::new();
        let frame = RgbaImage::from_pixel(16, 16, Rgba([10, 20, 30, 255]));
        assert!(!presenter.is_prepared(FrameKey(1)));

        presenter
            .prepare(FrameKey(1), frame.clone())
            .expect("prepare should succeed");
        assert!(presenter.is_prepared(FrameKey(1)));
        assert!(!presenter.is_prepared(FrameKey(2)));

        presenter.clear();
        assert!(!presenter.is_prepared(FrameKey(1)));
        assert!(presenter.prepare(FrameKey(3), RgbaImage::new(0, 0)).is_err());
    }

    #[test]
    fn render_draws_prepared_halfblocks_frame() {
        let mut presenter = RatatuiImagePresenter::new();
        presenter
            .prepare(FrameKey(7), RgbaImage::from_pixel(32, 32, Rgba([200, 0, 0, 255])))
            .expect("prepare should succeed");

        let mut terminal =
            Terminal::new(TestBackend::new(20, 10)).expect("test terminal should initialize");
        let mut drawn = false;
        terminal
            .draw(|frame| {
                drawn = presenter
                    .render(frame, Rect::new(0, 0, 20, 10))
                    .expect("render should succeed");
            })
            .expect("draw should pass");
        assert!(drawn);
    }

    #[test]
    fn render_without_frame_reports_nothing_drawn() {
        let mut presenter = RatatuiImagePresenter::new();
        let mut terminal =
            Terminal::new(TestBackend::new(10, 5)).expect("test terminal should initialize");
        let mut drawn = true;
        terminal
            .draw(|frame| {
                drawn = presenter
                    .render(frame, Rect::new(0, 0, 10, 5))
                    .expect("render should succeed");
            })
            .expect("draw should pass");
        assert!(!drawn);
    }
}
