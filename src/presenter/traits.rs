use image::RgbaImage;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::error::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterKind {
    RatatuiImage,
}

/// Identity of one prepared display frame. Equal keys mean the terminal
/// encoding can be reused as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameKey(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresenterCaps {
    pub backend_name: &'static str,
    pub cell_px: (u16, u16),
}

pub trait ImagePresenter {
    fn initialize_terminal(&mut self) -> AppResult<()> {
        Ok(())
    }

    fn status_label(&self) -> String {
        self.capabilities().backend_name.to_string()
    }

    fn is_prepared(&self, key: FrameKey) -> bool;

    /// Encodes `frame` for the terminal. The frame is drawn unscaled from the
    /// top-left of the area handed to [`ImagePresenter::render`].
    fn prepare(&mut self, key: FrameKey, frame: RgbaImage) -> AppResult<()>;

    fn clear(&mut self);

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect) -> AppResult<bool>;

    fn capabilities(&self) -> PresenterCaps;
}
