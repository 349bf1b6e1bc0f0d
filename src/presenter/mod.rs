mod factory;
mod image_ops;
mod ratatui;
mod terminal_cell;
mod traits;

pub use factory::create_presenter;
pub use image_ops::{DisplayRequest, build_display_frame};
pub use ratatui::RatatuiImagePresenter;
pub use traits::{FrameKey, ImagePresenter, PresenterCaps, PresenterKind};
