use std::collections::VecDeque;
use std::path::PathBuf;

use image::RgbaImage;

use crate::command::Command;
use crate::config::Config;
use crate::error::AppResult;
use crate::input::mouse::ViewerGeometry;
use crate::overlay::MarkerStyle;
use crate::presenter::{ImagePresenter, PresenterKind, create_presenter};
use crate::prompt::PromptManager;
use crate::session::Session;

use super::state::{AppState, PromptRequest};

/// Page 1 of the finalized document, rasterized for one viewer size.
pub(crate) struct PreviewFrame {
    /// Address of the document's byte buffer; identifies the export.
    pub document: usize,
    pub viewer_px: (u32, u32),
    pub image: RgbaImage,
}

pub struct RenderSubsystem {
    pub presenter: Box<dyn ImagePresenter>,
    pub(crate) preview: Option<PreviewFrame>,
    pub(crate) geometry: Option<ViewerGeometry>,
}

#[derive(Default)]
pub struct InteractionSubsystem {
    pub prompt: PromptManager,
    pub pending_requests: VecDeque<PromptRequest>,
}

pub struct App {
    pub state: AppState,
    pub render: RenderSubsystem,
    pub interaction: InteractionSubsystem,
    pub config: Config,
}

impl App {
    pub fn new(presenter_kind: PresenterKind) -> AppResult<Self> {
        let config = Config::load()?;
        Self::new_with_config(presenter_kind, config)
    }

    pub fn new_with_config(presenter_kind: PresenterKind, config: Config) -> AppResult<Self> {
        let presenter = create_presenter(presenter_kind)?;
        let session = Session::new(
            config.export.default_scale,
            MarkerStyle::from_rgb(config.view.marker_color),
        );

        Ok(Self {
            state: AppState::new(session),
            render: RenderSubsystem {
                presenter,
                preview: None,
                geometry: None,
            },
            interaction: InteractionSubsystem::default(),
            config,
        })
    }

    /// Opens `path` the same way the `open` command does. A decode failure
    /// becomes an alert rather than an error.
    pub fn open_image(&mut self, path: PathBuf) -> AppResult<()> {
        self.dispatch_command(Command::OpenImage { path })?;
        Ok(())
    }
}
