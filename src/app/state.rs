use crate::command::ActionId;
use crate::prompt::PromptKind;
use crate::scale::PixelPoint;
use crate::session::{Action, Effect, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Prompt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptRequest {
    Open {
        kind: PromptKind,
        seed: Option<String>,
    },
    Close,
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: String,
    pub last_action_id: Option<ActionId>,
}

/// Display-only state. None of it affects the exported document.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Multiplier on the fit-to-viewer scale.
    pub zoom: f64,
    /// Source pixel shown at the viewer's top-left corner.
    pub scroll: PixelPoint,
    pub cursor: PixelPoint,
    pub preview: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            scroll: PixelPoint::new(0.0, 0.0),
            cursor: PixelPoint::new(0.0, 0.0),
            preview: false,
        }
    }
}

impl ViewState {
    pub fn centered_on(image_size: (u32, u32)) -> Self {
        Self {
            cursor: PixelPoint::new(
                f64::from(image_size.0 / 2),
                f64::from(image_size.1 / 2),
            ),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub session: Session,
    pub view: ViewState,
    pub mode: Mode,
    pub status: StatusState,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            ..Self::default()
        }
    }

    /// Runs one session action in place and hands back its effect.
    pub fn apply(&mut self, action: Action) -> Option<Effect> {
        let transition = std::mem::take(&mut self.session).apply(action);
        self.session = transition.session;
        transition.effect
    }

    pub fn set_status(&mut self, id: ActionId, message: impl Into<String>) {
        self.status.last_action_id = Some(id);
        self.status.message = message.into();
    }
}
