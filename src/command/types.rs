use std::path::PathBuf;

use crate::prompt::PromptKind;
use crate::session::PointSlot;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    OpenImage { path: PathBuf },
    SelectTarget { slot: PointSlot },
    MarkAt { slot: PointSlot, x: f64, y: f64 },
    MarkAtCursor,
    MoveCursor { dx: i32, dy: i32 },
    Scroll { dx: i32, dy: i32 },
    SetZoom { value: f64 },
    ZoomIn,
    ZoomOut,
    SetPhysicalDistance { value: String },
    SetDesiredScale { value: String },
    OpenPrompt {
        kind: PromptKind,
        seed: Option<String>,
    },
    ClosePrompt,
    Export,
    Save { path: Option<PathBuf> },
    TogglePreview,
    DismissAlert,
    Cancel,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionId {
    OpenImage,
    SelectTarget,
    Mark,
    MoveCursor,
    Scroll,
    SetZoom,
    ZoomIn,
    ZoomOut,
    SetPhysicalDistance,
    SetDesiredScale,
    OpenPrompt,
    ClosePrompt,
    Export,
    ExportComplete,
    Save,
    TogglePreview,
    DismissAlert,
    Cancel,
    Quit,
    Input,
    RenderFrame,
}

impl ActionId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenImage => "open-image",
            Self::SelectTarget => "select-target",
            Self::Mark => "mark",
            Self::MoveCursor => "move-cursor",
            Self::Scroll => "scroll",
            Self::SetZoom => "set-zoom",
            Self::ZoomIn => "zoom-in",
            Self::ZoomOut => "zoom-out",
            Self::SetPhysicalDistance => "set-physical-distance",
            Self::SetDesiredScale => "set-desired-scale",
            Self::OpenPrompt => "open-prompt",
            Self::ClosePrompt => "close-prompt",
            Self::Export => "export",
            Self::ExportComplete => "export-complete",
            Self::Save => "save",
            Self::TogglePreview => "toggle-preview",
            Self::DismissAlert => "dismiss-alert",
            Self::Cancel => "cancel",
            Self::Quit => "quit",
            Self::Input => "input",
            Self::RenderFrame => "render-frame",
        }
    }
}

impl Command {
    pub fn action_id(&self) -> ActionId {
        match self {
            Self::OpenImage { .. } => ActionId::OpenImage,
            Self::SelectTarget { .. } => ActionId::SelectTarget,
            Self::MarkAt { .. } | Self::MarkAtCursor => ActionId::Mark,
            Self::MoveCursor { .. } => ActionId::MoveCursor,
            Self::Scroll { .. } => ActionId::Scroll,
            Self::SetZoom { .. } => ActionId::SetZoom,
            Self::ZoomIn => ActionId::ZoomIn,
            Self::ZoomOut => ActionId::ZoomOut,
            Self::SetPhysicalDistance { .. } => ActionId::SetPhysicalDistance,
            Self::SetDesiredScale { .. } => ActionId::SetDesiredScale,
            Self::OpenPrompt { .. } => ActionId::OpenPrompt,
            Self::ClosePrompt => ActionId::ClosePrompt,
            Self::Export => ActionId::Export,
            Self::Save { .. } => ActionId::Save,
            Self::TogglePreview => ActionId::TogglePreview,
            Self::DismissAlert => ActionId::DismissAlert,
            Self::Cancel => ActionId::Cancel,
            Self::Quit => ActionId::Quit,
        }
    }

    /// Commands still honoured while an alert is showing.
    pub fn allowed_during_alert(&self) -> bool {
        matches!(self, Self::DismissAlert | Self::Cancel | Self::Quit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    F64,
    Path,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgSpec {
    pub name: &'static str,
    pub kind: ArgKind,
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub id: &'static str,
    pub title: &'static str,
    pub args: &'static [ArgSpec],
}

impl CommandSpec {
    pub fn usage(&self) -> String {
        let mut usage = self.id.to_string();
        for arg in self.args {
            if arg.required {
                usage.push_str(&format!(" <{}>", arg.name));
            } else {
                usage.push_str(&format!(" [{}]", arg.name));
            }
        }
        usage
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    Noop,
    QuitRequested,
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::prompt::PromptKind;
    use crate::session::PointSlot;

    use super::{ActionId, Command};

    #[test]
    fn command_action_id_groups_marking_variants() {
        assert_eq!(Command::MarkAtCursor.action_id(), ActionId::Mark);
        assert_eq!(
            Command::MarkAt {
                slot: PointSlot::End,
                x: 1.0,
                y: 2.0,
            }
            .action_id(),
            ActionId::Mark
        );
        assert_eq!(
            Command::Save { path: None }.action_id().as_str(),
            "save"
        );
        assert_eq!(
            Command::OpenPrompt {
                kind: PromptKind::Command,
                seed: Some("open ".to_string()),
            }
            .action_id(),
            ActionId::OpenPrompt
        );
    }

    #[test]
    fn only_dismissal_and_quit_pass_an_alert() {
        assert!(Command::DismissAlert.allowed_during_alert());
        assert!(Command::Quit.allowed_during_alert());
        assert!(!Command::Export.allowed_during_alert());
        assert!(
            !Command::OpenImage {
                path: PathBuf::from("a.png")
            }
            .allowed_during_alert()
        );
    }
}
