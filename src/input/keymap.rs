use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::Mode;
use crate::command::Command;
use crate::prompt::PromptKind;
use crate::session::PointSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeymapPreset {
    Default,
    Emacs,
}

impl KeymapPreset {
    pub fn parse(value: &str) -> Self {
        match value {
            "default" => Self::Default,
            "emacs" => Self::Emacs,
            _ => Self::Default,
        }
    }
}

pub fn map_key_to_command(key: KeyEvent, mode: Mode) -> Option<Command> {
    map_key_to_command_with_preset(key, mode, KeymapPreset::Default)
}

pub fn map_key_to_command_with_preset(
    key: KeyEvent,
    mode: Mode,
    preset: KeymapPreset,
) -> Option<Command> {
    match mode {
        Mode::Normal => match preset {
            KeymapPreset::Default => map_normal_mode_key_default(key),
            KeymapPreset::Emacs => map_normal_mode_key_emacs(key),
        },
        Mode::Prompt => None,
    }
}

/// Keys honoured while an alert is on screen.
pub fn map_alert_key(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => Some(Command::Quit),
            KeyCode::Char('g') => Some(Command::DismissAlert),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ') => Some(Command::DismissAlert),
        KeyCode::Char('q') => Some(Command::Quit),
        _ => None,
    }
}

fn map_normal_mode_key_default(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Command::Quit),
            _ => None,
        };
    }

    if key.modifiers.contains(KeyModifiers::SHIFT)
        && let Some((dx, dy)) = arrow_delta(key.code)
    {
        return Some(Command::Scroll { dx, dy });
    }
    if let Some((dx, dy)) = arrow_delta(key.code) {
        return Some(Command::MoveCursor { dx, dy });
    }

    match key.code {
        KeyCode::Char('s') => Some(Command::SelectTarget {
            slot: PointSlot::Start,
        }),
        KeyCode::Char('e') => Some(Command::SelectTarget {
            slot: PointSlot::End,
        }),
        KeyCode::Char('h') => Some(Command::MoveCursor { dx: -1, dy: 0 }),
        KeyCode::Char('j') => Some(Command::MoveCursor { dx: 0, dy: 1 }),
        KeyCode::Char('k') => Some(Command::MoveCursor { dx: 0, dy: -1 }),
        KeyCode::Char('l') => Some(Command::MoveCursor { dx: 1, dy: 0 }),
        KeyCode::Char('H') => Some(Command::Scroll { dx: -1, dy: 0 }),
        KeyCode::Char('J') => Some(Command::Scroll { dx: 0, dy: 1 }),
        KeyCode::Char('K') => Some(Command::Scroll { dx: 0, dy: -1 }),
        KeyCode::Char('L') => Some(Command::Scroll { dx: 1, dy: 0 }),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Command::MarkAtCursor),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Command::ZoomIn),
        KeyCode::Char('-') => Some(Command::ZoomOut),
        KeyCode::Char('0') => Some(Command::SetZoom { value: 1.0 }),
        KeyCode::Char('d') => Some(Command::OpenPrompt {
            kind: PromptKind::PhysicalDistance,
            seed: None,
        }),
        KeyCode::Char('c') => Some(Command::OpenPrompt {
            kind: PromptKind::DesiredScale,
            seed: None,
        }),
        KeyCode::Char('r') => Some(Command::Export),
        KeyCode::Char('w') => Some(Command::Save { path: None }),
        KeyCode::Char('p') => Some(Command::TogglePreview),
        KeyCode::Char(':') => Some(Command::OpenPrompt {
            kind: PromptKind::Command,
            seed: None,
        }),
        KeyCode::Char('o') => Some(Command::OpenPrompt {
            kind: PromptKind::Command,
            seed: Some("open ".to_string()),
        }),
        KeyCode::Char('q') => Some(Command::Quit),
        KeyCode::Esc => Some(Command::Cancel),
        _ => None,
    }
}

fn map_normal_mode_key_emacs(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::ALT) {
        return match key.code {
            KeyCode::Char('x') => Some(Command::OpenPrompt {
                kind: PromptKind::Command,
                seed: None,
            }),
            KeyCode::Char('f') => Some(Command::Scroll { dx: 1, dy: 0 }),
            KeyCode::Char('b') => Some(Command::Scroll { dx: -1, dy: 0 }),
            KeyCode::Char('n') => Some(Command::Scroll { dx: 0, dy: 1 }),
            KeyCode::Char('p') => Some(Command::Scroll { dx: 0, dy: -1 }),
            _ => None,
        };
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('f') => Some(Command::MoveCursor { dx: 1, dy: 0 }),
            KeyCode::Char('b') => Some(Command::MoveCursor { dx: -1, dy: 0 }),
            KeyCode::Char('n') => Some(Command::MoveCursor { dx: 0, dy: 1 }),
            KeyCode::Char('p') => Some(Command::MoveCursor { dx: 0, dy: -1 }),
            KeyCode::Char('s') => Some(Command::Save { path: None }),
            KeyCode::Char('o') => Some(Command::OpenPrompt {
                kind: PromptKind::Command,
                seed: Some("open ".to_string()),
            }),
            KeyCode::Char('g') => Some(Command::Cancel),
            KeyCode::Char('q') | KeyCode::Char('c') => Some(Command::Quit),
            _ => None,
        };
    }

    map_normal_mode_key_default(key)
}

fn arrow_delta(code: KeyCode) -> Option<(i32, i32)> {
    match code {
        KeyCode::Left => Some((-1, 0)),
        KeyCode::Right => Some((1, 0)),
        KeyCode::Up => Some((0, -1)),
        KeyCode::Down => Some((0, 1)),
        _ => None,
    }
}
