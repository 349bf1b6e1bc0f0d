use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::command::command_registry;

use super::kind::PromptKind;

const MAX_HINTS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptView {
    pub title: String,
    pub kind: PromptKind,
    pub input: String,
    pub cursor: usize,
    pub hints: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKeyResult {
    Consumed { redraw: bool },
    CloseRequested,
    Submit { kind: PromptKind, text: String },
}

#[derive(Debug)]
struct PromptSession {
    kind: PromptKind,
    input: Input,
}

#[derive(Debug, Default)]
pub struct PromptManager {
    active: Option<PromptSession>,
}

impl PromptManager {
    pub fn open(&mut self, kind: PromptKind, initial: String) {
        self.active = Some(PromptSession {
            kind,
            input: Input::new(initial),
        });
    }

    pub fn close(&mut self) -> bool {
        self.active.take().is_some()
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    pub fn kind(&self) -> Option<PromptKind> {
        self.active.as_ref().map(|session| session.kind)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PromptKeyResult {
        let Some(session) = self.active.as_mut() else {
            return PromptKeyResult::Consumed { redraw: false };
        };

        match key.code {
            KeyCode::Esc => return PromptKeyResult::CloseRequested,
            KeyCode::Char('g') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return PromptKeyResult::CloseRequested;
            }
            KeyCode::Enter => {
                let kind = session.kind;
                let text = session.input.value().trim().to_string();
                self.active = None;
                return PromptKeyResult::Submit { kind, text };
            }
            KeyCode::Tab if session.kind == PromptKind::Command => {
                let value = session.input.value();
                if let Some(completed) = complete_command_id(value) {
                    session.input = Input::new(completed);
                    return PromptKeyResult::Consumed { redraw: true };
                }
                return PromptKeyResult::Consumed { redraw: false };
            }
            _ => {}
        }

        let changed = session.input.handle_event(&Event::Key(key)).is_some();
        PromptKeyResult::Consumed { redraw: changed }
    }

    pub fn view(&self) -> Option<PromptView> {
        let session = self.active.as_ref()?;
        let hints = match session.kind {
            PromptKind::Command => command_hints(session.input.value()),
            PromptKind::PhysicalDistance | PromptKind::DesiredScale => Vec::new(),
        };
        Some(PromptView {
            title: session.kind.title().to_string(),
            kind: session.kind,
            input: session.input.value().to_string(),
            cursor: session.input.visual_cursor(),
            hints,
        })
    }
}

/// Usage lines of the commands whose id starts with the typed word.
fn command_hints(input: &str) -> Vec<String> {
    let word = input.trim_start();
    if word.contains(char::is_whitespace) {
        let id = word.split_whitespace().next().unwrap_or_default();
        return command_registry()
            .iter()
            .filter(|spec| spec.id == id)
            .map(|spec| spec.usage())
            .collect();
    }
    command_registry()
        .iter()
        .filter(|spec| spec.id.starts_with(word))
        .take(MAX_HINTS)
        .map(|spec| spec.usage())
        .collect()
}

fn complete_command_id(input: &str) -> Option<String> {
    let word = input.trim_start();
    if word.is_empty() || word.contains(char::is_whitespace) {
        return None;
    }
    let mut matches = command_registry()
        .iter()
        .filter(|spec| spec.id.starts_with(word));
    let first = matches.next()?;
    if matches.next().is_some() {
        return None;
    }
    Some(format!("{} ", first.id))
}
