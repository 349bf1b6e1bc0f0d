use crossterm::event::KeyEvent;

use crate::command::{
    ActionId, Command, CommandDispatchResult, dispatch, field_prompt_seed, parse_command_text,
};
use crate::error::AppResult;
use crate::input::keymap::{KeymapPreset, map_alert_key, map_key_to_command_with_preset};
use crate::prompt::{PromptKeyResult, PromptKind, PromptView};

use super::core::{App, InteractionSubsystem};
use super::state::{AppState, Mode, PromptRequest};

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct KeyEventOutcome {
    pub redraw: bool,
    pub command: Option<Command>,
}

impl InteractionSubsystem {
    pub(crate) fn handle_key_event(
        &mut self,
        state: &mut AppState,
        key: KeyEvent,
        keymap_preset: &str,
    ) -> KeyEventOutcome {
        if state.session.alert().is_some() {
            return KeyEventOutcome {
                redraw: false,
                command: map_alert_key(key),
            };
        }

        if state.mode == Mode::Prompt {
            return match self.prompt.handle_key(key) {
                PromptKeyResult::Consumed { redraw } => KeyEventOutcome {
                    redraw,
                    command: None,
                },
                PromptKeyResult::CloseRequested => {
                    self.prompt.close();
                    state.mode = Mode::Normal;
                    state.set_status(ActionId::ClosePrompt, "prompt closed");
                    KeyEventOutcome {
                        redraw: true,
                        command: None,
                    }
                }
                PromptKeyResult::Submit { kind, text } => {
                    state.mode = Mode::Normal;
                    let command = match submission_command(kind, text) {
                        Ok(command) => command,
                        Err(message) => {
                            state.set_status(ActionId::OpenPrompt, message);
                            None
                        }
                    };
                    KeyEventOutcome {
                        redraw: true,
                        command,
                    }
                }
            };
        }

        let preset = KeymapPreset::parse(keymap_preset);
        KeyEventOutcome {
            redraw: false,
            command: map_key_to_command_with_preset(key, state.mode, preset),
        }
    }

    pub(crate) fn prompt_view(&self) -> Option<PromptView> {
        self.prompt.view()
    }

    pub(crate) fn apply_prompt_requests(&mut self, state: &mut AppState) -> bool {
        let mut changed = false;
        while let Some(request) = self.pending_requests.pop_front() {
            match request {
                PromptRequest::Open { kind, seed } => {
                    let initial = seed.unwrap_or_else(|| field_prompt_seed(state, kind));
                    self.prompt.open(kind, initial);
                    state.mode = Mode::Prompt;
                    changed = true;
                }
                PromptRequest::Close => {
                    if self.prompt.close() {
                        state.mode = Mode::Normal;
                        state.set_status(ActionId::ClosePrompt, "prompt closed");
                        changed = true;
                    }
                }
            }
        }

        if !self.prompt.is_open() && state.mode == Mode::Prompt {
            state.mode = Mode::Normal;
            changed = true;
        }
        changed
    }
}

impl App {
    pub(crate) fn dispatch_command(&mut self, command: Command) -> AppResult<CommandDispatchResult> {
        let result = dispatch(
            &mut self.state,
            command,
            &self.config,
            &mut self.interaction.pending_requests,
        )?;
        self.interaction.apply_prompt_requests(&mut self.state);
        Ok(result)
    }
}

/// Command produced by submitting a prompt. Field prompts always yield a
/// setter, even for text that does not parse, so the export check reports it.
fn submission_command(kind: PromptKind, text: String) -> Result<Option<Command>, String> {
    match kind {
        PromptKind::Command if text.is_empty() => Ok(None),
        PromptKind::Command => parse_command_text(&text)
            .map(Some)
            .map_err(|err| err.to_string()),
        PromptKind::PhysicalDistance => Ok(Some(Command::SetPhysicalDistance { value: text })),
        PromptKind::DesiredScale => Ok(Some(Command::SetDesiredScale { value: text })),
    }
}
