use crossterm::event::{Event, KeyEventKind};

use crate::app::App;
use crate::app::Mode;
use crate::command::Command;

use super::mouse::map_mouse_to_command;

#[derive(Debug, Default)]
pub(crate) struct InputEventOutcome {
    pub(crate) redraw: bool,
    pub(crate) command: Option<Command>,
}

impl App {
    pub(crate) fn handle_input_event(&mut self, event: Event) -> InputEventOutcome {
        match event {
            Event::Key(key) if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) => {
                let outcome = self.interaction.handle_key_event(
                    &mut self.state,
                    key,
                    &self.config.keymap.preset,
                );
                InputEventOutcome {
                    redraw: outcome.redraw,
                    command: outcome.command,
                }
            }
            Event::Mouse(mouse) => {
                // The preview and modal overlays cover the image.
                if self.state.view.preview
                    || self.state.mode == Mode::Prompt
                    || self.state.session.alert().is_some()
                {
                    return InputEventOutcome::default();
                }
                InputEventOutcome {
                    redraw: false,
                    command: map_mouse_to_command(
                        mouse,
                        self.render.geometry.as_ref(),
                        self.state.session.target(),
                    ),
                }
            }
            Event::Resize(_, _) => InputEventOutcome {
                redraw: true,
                command: None,
            },
            _ => InputEventOutcome::default(),
        }
    }
}
