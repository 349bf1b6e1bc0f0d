use crossterm::event::Event;

use crate::command::Command;

#[derive(Debug)]
pub(crate) enum DomainEvent {
    Input(Event),
    InputError(String),
    Command(Command),
}
