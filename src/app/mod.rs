mod core;
mod event_bus;
mod event_loop;
mod input_ops;
mod state;
pub(crate) mod terminal_session;
mod view_ops;

#[cfg(test)]
mod tests;

pub use core::App;
pub use state::{AppState, Mode, PromptRequest, StatusState, ViewState};
