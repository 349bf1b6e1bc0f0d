pub mod app;
pub mod backend;
pub mod command;
pub mod config;
pub mod error;
pub(crate) mod event;
pub mod export;
pub mod input;
pub mod logging;
pub mod overlay;
pub mod presenter;
pub mod prompt;
pub mod scale;
pub mod session;
pub mod ui;
