mod handler;
pub mod keymap;
pub mod mouse;
