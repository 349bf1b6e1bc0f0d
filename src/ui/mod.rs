mod chrome;
mod layout;
mod overlay;

pub use chrome::{draw_settings_panel, draw_status};
pub use layout::{PANEL_WIDTH, UiLayout, split_layout};
pub use overlay::{draw_alert_overlay, draw_placeholder, draw_prompt_overlay};
