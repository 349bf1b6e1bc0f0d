mod config_init;
mod render_frame;
