//! Click-to-pixel translation and marker drawing for the point selection.

mod markers;
mod viewport;

pub use markers::{MarkerStyle, annotate, draw_cursor, draw_marker};
pub use viewport::{
    SourceWindow, ViewportTransform, cell_center_px, clamp_scroll, fit_scale,
};
