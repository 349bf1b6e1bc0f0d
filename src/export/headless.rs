use std::path::PathBuf;

use tracing::info;

use crate::backend::SourceImage;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::scale::{MarkedPoint, PixelPoint};
use crate::session::parse_field;

use super::{ExportInputs, ExportOptions, compute_and_export, default_output_path, save_document};

/// One export run without the terminal UI.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessExport {
    pub image: PathBuf,
    pub start: (f64, f64),
    pub end: (f64, f64),
    /// Raw text so unparseable input reports the same message as the UI.
    pub distance: String,
    /// Falls back to `export.default_scale`.
    pub scale: Option<String>,
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessReport {
    pub output: PathBuf,
    pub zoom_factor: f64,
    pub size_on_paper_inches: (f64, f64),
    pub page_size_pt: (f64, f64),
}

pub fn run_headless(job: &HeadlessExport, config: &Config) -> AppResult<HeadlessReport> {
    let image = SourceImage::open(&job.image)?;
    let start = marked_within(&image, job.start, "start")?;
    let end = marked_within(&image, job.end, "end")?;
    let desired_scale = job
        .scale
        .as_deref()
        .map(parse_field)
        .unwrap_or(config.export.default_scale);

    let document = compute_and_export(
        ExportInputs {
            image: Some(&image),
            start,
            end,
            physical_distance: parse_field(&job.distance),
            desired_scale,
        },
        &ExportOptions::from(&config.export),
    )?;

    let output = job
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(image.path(), &config.export));
    save_document(&document, &output)?;
    info!(output = %output.display(), "headless export done");

    Ok(HeadlessReport {
        output,
        zoom_factor: document.zoom_factor(),
        size_on_paper_inches: document.size_on_paper_inches(),
        page_size_pt: document.page_size_pt(),
    })
}

fn marked_within(image: &SourceImage, (x, y): (f64, f64), name: &str) -> AppResult<MarkedPoint> {
    let point = PixelPoint::new(x.floor(), y.floor());
    if !point.is_within(image.width(), image.height()) {
        return Err(AppError::invalid_argument(format!(
            "{name} point ({x}, {y}) is outside the {}x{} image",
            image.width(),
            image.height()
        )));
    }
    Ok(MarkedPoint::at(point))
}
