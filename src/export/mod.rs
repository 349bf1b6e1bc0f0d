//! Scale-and-export engine: validated inputs in, finalized PDF bytes out.

mod headless;
mod pdf;
mod raster;
mod save;
mod worker;

use std::sync::Arc;

use tracing::{debug, info};

use crate::backend::SourceImage;
use crate::config::{ExportConfig, RasterEncoding};
use crate::error::{AppError, AppResult};
use crate::scale::{ExportBlocked, MarkedPoint, PrintLayout, ScaleInputs, ScaleRequest};

pub use headless::{HeadlessExport, HeadlessReport, run_headless};
pub use save::{default_output_path, save_document};
pub use worker::{ExportCompletion, ExportJob, PendingExport, spawn_export};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportOptions {
    pub encoding: RasterEncoding,
    pub jpeg_quality: u8,
    pub max_dpi: Option<f64>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::from(&ExportConfig::default())
    }
}

impl From<&ExportConfig> for ExportOptions {
    fn from(config: &ExportConfig) -> Self {
        Self {
            encoding: config.encoding,
            jpeg_quality: config.jpeg_quality,
            max_dpi: config.max_dpi(),
        }
    }
}

/// A finalized single-page document.
#[derive(Debug, Clone)]
pub struct OutputDocument {
    pub layout: PrintLayout,
    /// Pixel size of the embedded raster.
    pub raster_size: (u32, u32),
    pub bytes: Arc<Vec<u8>>,
}

impl OutputDocument {
    pub fn zoom_factor(&self) -> f64 {
        self.layout.zoom_factor
    }

    pub fn page_size_pt(&self) -> (f64, f64) {
        (self.layout.page_width_pt, self.layout.page_height_pt)
    }

    pub fn size_on_paper_inches(&self) -> (f64, f64) {
        self.layout.size_on_paper_inches()
    }

    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }
}

pub struct ExportInputs<'a> {
    pub image: Option<&'a SourceImage>,
    pub start: MarkedPoint,
    pub end: MarkedPoint,
    pub physical_distance: f64,
    pub desired_scale: f64,
}

/// Validates every precondition, then builds the document.
pub fn compute_and_export(
    inputs: ExportInputs<'_>,
    options: &ExportOptions,
) -> AppResult<OutputDocument> {
    let request = ScaleInputs {
        image_size: inputs.image.map(SourceImage::dimensions),
        start: inputs.start,
        end: inputs.end,
        physical_distance: inputs.physical_distance,
        desired_scale: inputs.desired_scale,
    }
    .validate()?;
    let image = inputs.image.ok_or(ExportBlocked::NoImage)?;
    render_document(image, &request, options)
}

pub(crate) fn render_document(
    image: &SourceImage,
    request: &ScaleRequest,
    options: &ExportOptions,
) -> AppResult<OutputDocument> {
    if image.dimensions() != request.image_size {
        return Err(AppError::invalid_argument(
            "image changed after the export was requested",
        ));
    }

    let layout = request.layout();
    let resized = match raster::downsample_target(image.dimensions(), &layout, options.max_dpi) {
        Some((width, height)) => {
            debug!(width, height, "downsampling raster for export");
            Some(raster::downsample(image.pixels(), width, height)?)
        }
        None => None,
    };
    let pixels = resized.as_ref().unwrap_or(image.pixels());
    let encoded = raster::encode_raster(
        pixels,
        image.has_alpha(),
        options.encoding,
        options.jpeg_quality,
    )?;
    let bytes = pdf::write_document(&layout, &encoded, &image.file_name());

    info!(
        zoom_factor = layout.zoom_factor,
        page_width_pt = layout.page_width_pt,
        page_height_pt = layout.page_height_pt,
        bytes = bytes.len(),
        "export finalized"
    );

    Ok(OutputDocument {
        layout,
        raster_size: (encoded.width, encoded.height),
        bytes: Arc::new(bytes),
    })
}
