//! Zoom-factor computation and page geometry.
//!
//! A pixel distance between the two marked points is read as a length on
//! paper at 72 points per inch; the zoom factor rescales the whole image so
//! that length represents `physical_distance` feet at `desired_scale` feet
//! per inch.

mod geometry;

pub use geometry::{MarkedPoint, PAGE_MARGIN_PT, PDF_POINTS_PER_INCH, PixelPoint};

/// A precondition that stops an export before any document work starts.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportBlocked {
    #[error("You must select an image first")]
    NoImage,
    #[error("You must select a starting point")]
    StartUnset,
    #[error("You must select an ending point")]
    EndUnset,
    #[error("You must set physical distance")]
    PhysicalDistanceUnset,
    #[error("You must set a positive desired scale")]
    DesiredScaleUnset,
    #[error("Start and end points must not be the same pixel")]
    CoincidentPoints,
}

/// Raw user inputs, validated by [`ScaleInputs::validate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleInputs {
    pub image_size: Option<(u32, u32)>,
    pub start: MarkedPoint,
    pub end: MarkedPoint,
    pub physical_distance: f64,
    pub desired_scale: f64,
}

/// Inputs that passed every precondition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleRequest {
    pub image_size: (u32, u32),
    pub start: PixelPoint,
    pub end: PixelPoint,
    pub physical_distance: f64,
    pub desired_scale: f64,
}

impl ScaleInputs {
    pub fn validate(&self) -> Result<ScaleRequest, ExportBlocked> {
        let image_size = self.image_size.ok_or(ExportBlocked::NoImage)?;
        let start = self.start.location().ok_or(ExportBlocked::StartUnset)?;
        let end = self.end.location().ok_or(ExportBlocked::EndUnset)?;
        if !is_positive_finite(self.physical_distance) {
            return Err(ExportBlocked::PhysicalDistanceUnset);
        }
        if !is_positive_finite(self.desired_scale) {
            return Err(ExportBlocked::DesiredScaleUnset);
        }
        if pixel_distance(start, end) <= 0.0 {
            return Err(ExportBlocked::CoincidentPoints);
        }

        Ok(ScaleRequest {
            image_size,
            start,
            end,
            physical_distance: self.physical_distance,
            desired_scale: self.desired_scale,
        })
    }
}

impl ScaleRequest {
    pub fn zoom_factor(&self) -> f64 {
        zoom_factor(
            self.start,
            self.end,
            self.physical_distance,
            self.desired_scale,
        )
    }

    pub fn layout(&self) -> PrintLayout {
        PrintLayout::new(self.image_size.0, self.image_size.1, self.zoom_factor())
    }
}

pub fn pixel_distance(start: PixelPoint, end: PixelPoint) -> f64 {
    start.distance_to(end)
}

pub fn paper_distance_inches(pixel_distance: f64) -> f64 {
    pixel_distance / PDF_POINTS_PER_INCH
}

pub fn zoom_factor(
    start: PixelPoint,
    end: PixelPoint,
    physical_distance: f64,
    desired_scale: f64,
) -> f64 {
    let paper_distance = paper_distance_inches(pixel_distance(start, end));
    physical_distance / paper_distance / desired_scale
}

/// Page geometry, in PDF points, for one scaled raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrintLayout {
    pub zoom_factor: f64,
    pub image_width_pt: f64,
    pub image_height_pt: f64,
    pub page_width_pt: f64,
    pub page_height_pt: f64,
    /// Lower-left corner of the placed raster.
    pub image_origin_pt: (f64, f64),
}

impl PrintLayout {
    pub fn new(source_width: u32, source_height: u32, zoom_factor: f64) -> Self {
        let image_width_pt = f64::from(source_width) * zoom_factor;
        let image_height_pt = f64::from(source_height) * zoom_factor;
        let half_margin = PAGE_MARGIN_PT / 2.0;
        Self {
            zoom_factor,
            image_width_pt,
            image_height_pt,
            page_width_pt: image_width_pt + PAGE_MARGIN_PT,
            page_height_pt: image_height_pt + PAGE_MARGIN_PT,
            image_origin_pt: (half_margin, half_margin),
        }
    }

    pub fn size_on_paper_inches(&self) -> (f64, f64) {
        (
            self.image_width_pt / PDF_POINTS_PER_INCH,
            self.image_height_pt / PDF_POINTS_PER_INCH,
        )
    }
}

/// Rounds to two decimals for display.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn is_positive_finite(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
