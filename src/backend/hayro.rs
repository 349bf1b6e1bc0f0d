use std::sync::Arc;

use hayro::hayro_interpret::InterpreterSettings;
use hayro::hayro_syntax::Pdf;
use hayro::vello_cpu::color::palette::css::WHITE;
use hayro::{RenderSettings, render};
use image::RgbaImage;

use crate::error::{AppError, AppResult};

/// Read-only view over finalized PDF bytes, used to preview an export.
pub struct PdfPreview {
    pdf: Pdf,
}

impl PdfPreview {
    pub fn from_bytes(bytes: Arc<Vec<u8>>) -> AppResult<Self> {
        if !bytes.as_slice().starts_with(b"%PDF-") {
            return Err(AppError::invalid_argument(
                "document is not a valid PDF header",
            ));
        }
        let pdf = Pdf::new(bytes)
            .map_err(|_| AppError::invalid_argument("failed to parse PDF with hayro"))?;
        Ok(Self { pdf })
    }

    pub fn page_count(&self) -> usize {
        self.pdf.pages().len()
    }

    pub fn page_dimensions(&self, page: usize) -> AppResult<(f32, f32)> {
        let page_ref = self
            .pdf
            .pages()
            .get(page)
            .ok_or(AppError::invalid_argument("page index is out of range"))?;
        Ok(page_ref.render_dimensions())
    }

    /// Renders a page so that it fits within `max_width x max_height` pixels.
    pub fn render_fit(&self, page: usize, max_width: u32, max_height: u32) -> AppResult<RgbaImage> {
        let (width_pt, height_pt) = self.page_dimensions(page)?;
        let scale = fit_scale(width_pt, height_pt, max_width, max_height);
        self.render_page(page, scale)
    }

    pub fn render_page(&self, page: usize, scale: f32) -> AppResult<RgbaImage> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(AppError::invalid_argument(
                "scale must be a positive finite value",
            ));
        }
        let page_ref = self
            .pdf
            .pages()
            .get(page)
            .ok_or(AppError::invalid_argument("page index is out of range"))?;

        let render_settings = RenderSettings {
            x_scale: scale,
            y_scale: scale,
            bg_color: WHITE,
            ..Default::default()
        };
        let pixmap = render(
            page_ref,
            &InterpreterSettings::default(),
            &render_settings,
        );
        let (width, height) = (pixmap.width() as u32, pixmap.height() as u32);
        RgbaImage::from_raw(width, height, pixmap.data_as_u8_slice().to_vec()).ok_or(
            AppError::unsupported("rendered pixmap length does not match its dimensions"),
        )
    }
}

pub(crate) fn fit_scale(width_pt: f32, height_pt: f32, max_width: u32, max_height: u32) -> f32 {
    if width_pt <= 0.0 || height_pt <= 0.0 || max_width == 0 || max_height == 0 {
        return 1.0;
    }
    let scale = (max_width as f32 / width_pt).min(max_height as f32 / height_pt);
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}
