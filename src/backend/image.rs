use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader, RgbaImage};

use crate::error::{AppError, AppResult};

/// A decoded reference image. Cloning shares the pixel buffer.
#[derive(Debug, Clone)]
pub struct SourceImage {
    path: PathBuf,
    pixels: Arc<RgbaImage>,
    has_alpha: bool,
}

impl SourceImage {
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(AppError::invalid_argument("image path must not be empty"));
        }
        if !path.exists() {
            return Err(AppError::io_with_context(
                std::io::Error::new(std::io::ErrorKind::NotFound, "missing file"),
                format!("image file not found: {}", path.display()),
            ));
        }
        if !path.is_file() {
            return Err(AppError::invalid_argument("image path must be a regular file"));
        }

        let reader = ImageReader::open(path)
            .map_err(|source| {
                AppError::io_with_context(source, format!("failed to open {}", path.display()))
            })?
            .with_guessed_format()
            .map_err(|source| {
                AppError::io_with_context(source, format!("failed to read {}", path.display()))
            })?;
        let decode_error = |source| AppError::image_decode(source, path.display().to_string());
        let mut decoder = reader.into_decoder().map_err(decode_error)?;
        let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
        let mut decoded = DynamicImage::from_decoder(decoder).map_err(decode_error)?;
        decoded.apply_orientation(orientation);
        let has_alpha = decoded.color().has_alpha();

        Ok(Self::from_parts(path, decoded.into_rgba8(), has_alpha))
    }

    pub fn from_rgba(path: impl Into<PathBuf>, pixels: RgbaImage) -> Self {
        let has_alpha = pixels.pixels().any(|pixel| pixel.0[3] != u8::MAX);
        Self::from_parts(path, pixels, has_alpha)
    }

    fn from_parts(path: impl Into<PathBuf>, pixels: RgbaImage, has_alpha: bool) -> Self {
        Self {
            path: path.into(),
            pixels: Arc::new(pixels),
            has_alpha,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_owned)
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn shared_pixels(&self) -> Arc<RgbaImage> {
        Arc::clone(&self.pixels)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Whether any pixel can be non-opaque.
    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }
}
