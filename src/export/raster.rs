use fast_image_resize as fr;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, RgbaImage};
use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::config::RasterEncoding;
use crate::error::{AppError, AppResult};
use crate::scale::{PDF_POINTS_PER_INCH, PrintLayout};

pub(crate) const DOWNSAMPLE_FILTER: fr::FilterType = fr::FilterType::CatmullRom;
pub(crate) const FLATE_LEVEL: u8 = 6;

/// Image XObject payloads ready to be embedded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EncodedRaster {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) encoding: RasterEncoding,
    /// RGB samples, zlib- or JPEG-compressed, or raw.
    pub(crate) color: Vec<u8>,
    /// Gray soft mask, same encoding as `color`.
    pub(crate) alpha: Option<Vec<u8>>,
}

/// Pixel size the embedded raster should have, or `None` to keep the source.
pub(crate) fn downsample_target(
    source: (u32, u32),
    layout: &PrintLayout,
    max_dpi: Option<f64>,
) -> Option<(u32, u32)> {
    let max_dpi = max_dpi?;
    let (width, height) = source;
    if width == 0 || height == 0 || layout.image_width_pt <= 0.0 {
        return None;
    }

    let print_width_in = layout.image_width_pt / PDF_POINTS_PER_INCH;
    let print_height_in = layout.image_height_pt / PDF_POINTS_PER_INCH;
    let effective_dpi = f64::from(width) / print_width_in;
    if !effective_dpi.is_finite() || effective_dpi <= max_dpi {
        return None;
    }

    let target_width = (print_width_in * max_dpi).round().max(1.0) as u32;
    let target_height = (print_height_in * max_dpi).round().max(1.0) as u32;
    Some((target_width.min(width), target_height.min(height)))
}

pub(crate) fn downsample(image: &RgbaImage, width: u32, height: u32) -> AppResult<RgbaImage> {
    let src = fr::images::Image::from_vec_u8(
        image.width(),
        image.height(),
        image.as_raw().clone(),
        fr::PixelType::U8x4,
    )
    .map_err(|_| AppError::invalid_argument("rgba pixels length does not match dimensions"))?;

    let mut dst = fr::images::Image::new(width, height, fr::PixelType::U8x4);
    let mut resizer = fr::Resizer::new();
    let options =
        fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Convolution(DOWNSAMPLE_FILTER));
    resizer
        .resize(&src, &mut dst, &options)
        .map_err(AppError::raster_encode)?;

    RgbaImage::from_raw(width, height, dst.into_vec())
        .ok_or(AppError::unsupported("resized raster has an unexpected length"))
}

pub(crate) fn encode_raster(
    image: &RgbaImage,
    with_alpha: bool,
    encoding: RasterEncoding,
    jpeg_quality: u8,
) -> AppResult<EncodedRaster> {
    let (width, height) = image.dimensions();
    let pixel_count = (width as usize).saturating_mul(height as usize);

    let mut rgb = Vec::with_capacity(pixel_count.saturating_mul(3));
    let mut gray = with_alpha.then(|| Vec::with_capacity(pixel_count));
    for pixel in image.pixels() {
        let [r, g, b, a] = pixel.0;
        rgb.extend_from_slice(&[r, g, b]);
        if let Some(gray) = gray.as_mut() {
            gray.push(a);
        }
    }

    let (color, alpha) = match encoding {
        RasterEncoding::Raw => (rgb, gray),
        RasterEncoding::Flate => (
            compress_to_vec_zlib(&rgb, FLATE_LEVEL),
            gray.map(|gray| compress_to_vec_zlib(&gray, FLATE_LEVEL)),
        ),
        RasterEncoding::Jpeg => {
            let color = encode_jpeg(&rgb, width, height, ExtendedColorType::Rgb8, jpeg_quality)?;
            let alpha = gray
                .map(|gray| encode_jpeg(&gray, width, height, ExtendedColorType::L8, jpeg_quality))
                .transpose()?;
            (color, alpha)
        }
    };

    Ok(EncodedRaster {
        width,
        height,
        encoding,
        color,
        alpha,
    })
}

fn encode_jpeg(
    samples: &[u8],
    width: u32,
    height: u32,
    color_type: ExtendedColorType,
    quality: u8,
) -> AppResult<Vec<u8>> {
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100))
        .encode(samples, width, height, color_type)
        .map_err(AppError::raster_encode)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use miniz_oxide::inflate::decompress_to_vec_zlib;

    use super::{downsample, downsample_target, encode_raster};
    use crate::config::RasterEncoding;
    use crate::scale::PrintLayout;

    #[test]
    fn downsample_target_only_applies_above_max_dpi() {
        // 720 px printed 2 inches wide is 360 dpi.
        let layout = PrintLayout::new(720, 360, 0.2);
        assert_eq!(downsample_target((720, 360), &layout, None), None);
        assert_eq!(downsample_target((720, 360), &layout, Some(400.0)), None);
        assert_eq!(
            downsample_target((720, 360), &layout, Some(180.0)),
            Some((360, 180))
        );
    }

    #[test]
    fn downsample_resizes_to_requested_dimensions() {
        let image = RgbaImage::from_pixel(40, 20, Rgba([200, 100, 50, 255]));
        let resized = downsample(&image, 10, 5).expect("downsample should succeed");
        assert_eq!(resized.dimensions(), (10, 5));
        let pixel = resized.get_pixel(4, 2).0;
        for (got, want) in pixel.iter().zip([200u8, 100, 50, 255]) {
            assert!(got.abs_diff(want) <= 1, "channel {got} drifted from {want}");
        }
    }

    #[test]
    fn raw_encoding_splits_color_and_alpha() {
        let mut image = RgbaImage::from_pixel(2, 1, Rgba([1, 2, 3, 255]));
        image.put_pixel(1, 0, Rgba([4, 5, 6, 7]));

        let raster = encode_raster(&image, true, RasterEncoding::Raw, 90).expect("raw encode");
        assert_eq!(raster.color, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(raster.alpha, Some(vec![255, 7]));

        let opaque = encode_raster(&image, false, RasterEncoding::Raw, 90).expect("raw encode");
        assert_eq!(opaque.alpha, None);
    }

    #[test]
    fn jpeg_encoding_produces_jfif_streams() {
        let image = RgbaImage::from_pixel(16, 16, Rgba([90, 120, 150, 128]));
        let raster = encode_raster(&image, true, RasterEncoding::Jpeg, 80).expect("jpeg encode");
        assert_eq!(raster.encoding, RasterEncoding::Jpeg);
        assert!(raster.color.starts_with(&[0xFF, 0xD8]));
        let alpha = raster.alpha.expect("alpha mask should be present");
        assert!(alpha.starts_with(&[0xFF, 0xD8]));
    }

    #[test]
    fn flate_encoding_is_lossless_for_line_art() {
        let mut image = RgbaImage::from_pixel(64, 64, Rgba([255, 255, 255, 255]));
        for i in 0..64 {
            image.put_pixel(i, 32, Rgba([0, 0, 0, 255]));
            image.put_pixel(i, i, Rgba([12, 34, 56, 200]));
        }

        let raster = encode_raster(&image, true, RasterEncoding::Flate, 90).expect("flate encode");
        let raw = encode_raster(&image, true, RasterEncoding::Raw, 90).expect("raw encode");
        assert_eq!(raster.encoding, RasterEncoding::Flate);
        assert!(raster.color.len() < raw.color.len());

        let color = decompress_to_vec_zlib(&raster.color).expect("color stream should inflate");
        assert_eq!(color, raw.color);
        let alpha = raster.alpha.as_deref().expect("alpha mask should be present");
        let alpha = decompress_to_vec_zlib(alpha).expect("alpha stream should inflate");
        assert_eq!(Some(alpha), raw.alpha);
    }
}
