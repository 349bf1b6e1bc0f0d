use fast_image_resize as fr;
use image::{DynamicImage, RgbaImage};
use ratatui_image::picker::Picker;
use ratatui_image::protocol::StatefulProtocol;

use crate::error::{AppError, AppResult};
use crate::overlay::draw_cursor;
use crate::scale::PixelPoint;

pub(crate) const DOWNSCALE_FILTER: fr::FilterType = fr::FilterType::CatmullRom;

/// The visible part of a source raster at a given display scale.
#[derive(Debug, Clone, Copy)]
pub struct DisplayRequest<'a> {
    pub source: &'a RgbaImage,
    /// Source pixel drawn at the frame's top-left. Whole pixels.
    pub scroll: PixelPoint,
    /// Display pixels per source pixel.
    pub scale: f64,
    pub viewer_px: (u32, u32),
    pub cursor: Option<PixelPoint>,
}

/// Crops and scales the visible window of `request.source` so that display
/// pixel `(0, 0)` shows source pixel `scroll`. The crosshair, when given, is
/// drawn on the result only.
pub fn build_display_frame(request: DisplayRequest<'_>) -> AppResult<RgbaImage> {
    let (src_width, src_height) = request.source.dimensions();
    if src_width == 0 || src_height == 0 {
        return Err(AppError::invalid_argument("cannot display an empty image"));
    }
    if !request.scale.is_finite() || request.scale <= 0.0 {
        return Err(AppError::invalid_argument("display scale must be positive"));
    }

    let left = request.scroll.x.clamp(0.0, f64::from(src_width - 1));
    let top = request.scroll.y.clamp(0.0, f64::from(src_height - 1));
    let dst_width = visible_extent(f64::from(src_width) - left, request.scale, request.viewer_px.0);
    let dst_height = visible_extent(f64::from(src_height) - top, request.scale, request.viewer_px.1);

    let crop_width = (f64::from(dst_width) / request.scale).min(f64::from(src_width) - left);
    let crop_height = (f64::from(dst_height) / request.scale).min(f64::from(src_height) - top);

    let src = fr::images::ImageRef::new(
        src_width,
        src_height,
        request.source.as_raw(),
        fr::PixelType::U8x4,
    )
    .map_err(|_| AppError::invalid_argument("rgba pixels length does not match dimensions"))?;
    let mut dst = fr::images::Image::new(dst_width, dst_height, fr::PixelType::U8x4);
    let algorithm = if request.scale >= 1.0 {
        fr::ResizeAlg::Nearest
    } else {
        fr::ResizeAlg::Convolution(DOWNSCALE_FILTER)
    };
    let options = fr::ResizeOptions::new()
        .resize_alg(algorithm)
        .crop(left, top, crop_width, crop_height);
    fr::Resizer::new()
        .resize(&src, &mut dst, &options)
        .map_err(|_| AppError::unsupported("failed to scale the display frame"))?;

    let mut frame = RgbaImage::from_raw(dst_width, dst_height, dst.into_vec()).ok_or(
        AppError::invalid_argument("scaled frame length does not match dimensions"),
    )?;

    if let Some(cursor) = request.cursor {
        let x = (cursor.x + 0.5 - left) * request.scale;
        let y = (cursor.y + 0.5 - top) * request.scale;
        if x >= 0.0 && y >= 0.0 && x < f64::from(dst_width) && y < f64::from(dst_height) {
            draw_cursor(&mut frame, (x as f32, y as f32));
        }
    }
    Ok(frame)
}

pub(crate) fn create_protocol_with_picker(picker: &Picker, frame: RgbaImage) -> StatefulProtocol {
    picker.new_resize_protocol(DynamicImage::ImageRgba8(frame))
}

fn visible_extent(remaining_src: f64, scale: f64, viewer: u32) -> u32 {
    let scaled = (remaining_src * scale).floor();
    let limit = viewer.max(1);
    if !scaled.is_finite() || scaled < 1.0 {
        return 1;
    }
    (scaled as u64).min(u64::from(limit)) as u32
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use super::{DisplayRequest, build_display_frame};
    use crate::overlay::draw_cursor;
    use crate::scale::PixelPoint;

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 0, 255]))
    }

    fn request(source: &RgbaImage, scroll: (f64, f64), scale: f64, viewer: (u32, u32)) -> DisplayRequest<'_> {
        DisplayRequest {
            source,
            scroll: PixelPoint::new(scroll.0, scroll.1),
            scale,
            viewer_px: viewer,
            cursor: None,
        }
    }

    #[test]
    fn unit_scale_without_scroll_copies_visible_pixels() {
        let source = gradient(40, 30);
        let frame = build_display_frame(request(&source, (0.0, 0.0), 1.0, (100, 100)))
            .expect("frame should build");
        assert_eq!(frame.dimensions(), (40, 30));
        assert_eq!(frame.get_pixel(7, 9), source.get_pixel(7, 9));
    }

    #[test]
    fn scroll_shifts_frame_origin_and_viewer_bounds_size() {
        let source = gradient(40, 30);
        let frame = build_display_frame(request(&source, (10.0, 5.0), 1.0, (16, 8)))
            .expect("frame should build");
        assert_eq!(frame.dimensions(), (16, 8));
        assert_eq!(*frame.get_pixel(0, 0), Rgba([10, 5, 0, 255]));
        assert_eq!(*frame.get_pixel(3, 2), Rgba([13, 7, 0, 255]));
    }

    #[test]
    fn upscaling_repeats_source_pixels() {
        let source = gradient(10, 10);
        let frame = build_display_frame(request(&source, (0.0, 0.0), 2.0, (100, 100)))
            .expect("frame should build");
        assert_eq!(frame.dimensions(), (20, 20));
        assert_eq!(frame.get_pixel(6, 6), source.get_pixel(3, 3));
        assert_eq!(frame.get_pixel(7, 7), source.get_pixel(3, 3));
    }

    #[test]
    fn downscaling_fits_the_viewer() {
        let source = gradient(200, 100);
        let frame = build_display_frame(request(&source, (0.0, 0.0), 0.5, (100, 100)))
            .expect("frame should build");
        assert_eq!(frame.dimensions(), (100, 50));
    }

    #[test]
    fn cursor_is_drawn_on_the_frame_not_the_source() {
        let source = RgbaImage::from_pixel(50, 50, Rgba([255, 255, 255, 255]));
        let mut with_cursor = request(&source, (0.0, 0.0), 1.0, (50, 50));
        with_cursor.cursor = Some(PixelPoint::new(20.0, 20.0));
        let frame = build_display_frame(with_cursor).expect("frame should build");

        let mut expected = source.clone();
        draw_cursor(&mut expected, (20.5, 20.5));
        assert_eq!(frame, expected);
        assert_eq!(*source.get_pixel(20, 20), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn empty_source_or_bad_scale_is_rejected() {
        let empty = RgbaImage::new(0, 0);
        assert!(build_display_frame(request(&empty, (0.0, 0.0), 1.0, (10, 10))).is_err());
        let source = gradient(4, 4);
        assert!(build_display_frame(request(&source, (0.0, 0.0), 0.0, (10, 10))).is_err());
    }
}
