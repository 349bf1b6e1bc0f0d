use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point;

use crate::scale::PixelPoint;

pub const MARKER_DOT_RADIUS: i32 = 5;
pub const MARKER_RING_RADIUS: f64 = 20.0;
pub const STROKE_WIDTH: f64 = 5.0;
pub const CURSOR_ARM_PX: f32 = 8.0;
pub const CURSOR_COLOR: Rgba<u8> = Rgba([255, 0, 255, 255]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerStyle {
    pub color: Rgba<u8>,
}

impl MarkerStyle {
    pub fn from_rgb(rgb: [u8; 3]) -> Self {
        Self {
            color: Rgba([rgb[0], rgb[1], rgb[2], 255]),
        }
    }
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self::from_rgb([0, 0, 0])
    }
}

/// Copy of `source` with a marker at each set point and, when both are set,
/// the segment between them.
pub fn annotate(
    source: &RgbaImage,
    start: Option<PixelPoint>,
    end: Option<PixelPoint>,
    style: MarkerStyle,
) -> RgbaImage {
    let mut canvas = source.clone();
    for point in [start, end].into_iter().flatten() {
        draw_marker(&mut canvas, point, style.color);
    }
    if let (Some(start), Some(end)) = (start, end) {
        stroke_segment(&mut canvas, start, end, STROKE_WIDTH, style.color);
    }
    canvas
}

pub fn draw_marker(canvas: &mut RgbaImage, at: PixelPoint, color: Rgba<u8>) {
    draw_filled_circle_mut(canvas, rounded(at), MARKER_DOT_RADIUS, color);
    stroke_ring(canvas, at, MARKER_RING_RADIUS, STROKE_WIDTH, color);
}

/// Crosshair in display pixels. Only ever drawn on the displayed raster.
pub fn draw_cursor(canvas: &mut RgbaImage, at: (f32, f32)) {
    let (x, y) = at;
    draw_line_segment_mut(
        canvas,
        (x - CURSOR_ARM_PX, y),
        (x + CURSOR_ARM_PX, y),
        CURSOR_COLOR,
    );
    draw_line_segment_mut(
        canvas,
        (x, y - CURSOR_ARM_PX),
        (x, y + CURSOR_ARM_PX),
        CURSOR_COLOR,
    );
}

fn stroke_ring(canvas: &mut RgbaImage, center: PixelPoint, radius: f64, width: f64, color: Rgba<u8>) {
    let (canvas_width, canvas_height) = canvas.dimensions();
    if canvas_width == 0 || canvas_height == 0 {
        return;
    }
    let inner = radius - width / 2.0;
    let outer = radius + width / 2.0;
    let Some((min_x, max_x)) = pixel_span(center.x, outer, canvas_width) else {
        return;
    };
    let Some((min_y, max_y)) = pixel_span(center.y, outer, canvas_height) else {
        return;
    };

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let distance = PixelPoint::new(f64::from(x), f64::from(y)).distance_to(center);
            if (inner..=outer).contains(&distance) {
                canvas.put_pixel(x, y, color);
            }
        }
    }
}

fn stroke_segment(
    canvas: &mut RgbaImage,
    from: PixelPoint,
    to: PixelPoint,
    width: f64,
    color: Rgba<u8>,
) {
    let length = from.distance_to(to);
    if length < f64::EPSILON {
        return;
    }
    let half = width / 2.0;
    let nx = -(to.y - from.y) / length * half;
    let ny = (to.x - from.x) / length * half;
    let corners = [
        from.offset(nx, ny),
        to.offset(nx, ny),
        to.offset(-nx, -ny),
        from.offset(-nx, -ny),
    ]
    .map(|corner| {
        let (x, y) = rounded(corner);
        Point::new(x, y)
    });

    if corners[0] == corners[3] {
        draw_line_segment_mut(
            canvas,
            (from.x as f32, from.y as f32),
            (to.x as f32, to.y as f32),
            color,
        );
        return;
    }
    draw_polygon_mut(canvas, &corners, color);
}

fn pixel_span(center: f64, reach: f64, extent: u32) -> Option<(u32, u32)> {
    let last = f64::from(extent - 1);
    let low = (center - reach).floor().max(0.0);
    let high = (center + reach).ceil().min(last);
    (low <= high).then_some((low as u32, high as u32))
}

fn rounded(point: PixelPoint) -> (i32, i32) {
    (point.x.round() as i32, point.y.round() as i32)
}
