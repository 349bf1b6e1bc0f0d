use crate::scale::PixelPoint;

/// Maps screen pixels inside the viewer onto source-image pixels.
///
/// `origin` is the screen position of the viewer's top-left pixel, `scroll`
/// the source pixel drawn there, and `scale` the number of screen pixels per
/// source pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    pub origin: (f64, f64),
    pub scroll: PixelPoint,
    pub scale: f64,
}

/// Source-pixel rectangle visible through the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceWindow {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ViewportTransform {
    pub fn new(origin: (f64, f64), scroll: PixelPoint, scale: f64) -> Self {
        Self {
            origin,
            scroll,
            scale: if scale.is_finite() && scale > 0.0 {
                scale
            } else {
                1.0
            },
        }
    }

    pub fn to_source(&self, screen_x: f64, screen_y: f64) -> PixelPoint {
        PixelPoint::new(
            (screen_x - self.origin.0) / self.scale + self.scroll.x,
            (screen_y - self.origin.1) / self.scale + self.scroll.y,
        )
    }

    pub fn to_screen(&self, point: PixelPoint) -> (f64, f64) {
        (
            (point.x - self.scroll.x) * self.scale + self.origin.0,
            (point.y - self.scroll.y) * self.scale + self.origin.1,
        )
    }

    /// Translates a click to the whole source pixel under it, or `None` when
    /// it lands outside the image.
    pub fn pick(&self, screen_x: f64, screen_y: f64, image_size: (u32, u32)) -> Option<PixelPoint> {
        let point = self.to_source(screen_x, screen_y);
        point
            .is_within(image_size.0, image_size.1)
            .then(|| PixelPoint::new(point.x.floor(), point.y.floor()))
    }

    pub fn scrolled_by(self, dx: f64, dy: f64) -> Self {
        Self {
            scroll: self.scroll.offset(dx, dy),
            ..self
        }
    }

    /// Part of an image of `image_size` that fits in a viewer of
    /// `viewer_px` screen pixels.
    pub fn source_window(&self, viewer_px: (u32, u32), image_size: (u32, u32)) -> SourceWindow {
        let (image_width, image_height) = image_size;
        let x = clamp_to_extent(self.scroll.x, image_width);
        let y = clamp_to_extent(self.scroll.y, image_height);
        let span_x = (f64::from(viewer_px.0) / self.scale).ceil();
        let span_y = (f64::from(viewer_px.1) / self.scale).ceil();
        SourceWindow {
            x,
            y,
            width: span_within(span_x, image_width - x),
            height: span_within(span_y, image_height - y),
        }
    }
}

/// Scroll position that keeps as much of the image visible as possible.
pub fn clamp_scroll(
    scroll: PixelPoint,
    scale: f64,
    viewer_px: (u32, u32),
    image_size: (u32, u32),
) -> PixelPoint {
    let visible_x = f64::from(viewer_px.0) / scale;
    let visible_y = f64::from(viewer_px.1) / scale;
    let max_x = (f64::from(image_size.0) - visible_x).max(0.0);
    let max_y = (f64::from(image_size.1) - visible_y).max(0.0);
    PixelPoint::new(scroll.x.clamp(0.0, max_x), scroll.y.clamp(0.0, max_y))
}

/// Screen pixels per source pixel when the whole image fits the viewer.
pub fn fit_scale(viewer_px: (u32, u32), image_size: (u32, u32)) -> f64 {
    if image_size.0 == 0 || image_size.1 == 0 || viewer_px.0 == 0 || viewer_px.1 == 0 {
        return 1.0;
    }
    let sx = f64::from(viewer_px.0) / f64::from(image_size.0);
    let sy = f64::from(viewer_px.1) / f64::from(image_size.1);
    sx.min(sy)
}

/// Screen position of the centre of a terminal cell.
pub fn cell_center_px(column: u16, row: u16, cell_px: (u16, u16)) -> (f64, f64) {
    (
        (f64::from(column) + 0.5) * f64::from(cell_px.0),
        (f64::from(row) + 0.5) * f64::from(cell_px.1),
    )
}

fn clamp_to_extent(value: f64, extent: u32) -> u32 {
    if extent == 0 || !value.is_finite() || value <= 0.0 {
        return 0;
    }
    (value.floor() as u64).min(u64::from(extent.saturating_sub(1))) as u32
}

fn span_within(span: f64, extent: u32) -> u32 {
    if !span.is_finite() || span < 1.0 {
        return 1.min(extent);
    }
    (span as u64).min(u64::from(extent)) as u32
}
