/// PDF user-space units per inch.
pub const PDF_POINTS_PER_INCH: f64 = 72.0;

/// Total border added around the placed raster (one inch on each side).
pub const PAGE_MARGIN_PT: f64 = 2.0 * PDF_POINTS_PER_INCH;

/// A position in source-image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: PixelPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Clamps into `[0, width) x [0, height)`.
    pub fn clamped_to(self, width: u32, height: u32) -> Self {
        let max_x = f64::from(width.max(1)) - 1.0;
        let max_y = f64::from(height.max(1)) - 1.0;
        Self::new(self.x.clamp(0.0, max_x), self.y.clamp(0.0, max_y))
    }

    pub fn is_within(self, width: u32, height: u32) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.x < f64::from(width) && self.y < f64::from(height)
    }
}

/// One of the two user-marked reference points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MarkedPoint {
    pub location: PixelPoint,
    pub updated: bool,
}

impl MarkedPoint {
    pub const UNSET: Self = Self {
        location: PixelPoint::new(0.0, 0.0),
        updated: false,
    };

    pub const fn at(location: PixelPoint) -> Self {
        Self {
            location,
            updated: true,
        }
    }

    pub fn location(&self) -> Option<PixelPoint> {
        self.updated.then_some(self.location)
    }
}
