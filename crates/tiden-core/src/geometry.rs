// File: crates/tiden-core/src/geometry.rs
// Summary: Lightweight geometry helpers for pixel math.

/// A point in plot-local screen space (pixels, origin at the plot's top-left).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance_sq(&self, other: ScreenPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    #[inline]
    pub fn lerp(&self, other: ScreenPoint, t: f64) -> ScreenPoint {
        ScreenPoint::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }
}

/// Axis-aligned rectangle in screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl ScreenRect {
    pub const fn from_ltrb(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { left, top, right, bottom }
    }
    pub const fn from_ltwh(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, right: left + width, bottom: top + height }
    }
    pub fn width(&self) -> f64 { self.right - self.left }
    pub fn height(&self) -> f64 { self.bottom - self.top }

    pub fn contains(&self, p: ScreenPoint) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    /// Corners in clockwise screen order (y grows downward).
    pub fn corners(&self) -> Vec<ScreenPoint> {
        vec![
            ScreenPoint::new(self.left, self.top),
            ScreenPoint::new(self.right, self.top),
            ScreenPoint::new(self.right, self.bottom),
            ScreenPoint::new(self.left, self.bottom),
        ]
    }
}

#[inline]
pub fn clamp<T: PartialOrd>(v: T, lo: T, hi: T) -> T {
    if v < lo { lo } else if v > hi { hi } else { v }
}

/// Signed area of a polygon (shoelace). Positive for clockwise screen order.
pub fn polygon_area(poly: &[ScreenPoint]) -> f64 {
    if poly.len() < 3 {
        return 0.0;
    }
    let mut acc = 0.0;
    for i in 0..poly.len() {
        let a = poly[i];
        let b = poly[(i + 1) % poly.len()];
        acc += a.x * b.y - b.x * a.y;
    }
    acc * 0.5
}
