// File: crates/tiden-core/src/curve.rs
// Summary: Monotone cubic interpolation (Fritsch-Carlson tangents) emitted as Bezier path data.

use crate::geometry::ScreenPoint;
use crate::surface::PathData;

/// Tangents that keep the interpolant monotone between samples.
/// Input x must be strictly increasing.
fn monotone_tangents(pts: &[ScreenPoint]) -> Vec<f64> {
    let n = pts.len();
    let secants = pts
        .windows(2)
        .map(|w| (w[1].y - w[0].y) / (w[1].x - w[0].x))
        .collect::<Vec<_>>();

    let mut m = vec![0.0; n];
    m[0] = secants[0];
    m[n - 1] = secants[n - 2];
    for i in 1..n - 1 {
        m[i] = if secants[i - 1] * secants[i] <= 0.0 { 0.0 } else { (secants[i - 1] + secants[i]) * 0.5 };
    }

    for i in 0..n - 1 {
        let d = secants[i];
        if d == 0.0 {
            m[i] = 0.0;
            m[i + 1] = 0.0;
            continue;
        }
        let a = m[i] / d;
        let b = m[i + 1] / d;
        let s = a * a + b * b;
        if s > 9.0 {
            let tau = 3.0 / s.sqrt();
            m[i] = tau * a * d;
            m[i + 1] = tau * b * d;
        }
    }
    m
}

/// Smooth path through `pts`. One point yields a bare move; two yield a line.
/// Points must be sorted by x.
pub fn monotone_path(pts: &[ScreenPoint]) -> PathData {
    let mut d = PathData::new();
    match pts.len() {
        0 => return d,
        1 => {
            d.move_to(pts[0]);
            return d;
        }
        _ => {}
    }
    // Collapsed x (zero-width plot, single-date domain) cannot be interpolated.
    if pts.len() == 2 || pts.windows(2).any(|w| !(w[1].x > w[0].x)) {
        d.move_to(pts[0]);
        for &q in &pts[1..] {
            d.line_to(q);
        }
        return d;
    }
    let m = monotone_tangents(pts);
    d.move_to(pts[0]);
    for i in 0..pts.len() - 1 {
        let (p0, p1) = (pts[i], pts[i + 1]);
        let h = (p1.x - p0.x) / 3.0;
        d.cubic_to(
            ScreenPoint::new(p0.x + h, p0.y + m[i] * h),
            ScreenPoint::new(p1.x - h, p1.y - m[i + 1] * h),
            p1,
        );
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{cubic_point, PathSeg};

    fn p(x: f64, y: f64) -> ScreenPoint {
        ScreenPoint::new(x, y)
    }

    #[test]
    fn passes_through_samples() {
        let pts = [p(0.0, 10.0), p(10.0, 2.0), p(20.0, 8.0), p(30.0, 8.0)];
        let d = monotone_path(&pts);
        assert_eq!(d.segs[0], PathSeg::MoveTo(pts[0]));
        let ends = d
            .segs
            .iter()
            .filter_map(|s| match s {
                PathSeg::CubicTo(_, _, e) => Some(*e),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(ends, pts[1..].to_vec());
    }

    #[test]
    fn no_overshoot_on_monotone_data() {
        let pts = [p(0.0, 0.0), p(1.0, 0.0), p(2.0, 10.0), p(3.0, 10.0)];
        let d = monotone_path(&pts);
        let mut prev = pts[0];
        for seg in &d.segs {
            if let PathSeg::CubicTo(c1, c2, end) = *seg {
                for i in 0..=20 {
                    let q = cubic_point(prev, c1, c2, end, i as f64 / 20.0);
                    assert!(q.y >= -1e-9 && q.y <= 10.0 + 1e-9, "overshoot at {:?}", q);
                }
                prev = end;
            }
        }
    }
}
