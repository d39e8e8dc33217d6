// File: crates/tiden-core/src/voronoi.rs
// Summary: Voronoi hit index over projected points; resolves a pointer to the nearest data point.
// Notes:
// - Cells are exact Voronoi regions clipped to a padded plot box, built by
//   half-plane clipping per site. Lookup goes through a kd-tree: the nearest
//   site is the owner of the cell containing the pointer.
// - The index is rebuilt wholesale whenever scales or data change.

use std::collections::HashSet;

use chrono::NaiveDate;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

use crate::geometry::{ScreenPoint, ScreenRect};
use crate::scale::ScaleManager;
use crate::series::{Point, SeriesId, SeriesSet};
use crate::surface::PathData;

/// Fewer distinct sites than this disables hit-testing.
pub const MIN_SITES: usize = 3;

/// Built in one pass from all sites; tolerates many sites sharing an x
/// (one per series at every date). Items are indices into `cells`.
type SiteTree = ImmutableKdTree<f64, u64, 2, 32>;

/// Stable identity of a cell across rebuilds.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub series: SeriesId,
    pub date: NaiveDate,
}

impl From<&Point> for CellKey {
    fn from(p: &Point) -> Self {
        Self { series: p.series.clone(), date: p.date }
    }
}

#[derive(Clone, Debug)]
pub struct Cell {
    pub key: CellKey,
    /// Representative point; the first seen among points sharing a pixel.
    pub point: Point,
    pub site: ScreenPoint,
    /// Convex polygon, clockwise in screen space.
    pub polygon: Vec<ScreenPoint>,
}

impl Cell {
    /// Point-in-convex-polygon; boundary counts as inside.
    pub fn contains(&self, p: ScreenPoint) -> bool {
        let n = self.polygon.len();
        if n < 3 {
            return false;
        }
        let mut sign = 0.0f64;
        for i in 0..n {
            let a = self.polygon[i];
            let b = self.polygon[(i + 1) % n];
            let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
            if cross.abs() < 1e-9 {
                continue;
            }
            if sign == 0.0 {
                sign = cross.signum();
            } else if cross.signum() != sign {
                return false;
            }
        }
        true
    }

    pub fn path(&self) -> PathData {
        PathData::polygon(&self.polygon)
    }
}

/// Spatial partition of the plot into per-point cells.
pub struct HitIndex {
    cells: Vec<Cell>,
    tree: Option<SiteTree>,
    clip: ScreenRect,
    revision: Option<u64>,
}

impl Default for HitIndex {
    fn default() -> Self {
        Self::empty()
    }
}

impl HitIndex {
    /// Disabled index that is stale against any scale state.
    pub fn empty() -> Self {
        Self { cells: Vec::new(), tree: None, clip: ScreenRect::from_ltrb(0.0, 0.0, 0.0, 0.0), revision: None }
    }

    pub fn build(set: &SeriesSet, scales: &ScaleManager, clip: ScreenRect) -> Self {
        let mut index = Self { revision: Some(scales.revision()), clip, ..Self::empty() };
        let sites = distinct_sites(set, scales, clip);
        if sites.len() < MIN_SITES {
            tracing::debug!(sites = sites.len(), "too few distinct points; hit-testing disabled");
            return index;
        }

        let positions = sites.iter().map(|(_, s)| *s).collect::<Vec<_>>();
        let coords = positions.iter().map(|s| [s.x, s.y]).collect::<Vec<_>>();
        let tree = SiteTree::new_from_slice(&coords);
        let mut cells = Vec::with_capacity(sites.len());
        for (i, (point, site)) in sites.into_iter().enumerate() {
            let polygon = voronoi_cell(i, &positions, clip);
            cells.push(Cell { key: CellKey::from(&point), point, site, polygon });
        }
        tracing::debug!(cells = cells.len(), revision = scales.revision(), "built voronoi hit index");
        index.cells = cells;
        index.tree = Some(tree);
        index
    }

    pub fn is_enabled(&self) -> bool {
        self.tree.is_some()
    }

    /// Built against an older scale revision than `scales` (or never built).
    pub fn is_stale(&self, scales: &ScaleManager) -> bool {
        self.revision != Some(scales.revision())
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn clip(&self) -> ScreenRect {
        self.clip
    }

    pub fn find(&self, key: &CellKey) -> Option<&Cell> {
        self.cells.iter().find(|c| &c.key == key)
    }

    /// Cell owning the plot-local position `p`, if inside the clip box.
    pub fn locate(&self, p: ScreenPoint) -> Option<&Cell> {
        let tree = self.tree.as_ref()?;
        if !self.clip.contains(p) {
            return None;
        }
        let nearest = tree.nearest_one::<SquaredEuclidean>(&[p.x, p.y]);
        self.cells.get(nearest.item as usize)
    }
}

/// Project every point and keep the first point per identical pixel.
fn distinct_sites(set: &SeriesSet, scales: &ScaleManager, clip: ScreenRect) -> Vec<(Point, ScreenPoint)> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for p in set.points() {
        let Some(s) = scales.project(p) else { continue };
        if !s.x.is_finite() || !s.y.is_finite() || !clip.contains(s) {
            continue;
        }
        // + 0.0 folds -0.0 into 0.0 so both hash alike.
        let key = ((s.x + 0.0).to_bits(), (s.y + 0.0).to_bits());
        if seen.insert(key) {
            out.push((p.clone(), s));
        }
    }
    out
}

/// Region of `sites[i]` inside `clip`: the clip box cut by the bisector
/// half-plane of every other site, nearest first.
fn voronoi_cell(i: usize, sites: &[ScreenPoint], clip: ScreenRect) -> Vec<ScreenPoint> {
    let p = sites[i];
    let mut others = sites
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != i)
        .map(|(_, q)| (p.distance_sq(*q), *q))
        .collect::<Vec<_>>();
    others.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut poly = clip.corners();
    for (d2, q) in others {
        // A site farther than twice the cell's circumradius cannot cut it.
        let reach = poly.iter().map(|v| p.distance_sq(*v)).fold(0.0, f64::max);
        if d2 > 4.0 * reach {
            break;
        }
        poly = clip_half_plane(&poly, p, q);
        if poly.len() < 3 {
            break;
        }
    }
    poly
}

/// Keep the part of `poly` closer to `p` than to `q`.
fn clip_half_plane(poly: &[ScreenPoint], p: ScreenPoint, q: ScreenPoint) -> Vec<ScreenPoint> {
    let m = p.lerp(q, 0.5);
    let (nx, ny) = (q.x - p.x, q.y - p.y);
    let side = |v: ScreenPoint| (v.x - m.x) * nx + (v.y - m.y) * ny;

    let mut out = Vec::with_capacity(poly.len() + 1);
    for k in 0..poly.len() {
        let a = poly[k];
        let b = poly[(k + 1) % poly.len()];
        let (fa, fb) = (side(a), side(b));
        if fa <= 0.0 {
            out.push(a);
        }
        if (fa < 0.0 && fb > 0.0) || (fa > 0.0 && fb < 0.0) {
            out.push(a.lerp(b, fa / (fa - fb)));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::polygon_area;

    #[test]
    fn three_sites_split_the_box() {
        let sites = [ScreenPoint::new(10.0, 10.0), ScreenPoint::new(90.0, 10.0), ScreenPoint::new(50.0, 90.0)];
        let clip = ScreenRect::from_ltrb(0.0, 0.0, 100.0, 100.0);
        let total: f64 = (0..3).map(|i| polygon_area(&voronoi_cell(i, &sites, clip)).abs()).sum();
        assert!((total - 10_000.0).abs() < 1e-6);
    }

    #[test]
    fn half_plane_keeps_near_side() {
        let square = ScreenRect::from_ltrb(0.0, 0.0, 10.0, 10.0).corners();
        let cut = clip_half_plane(&square, ScreenPoint::new(2.0, 5.0), ScreenPoint::new(8.0, 5.0));
        assert!(cut.iter().all(|v| v.x <= 5.0 + 1e-9));
        assert!((polygon_area(&cut).abs() - 50.0).abs() < 1e-9);
    }
}
