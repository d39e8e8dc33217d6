// File: crates/tiden-core/tests/voronoi.rs
// Purpose: Validate hit index partitioning, nearest-point lookup, pixel dedup and the degenerate case.

use chrono::{Duration, NaiveDate};
use tiden_core::geometry::polygon_area;
use tiden_core::{build_series, CellKey, HitIndex, ScaleManager, ScreenPoint, ScreenRect, SeriesSet, Table};

const W: f64 = 500.0;
const H: f64 = 300.0;

fn clip() -> ScreenRect {
    ScreenRect::from_ltrb(-40.0, -20.0, W + 40.0, H + 30.0)
}

/// Deterministic pseudo-random values (LCG), so the layout is irregular but reproducible.
fn noisy_table(series: usize, dates: usize, mut seed: u64) -> Table {
    let mut columns = vec!["date".to_string()];
    columns.extend((0..series).map(|s| format!("S{s}")));
    let mut table = Table::new(columns);
    let start = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
    for d in 0..dates {
        let date = (start + Duration::days(d as i64 * 91)).format("%Y-%m-%d").to_string();
        let mut row = vec![date];
        for _ in 0..series {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            row.push(format!("{:.2}", (seed >> 33) as f64 / (1u64 << 31) as f64 * 100.0));
        }
        table = table.with_row(row);
    }
    table
}

fn index_for(set: &SeriesSet) -> (ScaleManager, HitIndex) {
    let mut scales = ScaleManager::new();
    scales.set_ranges(W, H);
    scales.set_domains(set);
    let hit = HitIndex::build(set, &scales, clip());
    (scales, hit)
}

#[test]
fn each_cell_contains_its_site() {
    let set = build_series(&noisy_table(5, 12, 7));
    let (_, hit) = index_for(&set);
    assert!(hit.is_enabled());
    assert_eq!(hit.cells().len(), 60);
    for cell in hit.cells() {
        assert!(cell.contains(cell.site), "cell {:?} misses its own site", cell.key);
    }
}

#[test]
fn cells_partition_the_clip_box() {
    let set = build_series(&noisy_table(4, 20, 42));
    let (_, hit) = index_for(&set);
    let total: f64 = hit.cells().iter().map(|c| polygon_area(&c.polygon).abs()).sum();
    let expected = clip().width() * clip().height();
    assert!((total - expected).abs() / expected < 1e-6, "area {total} vs {expected}");
}

#[test]
fn locate_returns_the_nearest_site() {
    let set = build_series(&noisy_table(3, 15, 99));
    let (_, hit) = index_for(&set);
    let c = clip();
    for i in 0..=40 {
        for j in 0..=25 {
            let p = ScreenPoint::new(c.left + c.width() * i as f64 / 40.0, c.top + c.height() * j as f64 / 25.0);
            let found = hit.locate(p).expect("inside the clip box");
            let best = hit.cells().iter().map(|cell| cell.site.distance_sq(p)).fold(f64::INFINITY, f64::min);
            assert!((found.site.distance_sq(p) - best).abs() < 1e-6);
            assert!(found.contains(p));
        }
    }
}

#[test]
fn locate_outside_clip_is_none() {
    let set = build_series(&noisy_table(3, 6, 1));
    let (_, hit) = index_for(&set);
    assert!(hit.locate(ScreenPoint::new(-41.0, 10.0)).is_none());
    assert!(hit.locate(ScreenPoint::new(10.0, H + 31.0)).is_none());
}

#[test]
fn coincident_points_keep_first_series() {
    let table = Table::new(["date", "A", "B", "C"])
        .with_row(["2020-01-01", "10", "10", "3"])
        .with_row(["2020-06-01", "12", "12", "1"])
        .with_row(["2021-01-01", "11", "11", "7"]);
    let set = build_series(&table);
    let (_, hit) = index_for(&set);
    assert_eq!(hit.cells().len(), 6);
    assert!(hit.cells().iter().all(|c| c.key.series != "B"));
    assert!(hit.cells().iter().filter(|c| c.key.series == "A").count() == 3);
}

#[test]
fn too_few_distinct_sites_disables_hit_testing() {
    let two = build_series(&Table::new(["date", "A"]).with_row(["2020-01-01", "1"]).with_row(["2020-01-02", "2"]));
    let (_, hit) = index_for(&two);
    assert!(!hit.is_enabled());
    assert!(hit.cells().is_empty());
    assert!(hit.locate(ScreenPoint::new(0.0, 0.0)).is_none());

    // Three points, all on one pixel.
    let stacked = build_series(&Table::new(["date", "A", "B", "C"]).with_row(["2020-01-01", "4", "4", "4"]));
    let (_, hit) = index_for(&stacked);
    assert!(!hit.is_enabled());

    let (_, hit) = index_for(&SeriesSet::default());
    assert!(!hit.is_enabled());
}

#[test]
fn empty_series_contributes_no_cells() {
    let table = Table::new(["date", "A", "C"])
        .with_row(["2020-01-01", "1", ""])
        .with_row(["2020-02-01", "3", ""])
        .with_row(["2020-03-01", "2", ""]);
    let set = build_series(&table);
    let (_, hit) = index_for(&set);
    assert!(hit.is_enabled());
    assert!(hit.cells().iter().all(|c| c.key.series == "A"));
    let key = CellKey { series: "C".into(), date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() };
    assert!(hit.find(&key).is_none());
}

#[test]
fn index_goes_stale_on_relayout() {
    let set = build_series(&noisy_table(3, 4, 5));
    let (mut scales, hit) = index_for(&set);
    assert!(!hit.is_stale(&scales));
    scales.set_ranges(W * 2.0, H);
    assert!(hit.is_stale(&scales));
    assert!(HitIndex::empty().is_stale(&scales));
}

#[test]
fn wide_tables_sharing_dates_build() {
    // Hundreds of sites stacked on each of three x positions.
    for series in [255, 257, 420] {
        let set = build_series(&noisy_table(series, 3, 11));
        let (_, hit) = index_for(&set);
        assert!(hit.is_enabled());
        let mut sites = set
            .series
            .iter()
            .flat_map(|s| s.points.iter())
            .map(|p| (p.date, p.value.to_bits()))
            .collect::<Vec<_>>();
        sites.sort();
        sites.dedup();
        assert_eq!(hit.cells().len(), sites.len());

        let c = clip();
        for i in 0..=20 {
            let p = ScreenPoint::new(c.left + c.width() * i as f64 / 20.0, c.top + c.height() * (i % 7) as f64 / 6.0);
            let found = hit.locate(p).expect("inside the clip box");
            let best = hit.cells().iter().map(|cell| cell.site.distance_sq(p)).fold(f64::INFINITY, f64::min);
            assert!((found.site.distance_sq(p) - best).abs() < 1e-6);
        }
    }
}
