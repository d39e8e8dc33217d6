// File: crates/tiden-core/tests/series_builder.rs
// Purpose: Validate series building from both table shapes, cell dropping and empty inputs.

use chrono::NaiveDate;
use tiden_core::{build_series, Table};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn date_per_row_two_series() {
    let table = Table::new(["date", "A", "B"])
        .with_row(["2020-01-01", "12", "5"])
        .with_row(["2020-01-02", "14", "6"]);
    let set = build_series(&table);

    assert_eq!(set.len(), 2);
    let a = set.get("A").expect("series A");
    let b = set.get("B").expect("series B");
    let a_pts = a.points.iter().map(|p| (p.date, p.value)).collect::<Vec<_>>();
    let b_pts = b.points.iter().map(|p| (p.date, p.value)).collect::<Vec<_>>();
    assert_eq!(a_pts, vec![(day(2020, 1, 1), 12.0), (day(2020, 1, 2), 14.0)]);
    assert_eq!(b_pts, vec![(day(2020, 1, 1), 5.0), (day(2020, 1, 2), 6.0)]);
    assert!(a.points.iter().all(|p| p.series == "A"));
    assert_eq!(set.timestamps, vec![day(2020, 1, 1), day(2020, 1, 2)]);
}

#[test]
fn series_per_row_uses_header_dates() {
    // Column order is not chronological and one header is not a date.
    let table = Table::new(["name", "1991-01-01", "notes", "1990-01-01"])
        .with_row(["Hamburg", "510", "x", "498"])
        .with_row(["Cuxhaven", "", "y", "402"]);
    let set = build_series(&table);

    assert_eq!(set.timestamps, vec![day(1990, 1, 1), day(1991, 1, 1)]);
    let hh = set.get("Hamburg").unwrap();
    assert_eq!(hh.points.len(), 2);
    assert!(hh.points[0].date < hh.points[1].date);
    assert_eq!(hh.points[0].value, 498.0);
    let cux = set.get("Cuxhaven").unwrap();
    assert_eq!(cux.points.len(), 1);
    assert_eq!(cux.points[0].date, day(1990, 1, 1));
}

#[test]
fn malformed_cells_are_dropped_not_zero_filled() {
    let table = Table::new(["date", "A"])
        .with_row(["2020-01-01", "abc"])
        .with_row(["2020-01-02", "NaN"])
        .with_row(["2020-01-03", "inf"])
        .with_row(["2020-01-04", " 7.5 "])
        .with_row(["2020-01-05", "0"])
        .with_row(["not a date", "3"]);
    let set = build_series(&table);
    let a = set.get("A").unwrap();
    let values = a.points.iter().map(|p| p.value).collect::<Vec<_>>();
    assert_eq!(values, vec![7.5, 0.0]);
    assert!(set.points().all(|p| p.value.is_finite()));
}

#[test]
fn all_empty_column_yields_zero_point_series() {
    let table = Table::new(["date", "A", "C"])
        .with_row(["2020-01-01", "1", ""])
        .with_row(["2020-01-02", "2", " "]);
    let set = build_series(&table);
    let c = set.get("C").expect("empty series is present");
    assert!(c.is_empty());
    assert_eq!(set.len(), 2);
}

#[test]
fn points_strictly_increase_in_date() {
    let table = Table::new(["date", "A"])
        .with_row(["2020-03-01", "3"])
        .with_row(["2020-01-01", "1"])
        .with_row(["2020-01-01", "9"])
        .with_row(["2020-02-01", "2"]);
    let set = build_series(&table);
    let a = set.get("A").unwrap();
    assert!(a.points.windows(2).all(|w| w[0].date < w[1].date));
    // First row wins for a repeated date.
    assert_eq!(a.points[0].value, 1.0);
}

#[test]
fn unusable_tables_give_empty_set() {
    assert!(build_series(&Table::default()).is_empty());
    assert!(build_series(&Table::new(["name", "foo"]).with_row(["A", "1"])).is_empty());
    assert!(build_series(&Table::new(["x", "y"]).with_row(["1", "2"])).is_empty());
    assert!(build_series(&Table::new(["date", "A"])).is_empty());
}

#[test]
fn duplicate_series_names_keep_first() {
    let table = Table::new(["name", "2000-01-01"]).with_row(["A", "1"]).with_row(["A", "2"]);
    let set = build_series(&table);
    assert_eq!(set.len(), 1);
    assert_eq!(set.get("A").unwrap().points[0].value, 1.0);
}
