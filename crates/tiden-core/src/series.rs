// File: crates/tiden-core/src/series.rs
// Summary: Point/Series model and the builder that turns raw table rows into named point sequences.
// Notes:
// - Two table shapes are accepted: one series per row (a `name` column plus
//   date-headed columns) or one date per row (a `date` column plus
//   series-headed columns).
// - Cells that are empty or not a finite number are dropped, never zero-filled.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::source::Table;

pub type SeriesId = String;

/// Date format used in column headers and date cells.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Key column for the series-per-row shape.
pub const NAME_COLUMN: &str = "name";
/// Key column for the date-per-row shape.
pub const DATE_COLUMN: &str = "date";

#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    pub series: SeriesId,
    pub date: NaiveDate,
    pub value: f64,
}

impl Point {
    pub fn new(series: impl Into<SeriesId>, date: NaiveDate, value: f64) -> Self {
        Self { series: series.into(), date, value }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub name: SeriesId,
    /// Strictly increasing in date.
    pub points: Vec<Point>,
}

impl Series {
    pub fn new(name: impl Into<SeriesId>) -> Self {
        Self { name: name.into(), points: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Table shape, detected from the header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableShape {
    SeriesPerRow { name_col: usize },
    DatePerRow { date_col: usize },
}

impl TableShape {
    pub fn detect(table: &Table) -> Option<Self> {
        if let Some(name_col) = table.column_index(NAME_COLUMN) {
            return Some(TableShape::SeriesPerRow { name_col });
        }
        table.column_index(DATE_COLUMN).map(|date_col| TableShape::DatePerRow { date_col })
    }
}

/// The full set of series for one data load, plus a name index.
#[derive(Clone, Debug, Default)]
pub struct SeriesSet {
    /// All parsed timestamps, ascending and unique.
    pub timestamps: Vec<NaiveDate>,
    pub series: Vec<Series>,
    index: HashMap<SeriesId, usize>,
}

impl SeriesSet {
    pub fn new(timestamps: Vec<NaiveDate>, series: Vec<Series>) -> Self {
        let mut set = Self { timestamps, series: Vec::with_capacity(series.len()), index: HashMap::new() };
        for s in series {
            set.push(s);
        }
        set
    }

    /// Add a series; a duplicate name is ignored (first wins).
    fn push(&mut self, series: Series) {
        if self.index.contains_key(&series.name) {
            tracing::warn!(series = %series.name, "duplicate series name ignored");
            return;
        }
        self.index.insert(series.name.clone(), self.series.len());
        self.series.push(series);
    }

    pub fn get(&self, name: &str) -> Option<&Series> {
        self.index.get(name).map(|&i| &self.series[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.series.iter().flat_map(|s| s.points.iter())
    }

    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    /// Whether `point` is still part of this set (same series, date and value).
    pub fn contains_point(&self, point: &Point) -> bool {
        self.get(&point.series)
            .map(|s| s.points.iter().any(|p| p.date == point.date && p.value == point.value))
            .unwrap_or(false)
    }
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Parse a cell to a finite number; anything else is missing.
pub fn parse_value(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Build series from a table. Never fails: an unusable table yields an empty set.
pub fn build_series(table: &Table) -> SeriesSet {
    if table.is_empty() {
        return SeriesSet::default();
    }
    let Some(shape) = TableShape::detect(table) else {
        tracing::debug!(columns = ?table.columns, "no name/date key column; nothing to build");
        return SeriesSet::default();
    };
    let (set, dropped) = match shape {
        TableShape::SeriesPerRow { name_col } => build_series_per_row(table, name_col),
        TableShape::DatePerRow { date_col } => build_date_per_row(table, date_col),
    };
    tracing::debug!(
        series = set.len(),
        points = set.point_count(),
        dropped,
        "built series set"
    );
    set
}

fn build_series_per_row(table: &Table, name_col: usize) -> (SeriesSet, usize) {
    // Timestamp columns are derived once from the header and reused for every row.
    let mut date_cols = table
        .columns
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != name_col)
        .filter_map(|(i, h)| parse_date(h).map(|d| (d, i)))
        .collect::<Vec<_>>();
    date_cols.sort_by_key(|&(d, _)| d);
    date_cols.dedup_by_key(|&mut (d, _)| d);
    if date_cols.is_empty() {
        return (SeriesSet::default(), 0);
    }

    let mut dropped = 0usize;
    let mut series = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let name = row.cell(name_col).trim().to_string();
        let mut s = Series::new(name.clone());
        for &(date, col) in &date_cols {
            match parse_value(row.cell(col)) {
                Some(value) => s.points.push(Point::new(name.clone(), date, value)),
                None => dropped += 1,
            }
        }
        series.push(s);
    }
    let timestamps = date_cols.into_iter().map(|(d, _)| d).collect();
    (SeriesSet::new(timestamps, series), dropped)
}

fn build_date_per_row(table: &Table, date_col: usize) -> (SeriesSet, usize) {
    let series_cols = table
        .columns
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != date_col)
        .map(|(i, h)| (h.trim().to_string(), i))
        .collect::<Vec<_>>();

    let mut dropped = 0usize;
    let mut timestamps = Vec::with_capacity(table.rows.len());
    let mut series = series_cols.iter().map(|(name, _)| Series::new(name.clone())).collect::<Vec<_>>();
    for row in &table.rows {
        let Some(date) = parse_date(row.cell(date_col)) else {
            dropped += series_cols.len();
            continue;
        };
        timestamps.push(date);
        for (s, (name, col)) in series.iter_mut().zip(&series_cols) {
            match parse_value(row.cell(*col)) {
                Some(value) => s.points.push(Point::new(name.clone(), date, value)),
                None => dropped += 1,
            }
        }
    }
    if timestamps.is_empty() {
        return (SeriesSet::default(), dropped);
    }
    timestamps.sort();
    timestamps.dedup();
    for s in &mut series {
        // Stable sort keeps the first row for a repeated date.
        s.points.sort_by_key(|p| p.date);
        s.points.dedup_by_key(|p| p.date);
    }
    (SeriesSet::new(timestamps, series), dropped)
}
