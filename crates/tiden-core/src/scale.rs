// File: crates/tiden-core/src/scale.rs
// Summary: Time (X) and value (Y) scales with separately updated domains and ranges.

use chrono::{Datelike, Months, NaiveDate};

use crate::geometry::ScreenPoint;
use crate::series::{Point, SeriesSet};

/// Default tick count used by `nice` and axis ticks.
pub const DEFAULT_TICKS: usize = 10;

const MIN_SPAN: f64 = 1e-12;

/// Tick step for `[lo, hi]` targeting roughly `count` ticks.
/// Step is a power of ten times 1, 2 or 5.
pub fn tick_step(lo: f64, hi: f64, count: usize) -> Option<f64> {
    let span = hi - lo;
    if !span.is_finite() || span <= MIN_SPAN || count == 0 {
        return None;
    }
    let m = count as f64;
    let mut step = 10f64.powf((span / m).log10().floor());
    let err = m / span * step;
    if err <= 0.15 {
        step *= 10.0;
    } else if err <= 0.35 {
        step *= 5.0;
    } else if err <= 0.75 {
        step *= 2.0;
    }
    Some(step)
}

/// Order-preserving linear mapping from a numeric domain to a pixel range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    domain: Option<(f64, f64)>,
    range: (f64, f64),
}

impl Default for LinearScale {
    fn default() -> Self {
        Self { domain: None, range: (0.0, 1.0) }
    }
}

impl LinearScale {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn domain(&self) -> Option<(f64, f64)> {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn set_domain(&mut self, d0: f64, d1: f64) {
        self.domain = Some((d0, d1));
    }

    pub fn clear_domain(&mut self) {
        self.domain = None;
    }

    pub fn set_range(&mut self, r0: f64, r1: f64) {
        self.range = (r0, r1);
    }

    /// Expand the domain outward to multiples of the tick step. Never shrinks.
    pub fn nice(&mut self, count: usize) {
        let Some((d0, d1)) = self.domain else { return };
        let (lo, hi) = if d0 <= d1 { (d0, d1) } else { (d1, d0) };
        let Some(step) = tick_step(lo, hi, count) else { return };
        let lo = (lo / step).floor() * step;
        let hi = (hi / step).ceil() * step;
        self.domain = if d0 <= d1 { Some((lo, hi)) } else { Some((hi, lo)) };
    }

    /// Map a domain value to pixels. A degenerate domain maps to the range midpoint.
    #[inline]
    pub fn map(&self, v: f64) -> Option<f64> {
        let (d0, d1) = self.domain?;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span.abs() < MIN_SPAN {
            return Some((r0 + r1) * 0.5);
        }
        Some(r0 + (v - d0) / span * (r1 - r0))
    }

    /// Tick values inside the domain, spaced by `tick_step`.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let Some((d0, d1)) = self.domain else { return Vec::new() };
        let (lo, hi) = if d0 <= d1 { (d0, d1) } else { (d1, d0) };
        let Some(step) = tick_step(lo, hi, count) else {
            return vec![lo];
        };
        let start = (lo / step - 1e-9).ceil() as i64;
        let stop = (hi / step + 1e-9).floor() as i64;
        (start..=stop).map(|k| k as f64 * step).collect()
    }

    /// Tick label with just enough decimals for the tick step.
    pub fn tick_format(&self, count: usize) -> impl Fn(f64) -> String {
        let decimals = self
            .domain
            .and_then(|(d0, d1)| tick_step(d0.min(d1), d0.max(d1), count))
            .map(|step| (-step.log10().floor()).max(0.0) as usize)
            .unwrap_or(0);
        move |v| format!("{:.*}", decimals, v)
    }
}

/// Calendar interval used for time ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeInterval {
    Days(u32),
    Months(u32),
    Years(i32),
}

impl TimeInterval {
    fn format(&self) -> &'static str {
        match self {
            TimeInterval::Days(_) => "%b %d",
            TimeInterval::Months(_) => "%b %Y",
            TimeInterval::Years(_) => "%Y",
        }
    }

    fn approx_days(&self) -> f64 {
        match *self {
            TimeInterval::Days(k) => k as f64,
            TimeInterval::Months(k) => k as f64 * 30.44,
            TimeInterval::Years(k) => k as f64 * 365.25,
        }
    }
}

/// Day number used as the numeric domain of the time scale.
#[inline]
pub fn day_number(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

#[inline]
pub fn from_day_number(day: f64) -> Option<NaiveDate> {
    let day = day.round();
    if day < i32::MIN as f64 || day > i32::MAX as f64 {
        return None;
    }
    NaiveDate::from_num_days_from_ce_opt(day as i32)
}

/// Time scale over calendar dates, backed by a linear scale on day numbers.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TimeScale {
    inner: LinearScale,
}

impl TimeScale {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn domain(&self) -> Option<(NaiveDate, NaiveDate)> {
        let (d0, d1) = self.inner.domain()?;
        Some((from_day_number(d0)?, from_day_number(d1)?))
    }

    pub fn range(&self) -> (f64, f64) {
        self.inner.range()
    }

    pub fn set_domain(&mut self, d0: NaiveDate, d1: NaiveDate) {
        self.inner.set_domain(day_number(d0), day_number(d1));
    }

    pub fn clear_domain(&mut self) {
        self.inner.clear_domain();
    }

    pub fn set_range(&mut self, r0: f64, r1: f64) {
        self.inner.set_range(r0, r1);
    }

    #[inline]
    pub fn map(&self, date: NaiveDate) -> Option<f64> {
        self.inner.map(day_number(date))
    }

    /// Pick the smallest calendar interval that yields at most `count` ticks.
    pub fn interval(&self, count: usize) -> Option<TimeInterval> {
        let (d0, d1) = self.inner.domain()?;
        let span = (d1 - d0).abs();
        let count = count.max(1) as f64;
        let candidates = [
            TimeInterval::Days(1),
            TimeInterval::Days(2),
            TimeInterval::Days(7),
            TimeInterval::Months(1),
            TimeInterval::Months(3),
            TimeInterval::Months(6),
            TimeInterval::Years(1),
        ];
        if let Some(iv) = candidates.into_iter().find(|iv| span / iv.approx_days() <= count) {
            return Some(iv);
        }
        let years = span / 365.25;
        let step = tick_step(0.0, years, count as usize).unwrap_or(1.0).max(1.0);
        Some(TimeInterval::Years(step.round() as i32))
    }

    /// Tick dates inside the domain with their labels.
    pub fn ticks(&self, count: usize) -> Vec<(NaiveDate, String)> {
        let (Some((a, b)), Some(interval)) = (self.domain(), self.interval(count)) else {
            return Vec::new();
        };
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let fmt = interval.format();
        let mut out = Vec::new();
        let mut cursor = first_tick(lo, interval);
        while let Some(d) = cursor {
            if d > hi {
                break;
            }
            out.push((d, d.format(fmt).to_string()));
            cursor = next_tick(d, interval);
        }
        out
    }
}

fn first_tick(lo: NaiveDate, interval: TimeInterval) -> Option<NaiveDate> {
    match interval {
        TimeInterval::Days(k) => {
            let k = k.max(1) as i32;
            let n = lo.num_days_from_ce();
            let aligned = n + (k - n.rem_euclid(k)) % k;
            NaiveDate::from_num_days_from_ce_opt(aligned)
        }
        TimeInterval::Months(k) => {
            let k = k.max(1);
            let mut d = NaiveDate::from_ymd_opt(lo.year(), lo.month(), 1)?;
            if d < lo {
                d = d.checked_add_months(Months::new(1))?;
            }
            while d.month0() % k != 0 {
                d = d.checked_add_months(Months::new(1))?;
            }
            Some(d)
        }
        TimeInterval::Years(k) => {
            let k = k.max(1);
            let mut year = if lo.ordinal() == 1 { lo.year() } else { lo.year() + 1 };
            year += (k - year.rem_euclid(k)) % k;
            NaiveDate::from_ymd_opt(year, 1, 1)
        }
    }
}

fn next_tick(d: NaiveDate, interval: TimeInterval) -> Option<NaiveDate> {
    match interval {
        TimeInterval::Days(k) => d.checked_add_days(chrono::Days::new(k.max(1) as u64)),
        TimeInterval::Months(k) => d.checked_add_months(Months::new(k.max(1))),
        TimeInterval::Years(k) => NaiveDate::from_ymd_opt(d.year() + k.max(1), 1, 1),
    }
}

/// Shared scale pair. Domains follow the data, ranges follow the viewport.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScaleManager {
    pub x: TimeScale,
    pub y: LinearScale,
    revision: u64,
}

impl ScaleManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bumped on every domain or range change; geometry built against an
    /// older revision is stale.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Both domains are defined.
    pub fn is_ready(&self) -> bool {
        self.x.domain().is_some() && self.y.domain().is_some()
    }

    pub fn set_ranges(&mut self, width: f64, height: f64) {
        self.x.set_range(0.0, width.max(0.0));
        self.y.set_range(height.max(0.0), 0.0);
        self.revision += 1;
    }

    /// Domains from all points of all series; y is expanded to round bounds.
    /// An empty set clears both domains.
    pub fn set_domains(&mut self, set: &SeriesSet) {
        self.revision += 1;
        let mut points = set.points();
        let Some(first) = points.next() else {
            self.x.clear_domain();
            self.y.clear_domain();
            return;
        };
        let (mut d_min, mut d_max) = (first.date, first.date);
        let (mut v_min, mut v_max) = (first.value, first.value);
        for p in points {
            d_min = d_min.min(p.date);
            d_max = d_max.max(p.date);
            v_min = v_min.min(p.value);
            v_max = v_max.max(p.value);
        }
        self.x.set_domain(d_min, d_max);
        self.y.set_domain(v_min, v_max);
        self.y.nice(DEFAULT_TICKS);
    }

    #[inline]
    pub fn project_xy(&self, date: NaiveDate, value: f64) -> Option<ScreenPoint> {
        Some(ScreenPoint::new(self.x.map(date)?, self.y.map(value)?))
    }

    /// Screen position of a point under the current scales.
    #[inline]
    pub fn project(&self, point: &Point) -> Option<ScreenPoint> {
        self.project_xy(point.date, point.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nice_expands_outward() {
        let mut s = LinearScale::new();
        s.set_domain(3.2, 97.1);
        s.nice(DEFAULT_TICKS);
        assert_eq!(s.domain(), Some((0.0, 100.0)));
    }

    #[test]
    fn year_ticks_for_long_span() {
        let mut x = TimeScale::new();
        x.set_domain(
            NaiveDate::from_ymd_opt(1990, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        );
        let ticks = x.ticks(10);
        assert!(!ticks.is_empty());
        assert!(ticks.len() <= 11);
        assert!(ticks.iter().all(|(d, _)| d.month() == 1 && d.day() == 1));
        assert_eq!(ticks.last().unwrap().1, "2020");
    }

    #[test]
    fn day_ticks_for_short_span() {
        let mut x = TimeScale::new();
        x.set_domain(
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
        );
        assert_eq!(x.interval(10), Some(TimeInterval::Days(1)));
        let ticks = x.ticks(10);
        assert_eq!(ticks.len(), 2);
        assert_eq!(ticks[0].1, "Jan 01");
    }
}
