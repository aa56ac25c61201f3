//! Join historical actuals with a projection into one cumulative series
//!
//! The result records `boundary`, the index of the first projected point, so
//! a chart can draw actuals solid and the projection shaded.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::series::{accumulate, Series, SeriesPoint};

/// Cumulative series with the actual/projected split point
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedSeries {
    pub points: Vec<SeriesPoint>,
    /// Index of the first projected point; equals `points.len()` without a projection
    pub boundary: usize,
}

impl MergedSeries {
    pub fn historical(&self) -> &[SeriesPoint] {
        &self.points[..self.boundary]
    }

    pub fn projected(&self) -> &[SeriesPoint] {
        &self.points[self.boundary..]
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Index of the last date in sorted `dates` that is on or before `target`
pub fn closest_preceding(dates: &[NaiveDate], target: NaiveDate) -> Option<usize> {
    dates.partition_point(|d| *d <= target).checked_sub(1)
}

/// Merge `historical` and `projection` into running per-category totals
///
/// The projection starts after the closest historical bucket preceding its
/// first date; historical buckets past that point are superseded and dropped.
/// Projected totals continue from the last kept historical totals.
pub fn merge_cumulative(historical: &Series, projection: &Series) -> MergedSeries {
    let Some(first_projected) = projection.points.first() else {
        let points = historical.cumulative().points;
        return MergedSeries {
            boundary: points.len(),
            points,
        };
    };

    let kept = closest_preceding(&historical.dates(), first_projected.date)
        .map_or(0, |index| index + 1);

    let mut running = BTreeMap::new();
    let mut points: Vec<SeriesPoint> = historical.points[..kept]
        .iter()
        .map(|p| accumulate(&mut running, p))
        .collect();
    points.extend(projection.points.iter().map(|p| accumulate(&mut running, p)));

    MergedSeries {
        points,
        boundary: kept,
    }
}
