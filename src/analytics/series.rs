//! Chart series types
//!
//! A series is a chronologically sorted list of points; each point carries
//! one amount per series key (usually a category).

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{CategoryId, Money};

/// What a value in a series point is keyed by
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SeriesKey {
    Category(CategoryId),
    Uncategorized,
}

impl SeriesKey {
    pub fn from_category(category_id: Option<CategoryId>) -> Self {
        category_id.map_or(Self::Uncategorized, Self::Category)
    }

    pub fn category_id(&self) -> Option<CategoryId> {
        match self {
            Self::Category(id) => Some(*id),
            Self::Uncategorized => None,
        }
    }
}

/// Amounts for one bucket date
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    /// First day of the bucket
    pub date: NaiveDate,
    pub values: BTreeMap<SeriesKey, Money>,
}

impl SeriesPoint {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            values: BTreeMap::new(),
        }
    }

    pub fn add(&mut self, key: SeriesKey, amount: Money) {
        *self.values.entry(key).or_default() += amount;
    }

    /// Amount for `key`; zero when the key has no activity in this bucket
    pub fn get(&self, key: SeriesKey) -> Money {
        self.values.get(&key).copied().unwrap_or_default()
    }

    pub fn total(&self) -> Money {
        self.values.values().sum()
    }
}

/// A chronologically ordered chart series
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn new(mut points: Vec<SeriesPoint>) -> Self {
        points.sort_by_key(|p| p.date);
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// Every key that appears in any point
    pub fn keys(&self) -> BTreeSet<SeriesKey> {
        self.points
            .iter()
            .flat_map(|p| p.values.keys().copied())
            .collect()
    }

    /// Sum of every value in every point
    pub fn total(&self) -> Money {
        self.points.iter().map(SeriesPoint::total).sum()
    }

    pub fn total_for(&self, key: SeriesKey) -> Money {
        self.points.iter().map(|p| p.get(key)).sum()
    }

    /// Running per-key totals; a key stays present once it has appeared
    pub fn cumulative(&self) -> Series {
        let mut running = BTreeMap::new();
        let points = self
            .points
            .iter()
            .map(|p| accumulate(&mut running, p))
            .collect();
        Series { points }
    }
}

/// Add `point` into `running` and return a snapshot dated like `point`
pub(crate) fn accumulate(
    running: &mut BTreeMap<SeriesKey, Money>,
    point: &SeriesPoint,
) -> SeriesPoint {
    for (key, amount) in &point.values {
        *running.entry(*key).or_default() += *amount;
    }
    SeriesPoint {
        date: point.date,
        values: running.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn point(d: NaiveDate, entries: &[(SeriesKey, i64)]) -> SeriesPoint {
        let mut p = SeriesPoint::new(d);
        for (key, cents) in entries {
            p.add(*key, Money::from_cents(*cents));
        }
        p
    }

    #[test]
    fn test_new_sorts_points() {
        let series = Series::new(vec![
            SeriesPoint::new(date(2025, 3, 1)),
            SeriesPoint::new(date(2025, 1, 1)),
        ]);
        assert_eq!(series.dates(), vec![date(2025, 1, 1), date(2025, 3, 1)]);
    }

    #[test]
    fn test_cumulative_carries_keys_forward() {
        let food = SeriesKey::Category(CategoryId::new());
        let rent = SeriesKey::Category(CategoryId::new());
        let series = Series::new(vec![
            point(date(2025, 1, 1), &[(food, -100), (rent, -1000)]),
            point(date(2025, 2, 1), &[(food, -50)]),
        ]);

        let cumulative = series.cumulative();
        assert_eq!(cumulative.points[1].get(food).cents(), -150);
        assert_eq!(cumulative.points[1].get(rent).cents(), -1000);
        assert_eq!(cumulative.points[1].total(), series.total());
    }

    #[test]
    fn test_empty_series() {
        let series = Series::default();
        assert!(series.is_empty());
        assert!(series.cumulative().is_empty());
        assert_eq!(series.total(), Money::zero());
        assert!(series.keys().is_empty());
    }

    #[test]
    fn test_series_key_from_category() {
        let id = CategoryId::new();
        assert_eq!(SeriesKey::from_category(Some(id)), SeriesKey::Category(id));
        assert_eq!(SeriesKey::from_category(None), SeriesKey::Uncategorized);
        assert_eq!(SeriesKey::Uncategorized.category_id(), None);
    }
}
