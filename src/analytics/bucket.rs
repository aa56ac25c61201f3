//! Group flows by calendar bucket and category

use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::flows::FlowEntry;
use super::series::{Series, SeriesKey, SeriesPoint};
use crate::models::Granularity;

/// Sum `entries` per bucket and per category
///
/// Only buckets with at least one entry produce a point.
pub fn bucket_by_period(entries: &[FlowEntry], granularity: Granularity) -> Series {
    let mut buckets: BTreeMap<NaiveDate, SeriesPoint> = BTreeMap::new();

    for entry in entries {
        let start = granularity.bucket_start(entry.date);
        buckets
            .entry(start)
            .or_insert_with(|| SeriesPoint::new(start))
            .add(SeriesKey::from_category(entry.category_id), entry.amount);
    }

    Series {
        points: buckets.into_values().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryId, Money};
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(d: NaiveDate, category: Option<CategoryId>, cents: i64) -> FlowEntry {
        FlowEntry {
            date: d,
            category_id: category,
            amount: Money::from_cents(cents),
        }
    }

    #[test]
    fn test_monthly_buckets_sum_per_category() {
        let food = CategoryId::new();
        let fuel = CategoryId::new();
        let entries = vec![
            entry(date(2025, 1, 3), Some(food), -1000),
            entry(date(2025, 1, 28), Some(food), -500),
            entry(date(2025, 1, 15), Some(fuel), -4000),
            entry(date(2025, 2, 1), Some(food), -700),
        ];

        let series = bucket_by_period(&entries, Granularity::Monthly);
        assert_eq!(series.dates(), vec![date(2025, 1, 1), date(2025, 2, 1)]);
        assert_eq!(series.points[0].get(SeriesKey::Category(food)).cents(), -1500);
        assert_eq!(series.points[0].get(SeriesKey::Category(fuel)).cents(), -4000);
        assert_eq!(series.points[1].total().cents(), -700);
    }

    #[test]
    fn test_weekly_buckets() {
        let entries = vec![
            entry(date(2025, 3, 17), None, -100), // Monday
            entry(date(2025, 3, 23), None, -200), // Sunday, same week
            entry(date(2025, 3, 24), None, -300), // next Monday
        ];

        let series = bucket_by_period(&entries, Granularity::weekly(Weekday::Mon));
        assert_eq!(series.len(), 2);
        assert_eq!(series.points[0].get(SeriesKey::Uncategorized).cents(), -300);
        assert_eq!(series.points[1].date, date(2025, 3, 24));
    }

    #[test]
    fn test_sum_is_preserved() {
        let entries: Vec<FlowEntry> = (1..=28)
            .map(|d| entry(date(2025, 2, d), None, -(d as i64) * 10))
            .collect();
        let expected: Money = entries.iter().map(|e| e.amount).sum();

        for granularity in [Granularity::Monthly, Granularity::weekly(Weekday::Sun)] {
            assert_eq!(bucket_by_period(&entries, granularity).total(), expected);
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(bucket_by_period(&[], Granularity::Monthly).is_empty());
    }
}
