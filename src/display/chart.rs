//! Chart series as terminal tables
//!
//! One row per bucket, one column per series key, plus a total column.

use tabled::builder::Builder;
use tabled::settings::Style;

use crate::analytics::{CategoryLookup, MergedSeries, SavingsPoint, SeriesKey, SeriesPoint};
use crate::models::Granularity;

/// Column heading for a series key
pub fn key_label(key: SeriesKey, lookup: &CategoryLookup<'_>) -> String {
    match key {
        SeriesKey::Category(id) => lookup.name(Some(id)),
        SeriesKey::Uncategorized => "Uncategorized".to_string(),
    }
}

fn series_table(
    points: &[SeriesPoint],
    boundary: Option<usize>,
    granularity: Granularity,
    lookup: &CategoryLookup<'_>,
    symbol: &str,
) -> String {
    let keys: Vec<SeriesKey> = {
        let mut keys: Vec<SeriesKey> = points
            .iter()
            .flat_map(|p| p.values.keys().copied())
            .collect();
        keys.sort();
        keys.dedup();
        keys
    };

    let mut builder = Builder::default();
    let mut header = vec!["Period".to_string()];
    header.extend(keys.iter().map(|k| key_label(*k, lookup)));
    header.push("Total".to_string());
    if boundary.is_some() {
        header.push(String::new());
    }
    builder.push_record(header);

    for (index, point) in points.iter().enumerate() {
        let mut record = vec![granularity.label(point.date)];
        record.extend(keys.iter().map(|k| point.get(*k).format_with_symbol(symbol)));
        record.push(point.total().format_with_symbol(symbol));
        if let Some(boundary) = boundary {
            record.push(if index >= boundary { "projected" } else { "" }.to_string());
        }
        builder.push_record(record);
    }

    let mut table = builder.build();
    table.with(Style::psql());
    table.to_string()
}

/// Bucketed amounts per category
pub fn format_series(
    points: &[SeriesPoint],
    granularity: Granularity,
    lookup: &CategoryLookup<'_>,
    symbol: &str,
) -> String {
    if points.is_empty() {
        return "No data for this chart.".to_string();
    }
    series_table(points, None, granularity, lookup, symbol)
}

/// Cumulative actuals followed by projected rows
///
/// Actual rows are weekly and projected rows monthly, so every row is
/// labelled with its full start date.
pub fn format_merged(
    merged: &MergedSeries,
    week_granularity: Granularity,
    lookup: &CategoryLookup<'_>,
    symbol: &str,
) -> String {
    if merged.is_empty() {
        return "No data for this chart.".to_string();
    }
    series_table(
        &merged.points,
        Some(merged.boundary),
        week_granularity,
        lookup,
        symbol,
    )
}

pub fn format_savings(points: &[SavingsPoint], symbol: &str) -> String {
    if points.is_empty() {
        return "No data for this chart.".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(["Month", "Net", "Cumulative"]);
    for point in points {
        builder.push_record([
            Granularity::Monthly.label(point.date),
            point.net.format_with_symbol(symbol),
            point.cumulative.format_with_symbol(symbol),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::psql());
    table.to_string()
}
