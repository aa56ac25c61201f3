//! CSV export of chart series and transactions
//!
//! Series are written in long form (one row per period and series) so the
//! column set does not depend on which categories had activity.

use std::io::Write;

use crate::analytics::{CategoryLookup, MergedSeries, SavingsPoint, SeriesPoint};
use crate::display::key_label;
use crate::error::BudgetwiseResult;
use crate::models::{Money, TransactionGroup};

/// Plain decimal without a currency symbol, e.g. `-12.50`
fn amount(money: Money) -> String {
    money.format_with_symbol("")
}

/// Write bucketed series as `date,series,amount`
pub fn export_series_csv<W: Write>(
    writer: W,
    points: &[SeriesPoint],
    lookup: &CategoryLookup<'_>,
) -> BudgetwiseResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["date", "series", "amount"])?;

    for point in points {
        for (key, value) in &point.values {
            csv.write_record([
                point.date.to_string(),
                key_label(*key, lookup),
                amount(*value),
            ])?;
        }
    }

    csv.flush()?;
    Ok(())
}

/// Write the merged cumulative series as `date,series,amount,projected`
pub fn export_merged_csv<W: Write>(
    writer: W,
    merged: &MergedSeries,
    lookup: &CategoryLookup<'_>,
) -> BudgetwiseResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["date", "series", "amount", "projected"])?;

    for (index, point) in merged.points.iter().enumerate() {
        let projected = index >= merged.boundary;
        for (key, value) in &point.values {
            csv.write_record([
                point.date.to_string(),
                key_label(*key, lookup),
                amount(*value),
                projected.to_string(),
            ])?;
        }
    }

    csv.flush()?;
    Ok(())
}

/// Write the savings line as `date,net,cumulative`
pub fn export_savings_csv<W: Write>(writer: W, points: &[SavingsPoint]) -> BudgetwiseResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["date", "net", "cumulative"])?;

    for point in points {
        csv.write_record([
            point.date.to_string(),
            amount(point.net),
            amount(point.cumulative),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

/// Write every transaction as `date,group,transaction,category,amount` with signed amounts
pub fn export_transactions_csv<W: Write>(
    writer: W,
    groups: &[TransactionGroup],
    lookup: &CategoryLookup<'_>,
) -> BudgetwiseResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["date", "group", "transaction", "category", "amount"])?;

    for group in groups {
        for txn in &group.transactions {
            csv.write_record([
                txn.effective_date(group.date).to_string(),
                group.name.clone(),
                txn.name.clone(),
                lookup.name(txn.category_id),
                amount(txn.signed_amount(lookup.is_income(txn.category_id))),
            ])?;
        }
    }

    csv.flush()?;
    Ok(())
}
