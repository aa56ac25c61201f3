//! Combined savings line: income minus spending per period, accumulated

use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::series::Series;
use crate::models::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavingsPoint {
    pub date: NaiveDate,
    /// Income plus (negative) expenses for this period alone
    pub net: Money,
    /// Running total of `net`
    pub cumulative: Money,
}

/// Combine bucketed income and expense series into one savings line
///
/// Both inputs must use the same granularity. Expense values are expected to
/// be negative already.
pub fn savings_series(income: &Series, expenses: &Series) -> Vec<SavingsPoint> {
    let mut net_by_date: BTreeMap<NaiveDate, Money> = BTreeMap::new();
    for point in income.points.iter().chain(expenses.points.iter()) {
        *net_by_date.entry(point.date).or_default() += point.total();
    }

    let mut cumulative = Money::zero();
    net_by_date
        .into_iter()
        .map(|(date, net)| {
            cumulative += net;
            SavingsPoint {
                date,
                net,
                cumulative,
            }
        })
        .collect()
}
