//! Forward projection of a budget's allocations

use chrono::NaiveDate;

use super::flows::CategoryLookup;
use super::series::{Series, SeriesKey, SeriesPoint};
use crate::models::{Budget, Month};

/// Months covered when the caller has no preference
pub const DEFAULT_PROJECTION_MONTHS: u32 = 6;

/// Repeat `budget`'s allocations for each of the `months` months after `from`
///
/// Expense allocations are negated to line up with expense actuals. Without a
/// budget the projection is empty.
pub fn project_budget(
    budget: Option<&Budget>,
    lookup: &CategoryLookup<'_>,
    from: NaiveDate,
    months: u32,
) -> Series {
    let Some(budget) = budget else {
        return Series::default();
    };
    if budget.items.is_empty() {
        return Series::default();
    }

    let first = Month::from_date(from).next();
    let points = (0..months as i32)
        .map(|offset| {
            let mut point = SeriesPoint::new(first.plus(offset).start_date());
            for item in &budget.items {
                let amount = if lookup.is_income(Some(item.category_id)) {
                    item.allocation
                } else {
                    -item.allocation
                };
                point.add(SeriesKey::Category(item.category_id), amount);
            }
            point
        })
        .collect();

    Series { points }
}
