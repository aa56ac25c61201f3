//! Derived chart data for budgetwise
//!
//! Everything here is a pure function of the user's transaction groups,
//! categories and budget. The pipeline splits flows into expense and income
//! streams, buckets them by month or week, projects the budget forward,
//! merges actuals and projection into cumulative totals and derives savings.

pub mod bucket;
pub mod flows;
pub mod merge;
pub mod projection;
pub mod savings;
pub mod series;
pub mod usage;

pub use bucket::bucket_by_period;
pub use flows::{split_streams, CategoryLookup, FlowEntry, Streams};
pub use merge::{closest_preceding, merge_cumulative, MergedSeries};
pub use projection::{project_budget, DEFAULT_PROJECTION_MONTHS};
pub use savings::{savings_series, SavingsPoint};
pub use series::{Series, SeriesKey, SeriesPoint};
pub use usage::{budget_usage, BudgetUsage, ItemUsage};

use chrono::{NaiveDate, Weekday};

use crate::models::{Budget, Category, Granularity, TransactionGroup};

/// Every series the charts view draws
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartData {
    pub monthly_expenses: Series,
    pub monthly_income: Series,
    pub weekly_expenses: Series,
    pub projection: Series,
    /// Weekly actuals followed by the monthly projection, cumulated
    pub cumulative: MergedSeries,
    pub savings: Vec<SavingsPoint>,
}

impl ChartData {
    /// Run the whole pipeline
    ///
    /// `budget` is the budget to project (usually the one active `today`);
    /// the projection starts the month after `today`.
    pub fn build(
        groups: &[TransactionGroup],
        categories: &[Category],
        budget: Option<&Budget>,
        today: NaiveDate,
        projection_months: u32,
        week_start: Weekday,
    ) -> Self {
        let lookup = CategoryLookup::new(categories);
        let streams = split_streams(groups, &lookup);
        let weekly = Granularity::weekly(week_start);

        let monthly_expenses = bucket_by_period(&streams.expenses, Granularity::Monthly);
        let monthly_income = bucket_by_period(&streams.income, Granularity::Monthly);
        let weekly_expenses = bucket_by_period(&streams.expenses, weekly);
        let projection = project_budget(budget, &lookup, today, projection_months);

        let weekly_flows = bucket_by_period(&streams.all(), weekly);
        let cumulative = merge_cumulative(&weekly_flows, &projection);
        let savings = savings_series(&monthly_income, &monthly_expenses);

        Self {
            monthly_expenses,
            monthly_income,
            weekly_expenses,
            projection,
            cumulative,
            savings,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.monthly_expenses.is_empty()
            && self.monthly_income.is_empty()
            && self.projection.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, Transaction};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_build_full_pipeline() {
        let food = Category::new("Food", false);
        let salary = Category::new("Salary", true);
        let categories = vec![food.clone(), salary.clone()];

        let groups = vec![
            TransactionGroup::new("Payday", date(2025, 9, 1)).with_transaction(
                Transaction::new("Pay", Money::from_cents(300000), Some(salary.id)),
            ),
            TransactionGroup::new("Market", date(2025, 9, 10)).with_transaction(
                Transaction::new("Veg", Money::from_cents(4000), Some(food.id)),
            ),
            TransactionGroup::new("Market", date(2025, 10, 3))
                .with_transaction(Transaction::new("Veg", Money::from_cents(6000), Some(food.id)))
                .with_transaction(Transaction::new("Gum", Money::from_cents(200), None)),
        ];
        let budget = Budget::new("2025", date(2025, 1, 1), date(2025, 12, 31))
            .with_item(food.id, Money::from_cents(50000));

        let data = ChartData::build(
            &groups,
            &categories,
            Some(&budget),
            date(2025, 10, 19),
            3,
            Weekday::Mon,
        );

        assert_eq!(data.monthly_expenses.len(), 2);
        assert_eq!(data.monthly_expenses.total().cents(), -10200);
        assert_eq!(data.monthly_income.total().cents(), 300000);
        assert_eq!(data.weekly_expenses.len(), 2);
        assert_eq!(data.projection.len(), 3);
        assert_eq!(data.projection.points[0].date, date(2025, 11, 1));

        // Three weekly buckets of actuals, then the projection
        assert_eq!(data.cumulative.boundary, 3);
        assert_eq!(data.cumulative.projected().len(), 3);
        let last = data.cumulative.points.last().unwrap();
        assert_eq!(last.get(SeriesKey::Category(food.id)).cents(), -10000 - 150000);

        assert_eq!(data.savings.len(), 2);
        assert_eq!(data.savings[1].cumulative.cents(), 300000 - 10200);
    }

    #[test]
    fn test_build_without_data() {
        let data = ChartData::build(&[], &[], None, date(2025, 10, 19), 6, Weekday::Mon);
        assert!(data.is_empty());
        assert!(data.cumulative.is_empty());
        assert!(data.savings.is_empty());
    }
}
