//! Budget usage: how much of each allocation has been used
//!
//! Usage is recomputed from transactions dated inside the budget's range.
//! For expense categories "used" is the amount spent; for income categories
//! it is the amount received.

use std::collections::HashMap;

use super::flows::{split_streams, CategoryLookup};
use crate::models::{Budget, CategoryId, Money, TransactionGroup};

#[derive(Debug, Clone, PartialEq)]
pub struct ItemUsage {
    pub category_id: CategoryId,
    pub category_name: String,
    pub is_income: bool,
    pub allocation: Money,
    pub used: Money,
    pub remaining: Money,
    /// Percentage of the allocation used; 0 when nothing was allocated
    pub percent_used: f64,
    pub overspent: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetUsage {
    pub items: Vec<ItemUsage>,
    pub total_allocated: Money,
    pub total_used: Money,
    /// Spending in categories the budget has no item for
    pub unbudgeted_spending: Money,
}

impl BudgetUsage {
    pub fn overspent(&self) -> impl Iterator<Item = &ItemUsage> {
        self.items.iter().filter(|i| i.overspent)
    }
}

/// Compute usage for every item of `budget`
pub fn budget_usage(
    budget: &Budget,
    groups: &[TransactionGroup],
    lookup: &CategoryLookup<'_>,
) -> BudgetUsage {
    let streams = split_streams(groups, lookup).within(budget.start_date, budget.end_date);

    let mut used_by_category: HashMap<Option<CategoryId>, Money> = HashMap::new();
    for entry in streams.expenses.iter().chain(streams.income.iter()) {
        *used_by_category.entry(entry.category_id).or_default() += entry.amount.abs();
    }

    let items: Vec<ItemUsage> = budget
        .items
        .iter()
        .map(|item| {
            let used = used_by_category
                .get(&Some(item.category_id))
                .copied()
                .unwrap_or_default();
            let percent_used = if item.allocation.is_zero() {
                0.0
            } else {
                used.cents() as f64 / item.allocation.cents() as f64 * 100.0
            };
            let is_income = lookup.is_income(Some(item.category_id));
            ItemUsage {
                category_id: item.category_id,
                category_name: lookup.name(Some(item.category_id)),
                is_income,
                allocation: item.allocation,
                used,
                remaining: item.allocation - used,
                percent_used,
                // Receiving more income than planned is not a problem
                overspent: !is_income && used > item.allocation,
            }
        })
        .collect();

    let unbudgeted_spending = streams
        .expenses
        .iter()
        .filter(|e| e.category_id.map_or(true, |id| budget.item_for(id).is_none()))
        .map(|e| e.amount.abs())
        .sum();

    BudgetUsage {
        total_allocated: items.iter().map(|i| i.allocation).sum(),
        total_used: items.iter().map(|i| i.used).sum(),
        items,
        unbudgeted_spending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Transaction};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_usage_counts_only_in_range() {
        let food = Category::new("Food", false);
        let fun = Category::new("Fun", false);
        let pay = Category::new("Pay", true);
        let categories = vec![food.clone(), fun.clone(), pay.clone()];
        let lookup = CategoryLookup::new(&categories);

        let budget = Budget::new("March", date(2025, 3, 1), date(2025, 3, 31))
            .with_item(food.id, Money::from_cents(40000))
            .with_item(fun.id, Money::from_cents(5000))
            .with_item(pay.id, Money::from_cents(300000));

        let groups = vec![
            TransactionGroup::new("Shop", date(2025, 3, 2))
                .with_transaction(Transaction::new("a", Money::from_cents(12000), Some(food.id)))
                .with_transaction(Transaction::new("b", Money::from_cents(8000), Some(fun.id))),
            TransactionGroup::new("Old", date(2025, 2, 27))
                .with_transaction(Transaction::new("c", Money::from_cents(9999), Some(food.id))),
            TransactionGroup::new("Payday", date(2025, 3, 15))
                .with_transaction(Transaction::new("d", Money::from_cents(310000), Some(pay.id))),
            TransactionGroup::new("Misc", date(2025, 3, 20))
                .with_transaction(Transaction::new("e", Money::from_cents(700), None)),
        ];

        let usage = budget_usage(&budget, &groups, &lookup);
        let food_usage = &usage.items[0];
        assert_eq!(food_usage.used.cents(), 12000);
        assert_eq!(food_usage.remaining.cents(), 28000);
        assert!((food_usage.percent_used - 30.0).abs() < f64::EPSILON);

        let fun_usage = &usage.items[1];
        assert!(fun_usage.overspent);

        let pay_usage = &usage.items[2];
        assert_eq!(pay_usage.used.cents(), 310000);
        assert!(!pay_usage.overspent);

        assert_eq!(usage.overspent().count(), 1);
        assert_eq!(usage.unbudgeted_spending.cents(), 700);
        assert_eq!(usage.total_allocated, budget.total_allocation());
    }

    #[test]
    fn test_zero_allocation_percent() {
        let food = Category::new("Food", false);
        let categories = vec![food.clone()];
        let lookup = CategoryLookup::new(&categories);
        let budget = Budget::new("B", date(2025, 1, 1), date(2025, 1, 31))
            .with_item(food.id, Money::zero());

        let usage = budget_usage(&budget, &[], &lookup);
        assert_eq!(usage.items[0].percent_used, 0.0);
        assert_eq!(usage.total_used, Money::zero());
    }
}
