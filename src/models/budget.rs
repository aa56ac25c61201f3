//! Budget and BudgetItem models
//!
//! A budget covers an inclusive date range and holds one allocation per
//! category. Allocations are non-negative and kept to whole cents.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetId, BudgetItemId, CategoryId};
use super::money::Money;

/// A date-ranged collection of per-category allocations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,

    pub name: String,

    pub start_date: NaiveDate,

    /// Inclusive
    pub end_date: NaiveDate,

    #[serde(default)]
    pub items: Vec<BudgetItem>,
}

impl Budget {
    pub fn new(name: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id: BudgetId::new(),
            name: name.into(),
            start_date,
            end_date,
            items: Vec::new(),
        }
    }

    pub fn with_item(mut self, category_id: CategoryId, allocation: Money) -> Self {
        let mut item = BudgetItem::new(category_id, allocation);
        item.budget_id = Some(self.id);
        self.items.push(item);
        self
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    pub fn item_for(&self, category_id: CategoryId) -> Option<&BudgetItem> {
        self.items.iter().find(|i| i.category_id == category_id)
    }

    pub fn total_allocation(&self) -> Money {
        self.items.iter().map(|i| i.allocation).sum()
    }

    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        validate_range(&self.name, self.start_date, self.end_date)?;
        self.items.iter().try_for_each(|i| i.validate())
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} to {})", self.name, self.start_date, self.end_date)
    }
}

/// Pick the budget in effect on `date`
///
/// When ranges overlap the most recently started budget wins.
pub fn active_budget(budgets: &[Budget], date: NaiveDate) -> Option<&Budget> {
    budgets
        .iter()
        .filter(|b| b.contains(date))
        .max_by_key(|b| b.start_date)
}

/// One category's allocation inside a budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetItem {
    pub id: BudgetItemId,

    /// Omitted when items are nested inside their budget
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_id: Option<BudgetId>,

    pub category_id: CategoryId,

    pub allocation: Money,

    /// Amount spent (or received) against the allocation so far
    #[serde(default)]
    pub used: Money,
}

impl BudgetItem {
    pub fn new(category_id: CategoryId, allocation: Money) -> Self {
        Self {
            id: BudgetItemId::new(),
            budget_id: None,
            category_id,
            allocation,
            used: Money::zero(),
        }
    }

    pub fn remaining(&self) -> Money {
        self.allocation - self.used
    }

    pub fn is_overspent(&self) -> bool {
        self.used > self.allocation
    }

    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.allocation.is_negative() {
            return Err(BudgetValidationError::NegativeAllocation);
        }
        Ok(())
    }
}

/// Request body for creating or updating a budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetInput {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl BudgetInput {
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        validate_range(&self.name, self.start_date, self.end_date)
    }
}

/// Request body for creating or updating a budget item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetItemInput {
    pub category_id: CategoryId,
    pub allocation: Money,
}

impl BudgetItemInput {
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.allocation.is_negative() {
            return Err(BudgetValidationError::NegativeAllocation);
        }
        Ok(())
    }
}

fn validate_range(
    name: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(), BudgetValidationError> {
    if name.trim().is_empty() {
        return Err(BudgetValidationError::EmptyName);
    }
    if end < start {
        return Err(BudgetValidationError::EndBeforeStart { start, end });
    }
    Ok(())
}

/// Validation errors for budgets and allocations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    EmptyName,
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    NegativeAllocation,
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Budget name cannot be empty"),
            Self::EndBeforeStart { start, end } => {
                write!(f, "Budget ends ({}) before it starts ({})", end, start)
            }
            Self::NegativeAllocation => write!(f, "Allocation cannot be negative"),
        }
    }
}

impl std::error::Error for BudgetValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_contains_is_inclusive() {
        let budget = Budget::new("Q1", date(2025, 1, 1), date(2025, 3, 31));
        assert!(budget.contains(date(2025, 1, 1)));
        assert!(budget.contains(date(2025, 3, 31)));
        assert!(!budget.contains(date(2025, 4, 1)));
    }

    #[test]
    fn test_active_budget_prefers_latest_start() {
        let year = Budget::new("2025", date(2025, 1, 1), date(2025, 12, 31));
        let summer = Budget::new("Summer", date(2025, 6, 1), date(2025, 8, 31));
        let budgets = vec![year.clone(), summer.clone()];

        assert_eq!(active_budget(&budgets, date(2025, 7, 4)).unwrap().id, summer.id);
        assert_eq!(active_budget(&budgets, date(2025, 2, 1)).unwrap().id, year.id);
        assert!(active_budget(&budgets, date(2026, 1, 1)).is_none());
    }

    #[test]
    fn test_item_remaining_and_overspent() {
        let mut item = BudgetItem::new(CategoryId::new(), Money::from_cents(50000));
        item.used = Money::from_cents(20000);
        assert_eq!(item.remaining().cents(), 30000);
        assert!(!item.is_overspent());

        item.used = Money::from_cents(60000);
        assert_eq!(item.remaining().cents(), -10000);
        assert!(item.is_overspent());
    }

    #[test]
    fn test_validation() {
        let budget = Budget::new("Bad", date(2025, 2, 1), date(2025, 1, 1));
        assert!(matches!(
            budget.validate(),
            Err(BudgetValidationError::EndBeforeStart { .. })
        ));

        let budget = Budget::new("Ok", date(2025, 1, 1), date(2025, 1, 31))
            .with_item(CategoryId::new(), Money::from_cents(-1));
        assert_eq!(
            budget.validate(),
            Err(BudgetValidationError::NegativeAllocation)
        );

        let input = BudgetItemInput {
            category_id: CategoryId::new(),
            allocation: Money::zero(),
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_total_allocation() {
        let food = CategoryId::new();
        let rent = CategoryId::new();
        let budget = Budget::new("Jan", date(2025, 1, 1), date(2025, 1, 31))
            .with_item(food, Money::from_cents(40000))
            .with_item(rent, Money::from_cents(150000));

        assert_eq!(budget.total_allocation().cents(), 190000);
        assert_eq!(budget.item_for(rent).unwrap().allocation.cents(), 150000);
        assert_eq!(budget.items[0].budget_id, Some(budget.id));
    }
}
