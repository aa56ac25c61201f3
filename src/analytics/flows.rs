//! Flatten transaction groups into signed money flows
//!
//! Every transaction becomes one [`FlowEntry`] dated by its own date or its
//! group's date. Entries are split into an expense stream (amounts negated so
//! spending charts below zero) and an income stream.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::models::{Category, CategoryId, Money, TransactionGroup};

/// Resolves category ids to their income/expense flag
#[derive(Debug, Clone, Default)]
pub struct CategoryLookup<'a> {
    by_id: HashMap<CategoryId, &'a Category>,
}

impl<'a> CategoryLookup<'a> {
    pub fn new(categories: &'a [Category]) -> Self {
        Self {
            by_id: categories.iter().map(|c| (c.id, c)).collect(),
        }
    }

    pub fn get(&self, id: CategoryId) -> Option<&'a Category> {
        self.by_id.get(&id).copied()
    }

    /// Missing or unknown categories are treated as expenses
    pub fn is_income(&self, id: Option<CategoryId>) -> bool {
        id.and_then(|id| self.get(id)).is_some_and(|c| c.is_income)
    }

    pub fn name(&self, id: Option<CategoryId>) -> String {
        match id.and_then(|id| self.get(id)) {
            Some(c) => c.name.clone(),
            None if id.is_some() => "Unknown".to_string(),
            None => "Uncategorized".to_string(),
        }
    }
}

/// One transaction's dated, signed contribution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowEntry {
    pub date: NaiveDate,
    pub category_id: Option<CategoryId>,
    /// Negative for expenses, positive for income
    pub amount: Money,
}

/// Expense and income flows kept apart
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Streams {
    pub expenses: Vec<FlowEntry>,
    pub income: Vec<FlowEntry>,
}

impl Streams {
    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty() && self.income.is_empty()
    }

    /// Both streams together, ordered by date
    pub fn all(&self) -> Vec<FlowEntry> {
        let mut entries: Vec<FlowEntry> = self
            .expenses
            .iter()
            .chain(self.income.iter())
            .copied()
            .collect();
        entries.sort_by_key(|e| e.date);
        entries
    }

    pub fn total_expenses(&self) -> Money {
        self.expenses.iter().map(|e| e.amount).sum()
    }

    pub fn total_income(&self) -> Money {
        self.income.iter().map(|e| e.amount).sum()
    }

    /// Keep only entries dated within `start..=end`
    pub fn within(&self, start: NaiveDate, end: NaiveDate) -> Streams {
        let keep = |e: &&FlowEntry| e.date >= start && e.date <= end;
        Streams {
            expenses: self.expenses.iter().filter(keep).copied().collect(),
            income: self.income.iter().filter(keep).copied().collect(),
        }
    }
}

/// Split every transaction in `groups` into the expense or income stream
pub fn split_streams(groups: &[TransactionGroup], lookup: &CategoryLookup<'_>) -> Streams {
    let mut streams = Streams::default();

    for group in groups {
        for txn in &group.transactions {
            let is_income = lookup.is_income(txn.category_id);
            let entry = FlowEntry {
                date: txn.effective_date(group.date),
                category_id: txn.category_id,
                amount: txn.signed_amount(is_income),
            };
            if is_income {
                streams.income.push(entry);
            } else {
                streams.expenses.push(entry);
            }
        }
    }

    streams.expenses.sort_by_key(|e| e.date);
    streams.income.sort_by_key(|e| e.date);
    streams
}
