//! Budget and budget usage display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::format::{format_bar, format_percentage, truncate};
use crate::analytics::{BudgetUsage, CategoryLookup};
use crate::integrations::BudgetSuggestion;
use crate::models::Budget;

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "From")]
    start: String,
    #[tabled(rename = "To")]
    end: String,
    #[tabled(rename = "Items")]
    items: usize,
    #[tabled(rename = "Allocated")]
    allocated: String,
}

pub fn format_budget_list(budgets: &[Budget], symbol: &str) -> String {
    if budgets.is_empty() {
        return "No budgets found.".to_string();
    }

    let rows = budgets.iter().map(|b| BudgetRow {
        id: b.id.short(),
        name: truncate(&b.name, 30),
        start: b.start_date.to_string(),
        end: b.end_date.to_string(),
        items: b.items.len(),
        allocated: b.total_allocation().format_with_symbol(symbol),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    table.to_string()
}

#[derive(Tabled)]
struct AllocationRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Allocation")]
    allocation: String,
}

/// Budget header plus one row per allocation
pub fn format_budget_details(budget: &Budget, lookup: &CategoryLookup<'_>, symbol: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!("Budget: {}\n", budget.name));
    output.push_str(&format!("  ID:     {}\n", budget.id));
    output.push_str(&format!(
        "  Period: {} to {}\n",
        budget.start_date, budget.end_date
    ));
    output.push_str(&format!(
        "  Total:  {}\n\n",
        budget.total_allocation().format_with_symbol(symbol)
    ));

    if budget.items.is_empty() {
        output.push_str("No allocations yet. Use 'budgetwise budget allocate'.\n");
        return output;
    }

    let rows = budget.items.iter().map(|item| AllocationRow {
        category: lookup.name(Some(item.category_id)),
        allocation: item.allocation.format_with_symbol(symbol),
    });
    let mut table = Table::new(rows);
    table.with(Style::psql());
    output.push_str(&table.to_string());
    output.push('\n');
    output
}

#[derive(Tabled)]
struct UsageRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Allocated")]
    allocated: String,
    #[tabled(rename = "Used")]
    used: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "%")]
    percent: String,
    #[tabled(rename = "")]
    bar: String,
}

/// Usage table for a budget, overspent rows flagged with `!`
pub fn format_budget_usage(budget: &Budget, usage: &BudgetUsage, symbol: &str) -> String {
    let mut output = format!(
        "{} ({} to {})\n",
        budget.name, budget.start_date, budget.end_date
    );

    if usage.items.is_empty() {
        output.push_str("No allocations to report.\n");
        return output;
    }

    let rows = usage.items.iter().map(|item| UsageRow {
        category: if item.overspent {
            format!("! {}", item.category_name)
        } else {
            item.category_name.clone()
        },
        allocated: item.allocation.format_with_symbol(symbol),
        used: item.used.format_with_symbol(symbol),
        remaining: item.remaining.format_with_symbol(symbol),
        percent: format_percentage(item.percent_used),
        bar: format_bar(item.percent_used, 100.0, 10),
    });
    let mut table = Table::new(rows);
    table.with(Style::psql());
    output.push_str(&table.to_string());
    output.push('\n');

    output.push_str(&format!(
        "\nTotal used {} of {}",
        usage.total_used.format_with_symbol(symbol),
        usage.total_allocated.format_with_symbol(symbol)
    ));
    if usage.unbudgeted_spending.is_positive() {
        output.push_str(&format!(
            "; {} spent outside the budget",
            usage.unbudgeted_spending.format_with_symbol(symbol)
        ));
    }
    output.push('\n');
    output
}

#[derive(Tabled)]
struct SuggestionRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Suggested")]
    amount: String,
    #[tabled(rename = "Why")]
    rationale: String,
}

/// Suggested allocations with their rationale
pub fn format_suggestion(
    suggestion: &BudgetSuggestion,
    lookup: &CategoryLookup<'_>,
    symbol: &str,
) -> String {
    if suggestion.allocations.is_empty() {
        return "The assistant had no suggestions.".to_string();
    }

    let rows = suggestion.allocations.iter().map(|a| SuggestionRow {
        category: lookup.name(Some(a.category_id)),
        amount: a.amount.format_with_symbol(symbol),
        rationale: truncate(&a.rationale, 60),
    });
    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!(
        "{}\nTotal suggested: {}",
        table,
        suggestion.total().format_with_symbol(symbol)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::budget_usage;
    use crate::models::{Category, Money, Transaction, TransactionGroup};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_budget_list() {
        let budget = Budget::new("October", date(2025, 10, 1), date(2025, 10, 31))
            .with_item(Category::new("Food", false).id, Money::from_cents(12345));
        let output = format_budget_list(&[budget], "€");
        assert!(output.contains("October"));
        assert!(output.contains("€123.45"));
        assert!(format_budget_list(&[], "$").contains("No budgets"));
    }

    #[test]
    fn test_usage_flags_overspent() {
        let food = Category::new("Food", false);
        let categories = vec![food.clone()];
        let lookup = CategoryLookup::new(&categories);
        let budget = Budget::new("October", date(2025, 10, 1), date(2025, 10, 31))
            .with_item(food.id, Money::from_cents(1000));
        let groups = vec![TransactionGroup::new("Shop", date(2025, 10, 2))
            .with_transaction(Transaction::new("x", Money::from_cents(1500), Some(food.id)))];

        let usage = budget_usage(&budget, &groups, &lookup);
        let output = format_budget_usage(&budget, &usage, "$");
        assert!(output.contains("! Food"));
        assert!(output.contains("-$5.00"));
        assert!(output.contains("Total used $15.00 of $10.00"));
    }

    #[test]
    fn test_suggestion_total() {
        use crate::integrations::ai::SuggestedAllocation;

        let food = Category::new("Food", false);
        let categories = vec![food.clone()];
        let suggestion = BudgetSuggestion {
            allocations: vec![SuggestedAllocation {
                category_id: food.id,
                amount: Money::from_cents(40000),
                rationale: "Matches recent spending".into(),
            }],
        };
        let output = format_suggestion(&suggestion, &CategoryLookup::new(&categories), "$");
        assert!(output.contains("Food"));
        assert!(output.contains("Total suggested: $400.00"));
    }

    #[test]
    fn test_details_without_items() {
        let budget = Budget::new("Empty", date(2025, 1, 1), date(2025, 1, 31));
        let output = format_budget_details(&budget, &CategoryLookup::default(), "$");
        assert!(output.contains("No allocations yet"));
    }
}
