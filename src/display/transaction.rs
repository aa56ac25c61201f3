//! Transaction group display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::format::truncate;
use crate::analytics::CategoryLookup;
use crate::integrations::ReceiptExtraction;
use crate::models::{Money, TransactionGroup};

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Lines")]
    lines: usize,
    #[tabled(rename = "Net")]
    net: String,
}

/// Table of groups with their net effect (income minus spending)
pub fn format_group_list(
    groups: &[TransactionGroup],
    lookup: &CategoryLookup<'_>,
    symbol: &str,
) -> String {
    if groups.is_empty() {
        return "No transaction groups found.".to_string();
    }

    let rows = groups.iter().map(|g| GroupRow {
        id: g.id.short(),
        date: g.date.to_string(),
        name: truncate(&g.name, 30),
        lines: g.transactions.len(),
        net: g
            .transactions
            .iter()
            .map(|t| t.signed_amount(lookup.is_income(t.category_id)))
            .sum::<Money>()
            .format_with_symbol(symbol),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    table.to_string()
}

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

pub fn format_group_details(
    group: &TransactionGroup,
    lookup: &CategoryLookup<'_>,
    symbol: &str,
) -> String {
    let mut output = String::new();
    output.push_str(&format!("Group: {}\n", group.name));
    output.push_str(&format!("  ID:   {}\n", group.id));
    output.push_str(&format!("  Date: {}\n\n", group.date));

    if group.transactions.is_empty() {
        output.push_str("(no transactions)\n");
        return output;
    }

    let rows = group.transactions.iter().map(|t| TransactionRow {
        id: t.id.short(),
        date: t.effective_date(group.date).to_string(),
        name: truncate(&t.name, 30),
        category: lookup.name(t.category_id),
        amount: t
            .signed_amount(lookup.is_income(t.category_id))
            .format_with_symbol(symbol),
    });
    let mut table = Table::new(rows);
    table.with(Style::psql());
    output.push_str(&table.to_string());
    output.push('\n');
    output
}

#[derive(Tabled)]
struct ReceiptRow {
    #[tabled(rename = "Item")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Price")]
    amount: String,
}

/// What the assistant read off a receipt
pub fn format_receipt(
    receipt: &ReceiptExtraction,
    lookup: &CategoryLookup<'_>,
    symbol: &str,
) -> String {
    let mut output = format!("Merchant: {}\n", receipt.merchant);
    if let Some(date) = receipt.date {
        output.push_str(&format!("Date:     {}\n", date));
    }
    output.push('\n');

    if receipt.items.is_empty() {
        output.push_str("(no items read)\n");
        return output;
    }

    let rows = receipt.items.iter().map(|item| ReceiptRow {
        name: truncate(&item.name, 30),
        category: lookup.name(item.category_id),
        amount: item.amount.format_with_symbol(symbol),
    });
    let mut table = Table::new(rows);
    table.with(Style::psql());
    output.push_str(&table.to_string());
    output.push_str(&format!(
        "\nTotal: {}\n",
        receipt.total().format_with_symbol(symbol)
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrations::ai::ReceiptItem;
    use crate::models::{Category, Transaction};
    use chrono::NaiveDate;

    #[test]
    fn test_group_list_net() {
        let pay = Category::new("Pay", true);
        let categories = vec![pay.clone()];
        let lookup = CategoryLookup::new(&categories);
        let group = TransactionGroup::new("Mixed", NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
            .with_transaction(Transaction::new("pay", Money::from_cents(10000), Some(pay.id)))
            .with_transaction(Transaction::new("fee", Money::from_cents(250), None));

        let output = format_group_list(&[group], &lookup, "$");
        assert!(output.contains("$97.50"));
    }

    #[test]
    fn test_group_details_names_categories() {
        let group = TransactionGroup::new("Shop", NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
            .with_transaction(Transaction::new("gum", Money::from_cents(100), None));
        let output = format_group_details(&group, &CategoryLookup::default(), "$");
        assert!(output.contains("Uncategorized"));
        assert!(output.contains("-$1.00"));
    }

    #[test]
    fn test_receipt_total() {
        let receipt = ReceiptExtraction {
            merchant: "Corner Shop".into(),
            date: None,
            items: vec![
                ReceiptItem {
                    name: "Milk".into(),
                    amount: Money::from_cents(129),
                    category_id: None,
                },
                ReceiptItem {
                    name: "Bread".into(),
                    amount: Money::from_cents(250),
                    category_id: None,
                },
            ],
        };
        let output = format_receipt(&receipt, &CategoryLookup::default(), "$");
        assert!(output.contains("Corner Shop"));
        assert!(output.contains("Total: $3.79"));
    }
}
