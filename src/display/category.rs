//! Category display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::format::truncate;
use crate::models::Category;

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Color")]
    color: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

/// Table of categories
pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'budgetwise category create <name>' to add one."
            .to_string();
    }

    let rows = categories.iter().map(|c| CategoryRow {
        id: c.id.short(),
        name: truncate(&c.name, 30),
        kind: c.kind(),
        color: c.color.clone(),
        status: if c.legacy { "legacy" } else { "active" },
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    table.to_string()
}

pub fn format_category_details(category: &Category) -> String {
    let mut output = String::new();

    output.push_str(&format!("Category: {}\n", category.name));
    output.push_str(&format!("  ID:     {}\n", category.id));
    output.push_str(&format!("  Kind:   {}\n", category.kind()));
    output.push_str(&format!("  Color:  {}\n", category.color));
    if category.legacy {
        output.push_str("  Legacy: yes (hidden from pickers)\n");
    }
    if let Some(created) = category.created_at {
        output.push_str(&format!("  Created: {}\n", created.format("%Y-%m-%d %H:%M UTC")));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list() {
        assert!(format_category_list(&[]).contains("No categories found"));
    }

    #[test]
    fn test_list_shows_short_ids_and_kinds() {
        let food = Category::new("Food", false);
        let mut old = Category::new("Salary", true);
        old.legacy = true;

        let output = format_category_list(&[food.clone(), old]);
        assert!(output.contains(&food.id.short()));
        assert!(output.contains("expense"));
        assert!(output.contains("income"));
        assert!(output.contains("legacy"));
    }

    #[test]
    fn test_details() {
        let category = Category::new("Food", false).with_color("#ff0000");
        let output = format_category_details(&category);
        assert!(output.contains("Category: Food"));
        assert!(output.contains("#ff0000"));
        assert!(!output.contains("Legacy"));
    }
}
