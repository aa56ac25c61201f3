//! Budget CLI commands
//!
//! Implements CLI commands for budgets, their allocations and usage.

use clap::Subcommand;

use super::{parse_amount, parse_date, today, CliContext};
use crate::analytics::{budget_usage, CategoryLookup};
use crate::display::{format_budget_details, format_budget_list, format_budget_usage};
use crate::error::{BudgetwiseError, BudgetwiseResult};
use crate::models::{Budget, BudgetInput, BudgetItemInput};

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// List all budgets
    List,

    /// Show a budget and its allocations
    Show {
        /// Budget name or ID (defaults to the budget covering today)
        budget: Option<String>,
    },

    /// Create a new budget
    Create {
        /// Budget name
        name: String,
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        from: String,
        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        to: String,
    },

    /// Delete a budget
    Delete {
        /// Budget name or ID
        budget: String,
    },

    /// Set the allocation for a category
    Allocate {
        /// Budget name or ID
        budget: String,
        /// Category name or ID
        category: String,
        /// Amount (e.g., "250" or "250.00")
        amount: String,
    },

    /// Show how much of each allocation has been used
    Usage {
        /// Budget name or ID (defaults to the budget covering today)
        budget: Option<String>,
    },
}

/// The named budget, or the one covering today
pub async fn resolve_budget(ctx: &CliContext, identifier: Option<&str>) -> BudgetwiseResult<Budget> {
    match identifier {
        Some(identifier) => ctx.resources.budgets.find(identifier).await,
        None => {
            let today = today();
            ctx.resources
                .budgets
                .active(today)
                .await?
                .ok_or_else(|| BudgetwiseError::budget_not_found(format!("covering {}", today)))
        }
    }
}

/// Handle a budget command
pub async fn handle_budget_command(ctx: &CliContext, cmd: BudgetCommands) -> BudgetwiseResult<()> {
    let budgets = &ctx.resources.budgets;

    match cmd {
        BudgetCommands::List => {
            let list = budgets.list().await?;
            println!("{}", format_budget_list(&list, ctx.symbol()));
        }

        BudgetCommands::Show { budget } => {
            let budget = resolve_budget(ctx, budget.as_deref()).await?;
            let categories = ctx.resources.categories.list().await?;
            let lookup = CategoryLookup::new(&categories);
            print!("{}", format_budget_details(&budget, &lookup, ctx.symbol()));
        }

        BudgetCommands::Create { name, from, to } => {
            let input = BudgetInput {
                name: name.trim().to_string(),
                start_date: parse_date(&from)?,
                end_date: parse_date(&to)?,
            };
            let budget = budgets.create(&input).await?;
            println!("Created budget: {}", budget);
            println!("  ID: {}", budget.id);
        }

        BudgetCommands::Delete { budget } => {
            let budget = budgets.find(&budget).await?;
            budgets.delete(budget.id).await?;
            println!("Deleted budget: {}", budget.name);
        }

        BudgetCommands::Allocate {
            budget,
            category,
            amount,
        } => {
            let budget = budgets.find(&budget).await?;
            let category = ctx.resources.categories.find(&category).await?;
            let input = BudgetItemInput {
                category_id: category.id,
                allocation: parse_amount(&amount)?,
            };

            let item = ctx.resources.budget_items.upsert(&budget, &input).await?;
            println!(
                "Allocated {} to {} in {}",
                item.allocation.format_with_symbol(ctx.symbol()),
                category.name,
                budget.name
            );
        }

        BudgetCommands::Usage { budget } => {
            let budget = resolve_budget(ctx, budget.as_deref()).await?;
            let categories = ctx.resources.categories.list().await?;
            // Transactions may carry their own dates, so filter after flattening
            let groups = ctx.resources.groups.list().await?;

            let lookup = CategoryLookup::new(&categories);
            let usage = budget_usage(&budget, &groups, &lookup);
            print!("{}", format_budget_usage(&budget, &usage, ctx.symbol()));
        }
    }

    Ok(())
}
