//! AI assistant CLI commands

use std::path::PathBuf;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::Subcommand;

use super::budget::resolve_budget;
use super::{parse_amount, parse_date_or_today, CliContext};
use crate::analytics::{bucket_by_period, split_streams, CategoryLookup};
use crate::display::{format_receipt, format_suggestion};
use crate::error::{BudgetwiseError, BudgetwiseResult};
use crate::integrations::{AiClient, CategorySpending};
use crate::models::{Granularity, Money};

/// AI subcommands
#[derive(Subcommand)]
pub enum AiCommands {
    /// Suggest allocations from your spending history
    Suggest {
        /// Monthly income to plan with (defaults to your average monthly income)
        #[arg(long)]
        income: Option<String>,
        /// Write the suggestion into this budget (name or ID)
        #[arg(long)]
        apply: Option<String>,
    },

    /// Map outside category labels onto your categories
    Map {
        /// Labels to map, e.g. from a bank or another app
        #[arg(required = true)]
        labels: Vec<String>,
    },

    /// Read a receipt image into a transaction group
    Receipt {
        /// Path to the receipt image
        path: PathBuf,
        /// Create the transaction group instead of only showing it
        #[arg(long)]
        save: bool,
        /// Date to use when none is printed (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
}

/// Handle an AI command
pub async fn handle_ai_command(ctx: &CliContext, cmd: AiCommands) -> BudgetwiseResult<()> {
    let ai = AiClient::new(ctx.api.clone());

    match cmd {
        AiCommands::Suggest { income, apply } => {
            let categories = ctx.resources.categories.list_active().await?;
            let groups = ctx.resources.groups.list().await?;
            let lookup = CategoryLookup::new(&categories);

            let streams = split_streams(&groups, &lookup);
            let monthly_expenses = bucket_by_period(&streams.expenses, Granularity::Monthly);
            let monthly_income = bucket_by_period(&streams.income, Granularity::Monthly);

            let income = match income {
                Some(amount) => parse_amount(&amount)?,
                None if monthly_income.is_empty() => Money::zero(),
                None => Money::from_cents(
                    monthly_income.total().cents() / monthly_income.len() as i64,
                ),
            };
            let history = CategorySpending::from_monthly_expenses(&monthly_expenses, &categories);

            let suggestion = ai.suggest_budget(&categories, income, &history).await?;
            println!("{}", format_suggestion(&suggestion, &lookup, ctx.symbol()));

            if let Some(budget) = apply {
                let budget = resolve_budget(ctx, Some(&budget)).await?;
                for input in suggestion.to_item_inputs() {
                    ctx.resources.budget_items.upsert(&budget, &input).await?;
                }
                println!(
                    "\nApplied {} allocation(s) to {}",
                    suggestion.allocations.len(),
                    budget.name
                );
            }
        }

        AiCommands::Map { labels } => {
            let categories = ctx.resources.categories.list_active().await?;
            let lookup = CategoryLookup::new(&categories);
            let mapping = ai.map_categories(&labels, &categories).await?;

            for label in &labels {
                let target = mapping
                    .pairs
                    .iter()
                    .find(|p| &p.from == label)
                    .map_or_else(|| "(no match)".to_string(), |p| lookup.name(Some(p.to)));
                println!("{} -> {}", label, target);
            }
        }

        AiCommands::Receipt { path, save, date } => {
            let bytes = std::fs::read(&path).map_err(|e| {
                BudgetwiseError::Io(format!("Failed to read {}: {}", path.display(), e))
            })?;
            let image = STANDARD.encode(bytes);

            let categories = ctx.resources.categories.list_active().await?;
            let lookup = CategoryLookup::new(&categories);
            let receipt = ai.extract_receipt(&image, &categories).await?;
            print!("{}", format_receipt(&receipt, &lookup, ctx.symbol()));

            if save {
                let input = receipt.to_group_input(parse_date_or_today(date.as_deref())?);
                let group = ctx.resources.groups.create(&input).await?;
                println!("\nSaved as transaction group {} ({})", group.name, group.id.short());
            }
        }
    }

    Ok(())
}
