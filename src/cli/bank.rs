//! Bank CLI commands
//!
//! Linking happens in the aggregator's hosted widget; this tool only creates
//! the link token, exchanges the resulting public token, and pulls
//! transactions.

use std::collections::HashMap;

use clap::Subcommand;
use log::info;

use super::CliContext;
use crate::error::BudgetwiseResult;
use crate::integrations::{AiClient, BankClient, SyncChange, SyncCursorStore};
use crate::models::{Category, CategoryId, Money};
use crate::resources::Resources;

/// Bank subcommands
#[derive(Subcommand)]
pub enum BankCommands {
    /// Create a link token for the aggregator's linking widget
    Link,

    /// Exchange the public token returned by the linking widget
    Exchange {
        /// Public token from the widget
        public_token: String,
    },

    /// Pull new bank transactions into transaction groups
    Sync {
        /// Ask the AI assistant to map bank categories to yours
        #[arg(long)]
        ai_map: bool,
        /// Show what would be imported without creating anything
        #[arg(long)]
        dry_run: bool,
        /// Ignore the saved cursor and sync from the beginning
        #[arg(long)]
        full: bool,
    },
}

/// Map aggregator labels to categories whose names match, ignoring case
fn map_by_name(labels: &[String], categories: &[Category]) -> HashMap<String, CategoryId> {
    labels
        .iter()
        .filter_map(|label| {
            categories
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(label.trim()))
                .map(|c| (label.clone(), c.id))
        })
        .collect()
}

/// Apply updates and deletions from a sync to previously imported data
async fn apply_changes(resources: &Resources, changes: &[SyncChange]) -> BudgetwiseResult<usize> {
    for change in changes {
        match change {
            SyncChange::Update {
                group_id,
                transaction_id,
                input,
            } => {
                resources
                    .transactions
                    .update(*group_id, *transaction_id, input)
                    .await?;
            }
            SyncChange::DeleteTransaction {
                group_id,
                transaction_id,
            } => resources.transactions.delete(*group_id, *transaction_id).await?,
            SyncChange::DeleteGroup(group_id) => resources.groups.delete(*group_id).await?,
        }
    }
    Ok(changes.len())
}

/// Handle a bank command
pub async fn handle_bank_command(ctx: &CliContext, cmd: BankCommands) -> BudgetwiseResult<()> {
    let bank = BankClient::from_settings(ctx.api.clone(), &ctx.settings);

    match cmd {
        BankCommands::Link => {
            let token = bank.create_link_token().await?;
            println!("Link token: {}", token.link_token);
            if let Some(expiration) = token.expiration {
                println!("  Expires: {}", expiration);
            }
            println!();
            println!("Open the linking widget with this token, then run");
            println!("'budgetwise bank exchange <public-token>' with the token it returns.");
        }

        BankCommands::Exchange { public_token } => {
            let result = bank.exchange_public_token(&public_token).await?;
            match result.item_id {
                Some(item_id) => println!("Bank linked (item {}).", item_id),
                None => println!("Bank linked."),
            }
            println!("Run 'budgetwise bank sync' to import transactions.");
        }

        BankCommands::Sync {
            ai_map,
            dry_run,
            full,
        } => {
            let cursors = SyncCursorStore::new(&ctx.paths);
            let start = if full { None } else { cursors.load()? };

            let outcome = bank.sync_all(start).await?;
            println!(
                "Fetched {} page(s): {} added, {} modified, {} removed",
                outcome.pages,
                outcome.added.len(),
                outcome.modified.len(),
                outcome.removed.len()
            );

            if outcome.is_empty() {
                if let Some(cursor) = &outcome.cursor {
                    cursors.save(cursor)?;
                }
                println!("Already up to date.");
                return Ok(());
            }

            let categories = ctx.resources.categories.list_active().await?;
            let labels = outcome.category_labels();
            let mut mapping = map_by_name(&labels, &categories);
            if ai_map {
                let unmapped: Vec<String> = labels
                    .iter()
                    .filter(|l| !mapping.contains_key(*l))
                    .cloned()
                    .collect();
                let suggested = AiClient::new(ctx.api.clone())
                    .map_categories(&unmapped, &categories)
                    .await?;
                mapping.extend(suggested.to_map());
            }

            let existing = ctx.resources.groups.list().await?;
            let plan = outcome
                .into_transaction_groups(&mapping, &categories)
                .without_existing(&existing);
            let reconciliation = outcome.reconcile(&existing);
            for deposit in &plan.skipped_inflows {
                println!(
                    "  Skipped deposit {} {} {}: map its bank category to an income category",
                    deposit.date,
                    deposit.display_name(),
                    deposit.amount.abs().format_with_symbol(ctx.symbol())
                );
            }
            if reconciliation.unmatched > 0 {
                info!(
                    "{} changed or removed bank transaction(s) were never imported",
                    reconciliation.unmatched
                );
            }

            if dry_run {
                for input in &plan.groups {
                    let total: Money = input.transactions.iter().map(|t| t.amount).sum();
                    println!(
                        "  {} {} {}",
                        input.date,
                        input.name,
                        total.format_with_symbol(ctx.symbol())
                    );
                }
                println!(
                    "Dry run: {} group(s) not created, {} change(s) not applied.",
                    plan.groups.len(),
                    reconciliation.changes.len()
                );
                return Ok(());
            }

            let created = ctx.resources.groups.create_many(&plan.groups).await?;
            let applied = apply_changes(&ctx.resources, &reconciliation.changes).await?;
            if let Some(cursor) = &outcome.cursor {
                cursors.save(cursor)?;
            }
            info!(
                "Bank sync created {} group(s) and applied {} change(s)",
                created.len(),
                applied
            );
            println!(
                "Imported {} transaction group(s), applied {} change(s).",
                created.len(),
                applied
            );
        }
    }

    Ok(())
}
