//! Transaction group CLI commands
//!
//! A group is one dated bundle (a receipt, a bank import); `add-txn` appends
//! lines to an existing group.

use std::fs::File;
use std::path::PathBuf;

use clap::Subcommand;

use super::{parse_amount, parse_date, parse_date_or_today, CliContext};
use crate::analytics::CategoryLookup;
use crate::display::{format_group_details, format_group_list};
use crate::error::{BudgetwiseError, BudgetwiseResult};
use crate::export::export_transactions_csv;
use crate::models::{TransactionGroupInput, TransactionInput};

/// Transaction group subcommands
#[derive(Subcommand)]
pub enum GroupCommands {
    /// List transaction groups, newest first
    List {
        /// Only groups on or after this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Only groups on or before this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },

    /// Show a group and its transactions
    Show {
        /// Group ID (full or short)
        group: String,
    },

    /// Create a new, empty transaction group
    Create {
        /// Group name, e.g. the merchant
        name: String,
        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Delete a group and all its transactions
    Delete {
        /// Group ID (full or short)
        group: String,
    },

    /// Add a transaction to a group
    #[command(name = "add-txn")]
    AddTxn {
        /// Group ID (full or short)
        group: String,
        /// Transaction name
        name: String,
        /// Amount as a positive number; the category decides the direction
        amount: String,
        /// Category name or ID (uncategorized counts as spending)
        #[arg(short, long)]
        category: Option<String>,
        /// Date if different from the group's (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Remove a transaction from a group
    #[command(name = "remove-txn")]
    RemoveTxn {
        /// Group ID (full or short)
        group: String,
        /// Transaction ID (full or short)
        transaction: String,
    },

    /// Export every transaction to a CSV file
    Export {
        /// Output path
        path: PathBuf,
    },
}

/// Handle a transaction group command
pub async fn handle_group_command(ctx: &CliContext, cmd: GroupCommands) -> BudgetwiseResult<()> {
    let groups = &ctx.resources.groups;

    match cmd {
        GroupCommands::List { from, to } => {
            let list = match (from, to) {
                (None, None) => groups.list().await?,
                (from, to) => {
                    let start = from.as_deref().map(parse_date).transpose()?;
                    let end = to.as_deref().map(parse_date).transpose()?;
                    groups
                        .list_between(
                            start.unwrap_or(chrono::NaiveDate::MIN),
                            end.unwrap_or(chrono::NaiveDate::MAX),
                        )
                        .await?
                }
            };
            let categories = ctx.resources.categories.list().await?;
            let lookup = CategoryLookup::new(&categories);
            println!("{}", format_group_list(&list, &lookup, ctx.symbol()));
        }

        GroupCommands::Show { group } => {
            let group = groups.find(&group).await?;
            let categories = ctx.resources.categories.list().await?;
            let lookup = CategoryLookup::new(&categories);
            print!("{}", format_group_details(&group, &lookup, ctx.symbol()));
        }

        GroupCommands::Create { name, date } => {
            let input = TransactionGroupInput {
                name: name.trim().to_string(),
                date: parse_date_or_today(date.as_deref())?,
                transactions: Vec::new(),
            };
            let group = groups.create(&input).await?;
            println!("Created transaction group: {}", group);
            println!("  ID: {}", group.id);
        }

        GroupCommands::Delete { group } => {
            let group = groups.find(&group).await?;
            groups.delete(group.id).await?;
            println!("Deleted transaction group: {}", group);
        }

        GroupCommands::AddTxn {
            group,
            name,
            amount,
            category,
            date,
        } => {
            let group = groups.find(&group).await?;
            let category = match category {
                Some(category) => Some(ctx.resources.categories.find(&category).await?),
                None => None,
            };
            let input = TransactionInput {
                name: name.trim().to_string(),
                amount: parse_amount(&amount)?,
                category_id: category.as_ref().map(|c| c.id),
                date: date.as_deref().map(parse_date).transpose()?,
                external_id: None,
            };

            let txn = ctx.resources.transactions.create(group.id, &input).await?;
            println!(
                "Added {} ({}) to {} as {}",
                txn.name,
                txn.amount.format_with_symbol(ctx.symbol()),
                group.name,
                category.map_or_else(|| "Uncategorized".to_string(), |c| c.name)
            );
        }

        GroupCommands::RemoveTxn { group, transaction } => {
            let group = groups.find(&group).await?;
            let wanted = transaction.trim();
            let txn = group
                .transactions
                .iter()
                .find(|t| t.id.to_string() == wanted || t.id.short() == wanted)
                .ok_or_else(|| BudgetwiseError::transaction_not_found(wanted))?;

            ctx.resources.transactions.delete(group.id, txn.id).await?;
            println!("Removed {} from {}", txn.name, group.name);
        }

        GroupCommands::Export { path } => {
            let list = groups.list().await?;
            let categories = ctx.resources.categories.list().await?;
            let lookup = CategoryLookup::new(&categories);

            let file = File::create(&path)?;
            export_transactions_csv(file, &list, &lookup)?;
            println!("Exported {} group(s) to {}", list.len(), path.display());
        }
    }

    Ok(())
}
