//! Category CLI commands
//!
//! Implements CLI commands for category management.

use clap::Subcommand;

use super::CliContext;
use crate::display::{format_category_details, format_category_list};
use crate::error::BudgetwiseResult;
use crate::models::CategoryInput;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List categories
    List {
        /// Include legacy categories
        #[arg(short, long)]
        all: bool,
    },

    /// Create a new category
    Create {
        /// Category name
        name: String,
        /// Mark as an income category
        #[arg(long)]
        income: bool,
        /// Hex color, e.g. "#4caf50"
        #[arg(short, long)]
        color: Option<String>,
    },

    /// Show category details
    Show {
        /// Category name or ID
        category: String,
    },

    /// Edit a category
    Edit {
        /// Category name or ID
        category: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New hex color
        #[arg(short, long)]
        color: Option<String>,
        /// Retire the category (hidden from pickers, kept for history)
        #[arg(long, conflicts_with = "restore")]
        legacy: bool,
        /// Bring a legacy category back
        #[arg(long)]
        restore: bool,
    },

    /// Delete a category
    Delete {
        /// Category name or ID
        category: String,
    },
}

/// Handle a category command
pub async fn handle_category_command(ctx: &CliContext, cmd: CategoryCommands) -> BudgetwiseResult<()> {
    let categories = &ctx.resources.categories;

    match cmd {
        CategoryCommands::List { all } => {
            let list = if all {
                categories.list().await?
            } else {
                categories.list_active().await?
            };
            println!("{}", format_category_list(&list));
        }

        CategoryCommands::Create {
            name,
            income,
            color,
        } => {
            let mut input = CategoryInput::new(name, income);
            if let Some(color) = color {
                input.color = color;
            }

            let category = categories.create(&input).await?;
            println!("Created category: {}", category.name);
            println!("  Kind: {}", category.kind());
            println!("  ID:   {}", category.id);
        }

        CategoryCommands::Show { category } => {
            let category = categories.find(&category).await?;
            print!("{}", format_category_details(&category));
        }

        CategoryCommands::Edit {
            category,
            name,
            color,
            legacy,
            restore,
        } => {
            if name.is_none() && color.is_none() && !legacy && !restore {
                println!("No changes specified. Use --name, --color, --legacy, or --restore.");
                return Ok(());
            }

            let existing = categories.find(&category).await?;
            let mut input = CategoryInput::from(&existing);
            if let Some(name) = name {
                input.name = name.trim().to_string();
            }
            if let Some(color) = color {
                input.color = color;
            }
            if legacy {
                input.legacy = true;
            }
            if restore {
                input.legacy = false;
            }

            let updated = categories.update(existing.id, &input).await?;
            println!("Updated category: {}", updated.name);
        }

        CategoryCommands::Delete { category } => {
            let existing = categories.find(&category).await?;
            categories.delete(existing.id).await?;
            println!("Deleted category: {}", existing.name);
        }
    }

    Ok(())
}
