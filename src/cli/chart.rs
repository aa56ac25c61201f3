//! Chart CLI commands
//!
//! Builds the chart data once per invocation and prints one view of it, or
//! writes it to CSV with `--csv`.

use std::fs::File;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use log::debug;

use super::budget::resolve_budget;
use super::{today, CliContext};
use crate::analytics::{CategoryLookup, ChartData};
use crate::display::{format_merged, format_savings, format_series};
use crate::error::{BudgetwiseError, BudgetwiseResult};
use crate::export::{export_merged_csv, export_savings_csv, export_series_csv};
use crate::models::{Budget, Granularity};

/// Options shared by every chart
#[derive(Args, Clone, Default)]
pub struct ChartOptions {
    /// Write the chart to a CSV file instead of printing it
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Budget to project (defaults to the budget covering today)
    #[arg(long)]
    pub budget: Option<String>,
}

/// Chart subcommands
#[derive(Subcommand)]
pub enum ChartCommands {
    /// Spending per category per month
    Monthly {
        /// Show income instead of spending
        #[arg(long)]
        income: bool,
        #[command(flatten)]
        options: ChartOptions,
    },

    /// Spending per category per week
    Weekly {
        #[command(flatten)]
        options: ChartOptions,
    },

    /// Expected spending per month from the budget
    Projection {
        #[command(flatten)]
        options: ChartOptions,
    },

    /// Running totals, actual then projected
    Cumulative {
        #[command(flatten)]
        options: ChartOptions,
    },

    /// Net savings per month
    Savings {
        #[command(flatten)]
        options: ChartOptions,
    },
}

impl ChartCommands {
    fn options(&self) -> &ChartOptions {
        match self {
            Self::Monthly { options, .. }
            | Self::Weekly { options }
            | Self::Projection { options }
            | Self::Cumulative { options }
            | Self::Savings { options } => options,
        }
    }
}

/// The projection chart has nothing to show without a budget, printed or exported
fn require_budget(cmd: &ChartCommands, budget: Option<&Budget>, today: NaiveDate) -> BudgetwiseResult<()> {
    match (cmd, budget) {
        (ChartCommands::Projection { .. }, None) => {
            Err(BudgetwiseError::budget_not_found(format!("covering {}", today)))
        }
        _ => Ok(()),
    }
}

/// Handle a chart command
pub async fn handle_chart_command(ctx: &CliContext, cmd: ChartCommands) -> BudgetwiseResult<()> {
    let options = cmd.options().clone();
    let today = today();

    let categories = ctx.resources.categories.list().await?;
    let groups = ctx.resources.groups.list().await?;
    let budget = match options.budget.as_deref() {
        Some(identifier) => Some(resolve_budget(ctx, Some(identifier)).await?),
        None => ctx.resources.budgets.active(today).await?,
    };
    if budget.is_none() {
        debug!("No budget covers {}, projection will be empty", today);
    }
    require_budget(&cmd, budget.as_ref(), today)?;

    let week_start = ctx.settings.week_start.weekday();
    let data = ChartData::build(
        &groups,
        &categories,
        budget.as_ref(),
        today,
        ctx.settings.projection_months,
        week_start,
    );
    let lookup = CategoryLookup::new(&categories);
    let symbol = ctx.symbol();
    let weekly = Granularity::weekly(week_start);

    let output = match (&cmd, &options.csv) {
        (ChartCommands::Monthly { income, .. }, None) => {
            let series = if *income {
                &data.monthly_income
            } else {
                &data.monthly_expenses
            };
            format_series(&series.points, Granularity::Monthly, &lookup, symbol)
        }
        (ChartCommands::Weekly { .. }, None) => {
            format_series(&data.weekly_expenses.points, weekly, &lookup, symbol)
        }
        (ChartCommands::Projection { .. }, None) => {
            format_series(&data.projection.points, Granularity::Monthly, &lookup, symbol)
        }
        (ChartCommands::Cumulative { .. }, None) => format_merged(&data.cumulative, weekly, &lookup, symbol),
        (ChartCommands::Savings { .. }, None) => format_savings(&data.savings, symbol),
        (cmd, Some(path)) => {
            let file = File::create(path)?;
            match cmd {
                ChartCommands::Monthly { income: true, .. } => {
                    export_series_csv(file, &data.monthly_income.points, &lookup)?
                }
                ChartCommands::Monthly { .. } => {
                    export_series_csv(file, &data.monthly_expenses.points, &lookup)?
                }
                ChartCommands::Weekly { .. } => {
                    export_series_csv(file, &data.weekly_expenses.points, &lookup)?
                }
                ChartCommands::Projection { .. } => {
                    export_series_csv(file, &data.projection.points, &lookup)?
                }
                ChartCommands::Cumulative { .. } => export_merged_csv(file, &data.cumulative, &lookup)?,
                ChartCommands::Savings { .. } => export_savings_csv(file, &data.savings)?,
            }
            format!("Chart written to {}", path.display())
        }
    };

    println!("{}", output);
    if matches!(cmd, ChartCommands::Savings { .. }) && options.csv.is_none() {
        if let Some(last) = data.savings.last() {
            println!("\nSaved overall: {}", last.cumulative.format_with_symbol(symbol));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 19).unwrap()
    }

    #[test]
    fn test_projection_needs_budget_for_csv_too() {
        let to_csv = ChartCommands::Projection {
            options: ChartOptions {
                csv: Some(PathBuf::from("projection.csv")),
                budget: None,
            },
        };
        let err = require_budget(&to_csv, None, today()).unwrap_err();
        assert!(err.is_not_found());

        let printed = ChartCommands::Projection {
            options: ChartOptions::default(),
        };
        assert!(require_budget(&printed, None, today()).is_err());

        let budget = Budget::new("October", today(), today());
        assert!(require_budget(&to_csv, Some(&budget), today()).is_ok());
    }

    #[test]
    fn test_other_charts_work_without_budget() {
        let weekly = ChartCommands::Weekly {
            options: ChartOptions::default(),
        };
        assert!(require_budget(&weekly, None, today()).is_ok());
    }
}
