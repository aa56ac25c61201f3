//! CLI command handlers
//!
//! This module contains the implementation of CLI commands, bridging the clap
//! argument parsing with the resources, analytics and integrations layers.

pub mod ai;
pub mod bank;
pub mod budget;
pub mod category;
pub mod chart;
pub mod session;
pub mod transaction;

pub use ai::{handle_ai_command, AiCommands};
pub use bank::{handle_bank_command, BankCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use chart::{handle_chart_command, ChartCommands};
pub use session::{handle_config_command, handle_login, handle_logout, handle_whoami, ConfigCommands};
pub use transaction::{handle_group_command, GroupCommands};

use chrono::{Local, NaiveDate};

use crate::api::ApiClient;
use crate::config::{BudgetwisePaths, Settings};
use crate::error::{BudgetwiseError, BudgetwiseResult};
use crate::models::Money;
use crate::resources::Resources;

/// Everything a command handler needs
pub struct CliContext {
    pub paths: BudgetwisePaths,
    pub settings: Settings,
    pub api: ApiClient,
    pub resources: Resources,
}

impl CliContext {
    pub fn new(paths: BudgetwisePaths, settings: Settings, api: ApiClient) -> Self {
        Self {
            resources: Resources::new(api.clone()),
            paths,
            settings,
            api,
        }
    }

    /// Context wired to the configured API and on-disk tokens
    pub fn from_config(paths: BudgetwisePaths, settings: Settings) -> BudgetwiseResult<Self> {
        let api = ApiClient::from_settings(&settings, &paths)?;
        Ok(Self::new(paths, settings, api))
    }

    pub fn symbol(&self) -> &str {
        &self.settings.currency_symbol
    }
}

/// Today's date in the local timezone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a `YYYY-MM-DD` argument
pub fn parse_date(value: &str) -> BudgetwiseResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        BudgetwiseError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", value))
    })
}

/// Parse an optional date argument, defaulting to today
pub fn parse_date_or_today(value: Option<&str>) -> BudgetwiseResult<NaiveDate> {
    value.map(parse_date).transpose().map(|d| d.unwrap_or_else(today))
}

/// Parse an amount argument such as `12.50`
pub fn parse_amount(value: &str) -> BudgetwiseResult<Money> {
    Money::parse(value).map_err(|e| BudgetwiseError::Validation(e.to_string()))
}
