//! Configuration and session commands
//!
//! `config` shows or changes settings; `login`/`logout` store and clear the
//! token pair. Tokens are issued by the web app and pasted in here.

use chrono::Utc;
use clap::Subcommand;

use super::CliContext;
use crate::api::{AuthTokens, FileTokenStore, TokenStore};
use crate::config::{BudgetwisePaths, Settings, WeekStart};
use crate::error::{BudgetwiseError, BudgetwiseResult};

/// Config subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Set the API base URL
    #[command(name = "set-api")]
    SetApi {
        /// Base URL, e.g. https://budget.example.com/api
        url: String,
    },

    /// Set the first day of the week for weekly charts
    #[command(name = "set-week-start")]
    SetWeekStart {
        /// "monday" or "sunday"
        day: String,
    },

    /// Set how many months the budget projection covers
    #[command(name = "set-projection")]
    SetProjection {
        /// Number of months
        months: u32,
    },
}

/// Show the configuration, or apply one change to it
pub fn handle_config_command(
    paths: &BudgetwisePaths,
    settings: &mut Settings,
    cmd: Option<ConfigCommands>,
) -> BudgetwiseResult<()> {
    match cmd {
        None => {
            let tokens = FileTokenStore::new(paths).load()?;
            println!("budgetwise configuration");
            println!("========================");
            println!("Config directory: {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!();
            println!("Settings:");
            println!("  API base URL:      {}", settings.api_base_url);
            println!("  Request timeout:   {}s", settings.request_timeout_secs);
            println!("  Projection months: {}", settings.projection_months);
            println!("  Week starts on:    {:?}", settings.week_start);
            println!("  Currency symbol:   {}", settings.currency_symbol);
            println!();
            println!("Session: {}", describe_session(tokens.as_ref()));
        }

        Some(ConfigCommands::SetApi { url }) => {
            let mut updated = settings.clone();
            updated.api_base_url = url.trim().trim_end_matches('/').to_string();
            updated.validate()?;
            updated.save(paths)?;
            *settings = updated;
            println!("API base URL set to {}", settings.api_base_url);
        }

        Some(ConfigCommands::SetWeekStart { day }) => {
            settings.week_start = match day.trim().to_lowercase().as_str() {
                "monday" | "mon" => WeekStart::Monday,
                "sunday" | "sun" => WeekStart::Sunday,
                other => {
                    return Err(BudgetwiseError::Validation(format!(
                        "Week start must be monday or sunday, got '{}'",
                        other
                    )))
                }
            };
            settings.save(paths)?;
            println!("Weeks now start on {:?}", settings.week_start);
        }

        Some(ConfigCommands::SetProjection { months }) => {
            if months == 0 {
                return Err(BudgetwiseError::Validation(
                    "Projection must cover at least one month".into(),
                ));
            }
            settings.projection_months = months;
            settings.save(paths)?;
            println!("Projection now covers {} month(s)", months);
        }
    }

    Ok(())
}

fn describe_session(tokens: Option<&AuthTokens>) -> String {
    match tokens {
        None => "not logged in".to_string(),
        Some(tokens) => match tokens.access_expires_at() {
            Some(exp) if exp <= Utc::now() => {
                format!("access token expired {} (will refresh)", exp.format("%Y-%m-%d %H:%M UTC"))
            }
            Some(exp) => format!("logged in until {}", exp.format("%Y-%m-%d %H:%M UTC")),
            None => "logged in".to_string(),
        },
    }
}

/// Store a token pair
pub fn handle_login(paths: &BudgetwisePaths, access: &str, refresh: &str) -> BudgetwiseResult<()> {
    if access.trim().is_empty() || refresh.trim().is_empty() {
        return Err(BudgetwiseError::Validation(
            "Both --access and --refresh tokens are required".into(),
        ));
    }

    paths.ensure_directories()?;
    let tokens = AuthTokens::new(access.trim(), refresh.trim());
    if tokens.access_expired(Utc::now()) {
        println!("Note: the access token has already expired; it will be refreshed on first use.");
    }
    FileTokenStore::new(paths).save(&tokens)?;
    println!("Logged in. Tokens saved to {}", paths.tokens_file().display());
    Ok(())
}

/// Forget the stored token pair
pub fn handle_logout(paths: &BudgetwisePaths) -> BudgetwiseResult<()> {
    FileTokenStore::new(paths).clear()?;
    println!("Logged out.");
    Ok(())
}

/// Show the signed-in user's profile
pub async fn handle_whoami(ctx: &CliContext) -> BudgetwiseResult<()> {
    let user = ctx.resources.user.get().await?;
    println!("Hello, {}!", user.greeting_name());
    println!("  Email: {}", user.email);
    println!("  ID:    {}", user.id);
    Ok(())
}
