use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;

use budgetwise::cli::{
    handle_ai_command, handle_bank_command, handle_budget_command, handle_category_command,
    handle_chart_command, handle_config_command, handle_group_command, handle_login,
    handle_logout, handle_whoami, CliContext,
};
use budgetwise::config::{BudgetwisePaths, Settings};
use budgetwise::BudgetwiseError;

#[derive(Parser)]
#[command(
    name = "budgetwise",
    version,
    about = "Personal budgeting client with spending, savings and projection charts",
    long_about = "budgetwise talks to your budgeting service: manage categories, budgets \
                  and transactions, chart spending and savings against your budget, \
                  import from your bank and let the assistant draft a budget."
)]
struct Cli {
    /// Print debug logs (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or change configuration
    Config {
        #[command(subcommand)]
        command: Option<budgetwise::cli::ConfigCommands>,
    },

    /// Store the token pair issued by the web app
    Login {
        /// Access token
        #[arg(long, env = "BUDGETWISE_ACCESS_TOKEN", hide_env_values = true)]
        access: String,
        /// Refresh token
        #[arg(long, env = "BUDGETWISE_REFRESH_TOKEN", hide_env_values = true)]
        refresh: String,
    },

    /// Forget the stored tokens
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Category management commands
    #[command(subcommand)]
    Category(budgetwise::cli::CategoryCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(budgetwise::cli::BudgetCommands),

    /// Transaction group commands
    #[command(subcommand, alias = "txn")]
    Group(budgetwise::cli::GroupCommands),

    /// Spending, projection and savings charts
    #[command(subcommand)]
    Chart(budgetwise::cli::ChartCommands),

    /// Bank linking and sync
    #[command(subcommand)]
    Bank(budgetwise::cli::BankCommands),

    /// AI assistant
    #[command(subcommand)]
    Ai(budgetwise::cli::AiCommands),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli).await {
        let message = match err.downcast_ref::<BudgetwiseError>() {
            Some(e) => e.toast(),
            None => err.to_string(),
        };
        eprintln!("Error: {}", message);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    match std::env::var("RUST_LOG") {
        Ok(filters) if !verbose => {
            builder.parse_filters(&filters);
        }
        _ => {
            builder.filter_level(if verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Warn
            });
        }
    }
    let _ = builder.try_init();
}

async fn run(cli: Cli) -> Result<()> {
    // Initialize paths and settings
    let paths = BudgetwisePaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    let command = match cli.command {
        Some(command) => command,
        None => {
            println!("budgetwise - personal budgeting from the terminal");
            println!();
            println!("Run 'budgetwise --help' for usage information.");
            println!("Run 'budgetwise login --access <token> --refresh <token>' to get started.");
            return Ok(());
        }
    };

    let command = match command {
        Commands::Config { command } => {
            handle_config_command(&paths, &mut settings, command)?;
            return Ok(());
        }
        Commands::Login { access, refresh } => {
            handle_login(&paths, &access, &refresh)?;
            return Ok(());
        }
        Commands::Logout => {
            handle_logout(&paths)?;
            return Ok(());
        }
        other => other,
    };

    // Everything below talks to the API
    let ctx = CliContext::from_config(paths, settings)?;
    match command {
        Commands::Whoami => handle_whoami(&ctx).await?,
        Commands::Category(cmd) => handle_category_command(&ctx, cmd).await?,
        Commands::Budget(cmd) => handle_budget_command(&ctx, cmd).await?,
        Commands::Group(cmd) => handle_group_command(&ctx, cmd).await?,
        Commands::Chart(cmd) => handle_chart_command(&ctx, cmd).await?,
        Commands::Bank(cmd) => handle_bank_command(&ctx, cmd).await?,
        Commands::Ai(cmd) => handle_ai_command(&ctx, cmd).await?,
        Commands::Config { .. } | Commands::Login { .. } | Commands::Logout => {}
    }

    Ok(())
}
