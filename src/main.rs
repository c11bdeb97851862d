use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use fintrack::cli::{
    handle_alert_command, handle_budget_command, handle_category_command, handle_config_command,
    handle_dashboard_command, handle_export_command, handle_goal_command, handle_import_command,
    handle_report_command, handle_transaction_command, ConfigCommands,
};
use fintrack::config::{FintrackPaths, Settings};
use fintrack::logging::init_logging;
use fintrack::services::ImportTable;
use fintrack::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "fintrack",
    version,
    about = "Personal finance tracking from the terminal",
    long_about = "fintrack records income and expenses, tracks monthly category budgets \
                  with threshold alerts, follows savings goals and produces period \
                  reports and exports."
)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and seed default categories
    Init,

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// This month at a glance
    #[command(alias = "dash")]
    Dashboard,

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(fintrack::cli::TransactionCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(fintrack::cli::BudgetCommands),

    /// Savings goal commands
    #[command(subcommand)]
    Goal(fintrack::cli::GoalCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(fintrack::cli::CategoryCommands),

    /// Budget alert commands
    #[command(subcommand, alias = "alert")]
    Alerts(fintrack::cli::AlertCommands),

    /// Reports and analytics
    #[command(subcommand)]
    Report(fintrack::cli::ReportCommands),

    /// Export data
    #[command(subcommand)]
    Export(fintrack::cli::ExportCommands),

    /// Import records from a hosted-table JSON response
    Import {
        /// Table to import into (transactions, budgets, goals, categories)
        table: ImportTable,

        /// Path to the JSON file
        file: PathBuf,
    },

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let paths = FintrackPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    debug!(base = %paths.base_dir().display(), "resolved data location");

    let Some(command) = cli.command else {
        println!("fintrack - personal finance tracking");
        println!();
        println!("Run 'fintrack init' to set up a data directory.");
        println!("Run 'fintrack --help' for usage information.");
        return Ok(());
    };

    match command {
        Commands::Init => {
            println!("Initializing fintrack at: {}", paths.base_dir().display());
            let seeded = initialize_storage(&paths)?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            if seeded > 0 {
                println!("Created {} default categories.", seeded);
                println!("Run 'fintrack category list' to see them.");
            }
        }
        Commands::Config { command } => {
            let cmd = command.unwrap_or(ConfigCommands::Show);
            handle_config_command(&paths, &mut settings, cmd)?;
        }
        Commands::Dashboard => handle_dashboard_command(&open_storage(&paths)?, &settings)?,
        Commands::Transaction(cmd) => {
            handle_transaction_command(&open_storage(&paths)?, &settings, cmd)?
        }
        Commands::Budget(cmd) => handle_budget_command(&open_storage(&paths)?, &settings, cmd)?,
        Commands::Goal(cmd) => handle_goal_command(&open_storage(&paths)?, &settings, cmd)?,
        Commands::Category(cmd) => handle_category_command(&open_storage(&paths)?, cmd)?,
        Commands::Alerts(cmd) => handle_alert_command(&open_storage(&paths)?, &settings, cmd)?,
        Commands::Report(cmd) => handle_report_command(&open_storage(&paths)?, &settings, cmd)?,
        Commands::Export(cmd) => handle_export_command(&open_storage(&paths)?, &settings, cmd)?,
        Commands::Import { table, file } => {
            handle_import_command(&open_storage(&paths)?, table, &file)?
        }
        Commands::Audit { limit } => {
            let storage = open_storage(&paths)?;
            let entries = storage.audit().read_recent(limit)?;
            if entries.is_empty() {
                println!("No audit entries yet.");
            }
            for entry in entries.iter().rev() {
                println!("{}", entry.format_human_readable());
            }
        }
    }

    Ok(())
}

fn open_storage(paths: &FintrackPaths) -> Result<Storage> {
    if !paths.is_initialized() {
        debug!("data directory not initialized, starting empty");
    }
    Ok(Storage::open(paths.clone())?)
}
