//! Configuration CLI commands

use clap::Subcommand;
use tracing::info;

use crate::config::{FintrackPaths, Settings};
use crate::error::{FinanceError, FinanceResult};
use crate::models::AlertSettingsUpdate;

/// Config subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show paths and current settings
    Show,

    /// Change the default alert thresholds used by budgets without overrides
    SetAlerts {
        /// Warning threshold (percent of limit)
        #[arg(short, long)]
        warning: Option<f64>,

        /// Error threshold (percent of limit)
        #[arg(short, long)]
        error: Option<f64>,

        /// Enable or disable alerts by default
        #[arg(long)]
        enabled: Option<bool>,
    },

    /// Set the currency symbol used in output
    SetCurrency {
        /// Symbol, e.g. "$" or "€"
        symbol: String,
    },
}

/// Handle a config command
pub fn handle_config_command(
    paths: &FintrackPaths,
    settings: &mut Settings,
    cmd: ConfigCommands,
) -> FinanceResult<()> {
    match cmd {
        ConfigCommands::Show => {
            println!("fintrack Configuration");
            println!("======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!(
                "Initialized:      {}",
                if paths.is_initialized() { "yes" } else { "no (run 'fintrack init')" }
            );
            println!();
            println!("Settings:");
            println!("  Currency symbol:  {}", settings.currency_symbol);
            println!("  Date format:      {}", settings.date_format);
            println!("  Default alerts:   {}", settings.default_alerts);
            println!("  Recent on dashboard: {}", settings.recent_transaction_count);
        }

        ConfigCommands::SetAlerts {
            warning,
            error,
            enabled,
        } => {
            let update = AlertSettingsUpdate {
                warning_threshold: warning,
                error_threshold: error,
                enabled,
            };
            if update.is_empty() {
                println!("No changes specified.");
                return Ok(());
            }

            let merged = update.apply_to(&settings.default_alerts);
            merged
                .validate()
                .map_err(|e| FinanceError::Validation(e.to_string()))?;

            settings.default_alerts = merged;
            settings.save(paths)?;
            info!(settings = %merged, "default alert settings updated");

            println!("Default alerts: {}", merged);
        }

        ConfigCommands::SetCurrency { symbol } => {
            let symbol = symbol.trim();
            if symbol.is_empty() {
                return Err(FinanceError::Validation(
                    "Currency symbol cannot be empty".into(),
                ));
            }

            settings.currency_symbol = symbol.to_string();
            settings.save(paths)?;

            println!("Currency symbol set to: {}", symbol);
        }
    }

    Ok(())
}
