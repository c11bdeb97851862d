//! Budget alert CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_alert_settings, format_alert_table};
use crate::error::{FinanceError, FinanceResult};
use crate::models::AlertSettingsUpdate;
use crate::services::{AlertService, BudgetService};
use crate::storage::Storage;

use super::parse_month;

/// Alert subcommands
#[derive(Subcommand)]
pub enum AlertCommands {
    /// Evaluate every budget and list triggered alerts
    Check {
        /// Only count spending in this month (YYYY-MM or "current")
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Show the thresholds that apply to a budget
    Settings {
        /// Budget ID or category name
        budget: String,
    },

    /// Override a budget's thresholds; omitted values take the defaults
    Set {
        /// Budget ID or category name
        budget: String,
        /// Warning threshold in percent
        #[arg(short, long)]
        warning: Option<f64>,
        /// Error threshold in percent
        #[arg(short, long)]
        error: Option<f64>,
        /// Turn alerts for this budget on or off
        #[arg(long)]
        enabled: Option<bool>,
    },

    /// Drop a budget's override and use the defaults again
    Reset {
        /// Budget ID or category name
        budget: String,
    },
}

/// Handle an alert command
pub fn handle_alert_command(
    storage: &Storage,
    settings: &Settings,
    cmd: AlertCommands,
) -> FinanceResult<()> {
    let service = AlertService::new(storage, settings.default_alerts);
    let budgets = BudgetService::new(storage);

    match cmd {
        AlertCommands::Check { month } => {
            let alerts = service.check_alerts(parse_month(month.as_deref())?)?;
            println!("{}", format_alert_table(&alerts, settings));

            let errors = alerts.iter().filter(|a| a.is_error()).count();
            if !alerts.is_empty() {
                println!(
                    "{} alert(s): {} error(s), {} warning(s)",
                    alerts.len(),
                    errors,
                    alerts.len() - errors
                );
            }
        }

        AlertCommands::Settings { budget } => {
            let budget = budgets.resolve(&budget)?;
            let effective = service.get_settings(budget.id)?;
            let is_override = service.has_override(budget.id)?;
            print!(
                "{}",
                format_alert_settings(&budget.category, &effective, is_override)
            );
        }

        AlertCommands::Set {
            budget,
            warning,
            error,
            enabled,
        } => {
            let budget = budgets.resolve(&budget)?;
            let update = AlertSettingsUpdate {
                warning_threshold: warning,
                error_threshold: error,
                enabled,
            };
            if update.is_empty() {
                return Err(FinanceError::Validation(
                    "Nothing to change. Pass at least one of --warning, --error, --enabled".into(),
                ));
            }

            let effective = service.update_settings(budget.id, update)?;
            print!("{}", format_alert_settings(&budget.category, &effective, true));
        }

        AlertCommands::Reset { budget } => {
            let budget = budgets.resolve(&budget)?;
            if service.reset_settings(budget.id)? {
                println!("Alert settings for {} reset to defaults", budget.category);
            } else {
                println!("{} already uses the default alert settings", budget.category);
            }
        }
    }

    Ok(())
}
