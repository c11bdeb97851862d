//! Dashboard and report CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::error::FinanceResult;
use crate::reports::{AnalyticsReport, CategoryBreakdown, DashboardReport, TrendReport};
use crate::services::AlertService;
use crate::storage::Storage;

use super::today;

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Income and expenses for each of the last six months
    Trend,

    /// Expenses broken down by category
    Categories {
        /// Show only the largest N categories
        #[arg(short, long)]
        top: Option<usize>,
    },

    /// Totals, averages, savings rate, trend and category breakdown
    Analytics,
}

/// Show this month against last month, recent activity and active alerts
pub fn handle_dashboard_command(storage: &Storage, settings: &Settings) -> FinanceResult<()> {
    let report = DashboardReport::generate(storage, today(), settings.recent_transaction_count)?;
    print!("{}", report.format_terminal(&settings.currency_symbol));

    let alerts = AlertService::new(storage, settings.default_alerts).check_alerts(None)?;
    if !alerts.is_empty() {
        println!();
        println!("Budget alerts:");
        for alert in &alerts {
            println!("  {}", alert);
        }
    }

    Ok(())
}

/// Handle a report command
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> FinanceResult<()> {
    let symbol = &settings.currency_symbol;

    match cmd {
        ReportCommands::Trend => {
            let report = TrendReport::generate(storage, today())?;
            print!("{}", report.format_terminal(symbol));
        }

        ReportCommands::Categories { top } => {
            let mut report = CategoryBreakdown::generate(storage)?;
            if let Some(n) = top {
                report.rows.truncate(n);
            }
            print!("{}", report.format_terminal(symbol));
        }

        ReportCommands::Analytics => {
            let report = AnalyticsReport::generate(storage, today())?;
            print!("{}", report.format_terminal(symbol));
        }
    }

    Ok(())
}
