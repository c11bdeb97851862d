//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod alert;
pub mod budget;
pub mod category;
pub mod config;
pub mod export;
pub mod goal;
pub mod import;
pub mod report;
pub mod transaction;

pub use alert::{handle_alert_command, AlertCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use config::{handle_config_command, ConfigCommands};
pub use export::{handle_export_command, ExportCommands};
pub use goal::{handle_goal_command, GoalCommands};
pub use import::handle_import_command;
pub use report::{handle_dashboard_command, handle_report_command, ReportCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::{Datelike, NaiveDate};

use crate::error::{FinanceError, FinanceResult};
use crate::models::{Money, MonthRange};

/// Parse a user-entered amount such as `50`, `1,200.50` or `$19.99`
pub(crate) fn parse_amount(field: &str, value: &str) -> FinanceResult<Money> {
    Money::parse(value).map_err(|e| {
        FinanceError::Validation(format!("Invalid {}: '{}'. {}", field, value, e))
    })
}

/// Parse a `YYYY-MM-DD` date
pub(crate) fn parse_date(value: &str) -> FinanceResult<NaiveDate> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        FinanceError::Validation(format!("Invalid date format: '{}'. Use YYYY-MM-DD", value))
    })?;

    if !MonthRange::is_supported_year(date.year()) {
        return Err(FinanceError::Validation(format!(
            "Date out of range: '{}'. Years {}-{} are supported",
            value,
            MonthRange::MIN_YEAR,
            MonthRange::MAX_YEAR
        )));
    }

    Ok(date)
}

/// Parse an optional `--month` argument (`YYYY-MM`, or `current`)
pub(crate) fn parse_month(value: Option<&str>) -> FinanceResult<Option<MonthRange>> {
    match value.map(str::trim) {
        None => Ok(None),
        Some("current") => Ok(Some(MonthRange::current())),
        Some(s) => MonthRange::parse(s)
            .map(Some)
            .map_err(|e| FinanceError::Validation(e.to_string())),
    }
}

/// Today's date in local time
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
