//! Budget CLI commands
//!
//! Implements CLI commands for budget management. Spending shown next to a
//! budget is derived from transactions; `--month` restricts it to one month.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_budget_details, format_budget_overview};
use crate::error::{FinanceError, FinanceResult};
use crate::services::{AlertService, BudgetService, CreateBudgetInput, UpdateBudgetInput};
use crate::storage::Storage;

use super::{parse_amount, parse_month};

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Create a monthly budget for an expense category
    Add {
        /// Expense category name
        category: String,
        /// Monthly limit (e.g., "400")
        limit: String,
        /// Period label, defaults to the current month (e.g., "October 2026")
        #[arg(short, long)]
        period: Option<String>,
    },

    /// List budgets with spending
    List {
        /// Only count spending in this month (YYYY-MM or "current")
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Show one budget
    Show {
        /// Budget ID or category name
        budget: String,
        /// Only count spending in this month (YYYY-MM or "current")
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Edit a budget
    Edit {
        /// Budget ID or category name
        budget: String,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
        /// New monthly limit
        #[arg(short, long)]
        limit: Option<String>,
        /// New period label
        #[arg(short, long)]
        period: Option<String>,
    },

    /// Delete a budget and its alert settings
    Delete {
        /// Budget ID or category name
        budget: String,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
) -> FinanceResult<()> {
    let service = BudgetService::new(storage);

    match cmd {
        BudgetCommands::Add {
            category,
            limit,
            period,
        } => {
            let budget = service.create(CreateBudgetInput {
                category,
                monthly_limit: parse_amount("limit", &limit)?,
                period,
            })?;

            println!("Created budget: {}", budget.id);
            println!("  Category: {}", budget.category);
            println!(
                "  Limit:    {} / month",
                budget.monthly_limit.format_with_symbol(&settings.currency_symbol)
            );
            println!("  Period:   {}", budget.period);
        }

        BudgetCommands::List { month } => {
            let overview = service.overview(parse_month(month.as_deref())?)?;
            println!("{}", format_budget_overview(&overview, settings));
        }

        BudgetCommands::Show { budget, month } => {
            let budget = service.resolve(&budget)?;
            let summary = service.summary(&budget, parse_month(month.as_deref())?)?;
            let alerts = AlertService::new(storage, settings.default_alerts).get_settings(budget.id)?;
            print!("{}", format_budget_details(&summary, &alerts, settings));
        }

        BudgetCommands::Edit {
            budget,
            category,
            limit,
            period,
        } => {
            let budget = service.resolve(&budget)?;

            if category.is_none() && limit.is_none() && period.is_none() {
                return Err(FinanceError::Validation(
                    "Nothing to change. Pass at least one of --category, --limit, --period".into(),
                ));
            }

            let input = UpdateBudgetInput {
                category,
                monthly_limit: limit.map(|l| parse_amount("limit", &l)).transpose()?,
                period,
            };

            let updated = service.update(budget.id, input)?;
            println!("Updated budget: {}", updated);
        }

        BudgetCommands::Delete { budget } => {
            let budget = service.resolve(&budget)?;
            let deleted = service.delete(budget.id)?;
            println!("Deleted budget: {} ({})", deleted.category, deleted.period);
        }
    }

    Ok(())
}
