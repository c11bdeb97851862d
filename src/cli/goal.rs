//! Goal CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_goal_details, format_goal_table};
use crate::error::{FinanceError, FinanceResult};
use crate::services::{CreateGoalInput, GoalService, UpdateGoalInput};
use crate::storage::Storage;

use super::{parse_amount, parse_date, today};

/// Goal subcommands
#[derive(Subcommand)]
pub enum GoalCommands {
    /// Create a savings goal
    Add {
        /// Goal name
        name: String,
        /// Target amount
        target: String,
        /// Deadline (YYYY-MM-DD)
        #[arg(short, long)]
        deadline: String,
        /// Amount already saved
        #[arg(short, long)]
        saved: Option<String>,
    },

    /// List goals by deadline
    List,

    /// Show goal progress
    Show {
        /// Goal ID or name
        goal: String,
    },

    /// Edit a goal
    Edit {
        /// Goal ID or name
        goal: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New target amount
        #[arg(short, long)]
        target: Option<String>,
        /// Set the saved amount
        #[arg(short, long)]
        saved: Option<String>,
        /// New deadline (YYYY-MM-DD)
        #[arg(short, long)]
        deadline: Option<String>,
    },

    /// Add money to a goal
    Contribute {
        /// Goal ID or name
        goal: String,
        /// Amount to add
        amount: String,
    },

    /// Delete a goal
    Delete {
        /// Goal ID or name
        goal: String,
    },
}

/// Handle a goal command
pub fn handle_goal_command(
    storage: &Storage,
    settings: &Settings,
    cmd: GoalCommands,
) -> FinanceResult<()> {
    let service = GoalService::new(storage);

    match cmd {
        GoalCommands::Add {
            name,
            target,
            deadline,
            saved,
        } => {
            let goal = service.create(CreateGoalInput {
                name,
                target_amount: parse_amount("target", &target)?,
                current_amount: saved.map(|s| parse_amount("saved amount", &s)).transpose()?,
                deadline: parse_date(&deadline)?,
            })?;

            println!("Created goal: {}", goal.id);
            print!("{}", format_goal_details(&goal, today(), settings));
        }

        GoalCommands::List => {
            let goals = service.list()?;
            println!("{}", format_goal_table(&goals, today(), settings));
        }

        GoalCommands::Show { goal } => {
            let goal = service.resolve(&goal)?;
            print!("{}", format_goal_details(&goal, today(), settings));
        }

        GoalCommands::Edit {
            goal,
            name,
            target,
            saved,
            deadline,
        } => {
            let goal = service.resolve(&goal)?;

            let input = UpdateGoalInput {
                name,
                target_amount: target.map(|t| parse_amount("target", &t)).transpose()?,
                current_amount: saved.map(|s| parse_amount("saved amount", &s)).transpose()?,
                deadline: deadline.map(|d| parse_date(&d)).transpose()?,
            };

            if input.name.is_none()
                && input.target_amount.is_none()
                && input.current_amount.is_none()
                && input.deadline.is_none()
            {
                return Err(FinanceError::Validation(
                    "Nothing to change. Pass at least one of --name, --target, --saved, --deadline"
                        .into(),
                ));
            }

            let updated = service.update(goal.id, input)?;
            println!("Updated goal: {}", updated.id);
            print!("{}", format_goal_details(&updated, today(), settings));
        }

        GoalCommands::Contribute { goal, amount } => {
            let goal = service.resolve(&goal)?;
            let amount = parse_amount("amount", &amount)?;
            let updated = service.contribute(goal.id, amount)?;

            println!(
                "Added {} to {}",
                amount.format_with_symbol(&settings.currency_symbol),
                updated.name
            );
            print!("{}", format_goal_details(&updated, today(), settings));
            if updated.is_completed() {
                println!("Goal reached!");
            }
        }

        GoalCommands::Delete { goal } => {
            let goal = service.resolve(&goal)?;
            let deleted = service.delete(goal.id)?;
            println!("Deleted goal: {}", deleted.name);
        }
    }

    Ok(())
}
