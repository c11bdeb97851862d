//! Transaction CLI commands
//!
//! Implements CLI commands for transaction management.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_transaction_details, format_transaction_table};
use crate::error::{FinanceError, FinanceResult};
use crate::models::TransactionKind;
use crate::services::{
    CreateTransactionInput, TransactionFilter, TransactionService, UpdateTransactionInput,
};
use crate::storage::Storage;

use super::{parse_amount, parse_date, parse_month, today};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record income or an expense
    Add {
        /// income or expense
        kind: TransactionKind,
        /// Amount (e.g., "50" or "1,200.50")
        amount: String,
        /// Category name
        #[arg(short, long)]
        category: String,
        /// What the money was for
        #[arg(short = 'm', long)]
        description: String,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List transactions, newest first
    List {
        /// Only income or only expenses
        #[arg(short, long)]
        kind: Option<TransactionKind>,
        /// Filter by category name
        #[arg(short = 'C', long)]
        category: Option<String>,
        /// Search descriptions
        #[arg(short, long)]
        search: Option<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Only one month (YYYY-MM or "current")
        #[arg(long, conflicts_with_all = ["from", "to"])]
        month: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Show transaction details
    Show {
        /// Transaction ID
        id: String,
    },
    /// Edit a transaction
    Edit {
        /// Transaction ID
        id: String,
        /// New kind
        #[arg(short, long)]
        kind: Option<TransactionKind>,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
        /// New description
        #[arg(short = 'm', long)]
        description: Option<String>,
        /// New date
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> FinanceResult<()> {
    let service = TransactionService::new(storage);

    match cmd {
        TransactionCommands::Add {
            kind,
            amount,
            category,
            description,
            date,
        } => {
            let input = CreateTransactionInput {
                kind,
                amount: parse_amount("amount", &amount)?,
                category,
                description,
                date: match date {
                    Some(d) => parse_date(&d)?,
                    None => today(),
                },
            };

            let txn = service.create(input)?;

            println!("Created transaction:");
            println!("  ID:       {}", txn.id);
            println!("  Date:     {}", txn.date.format(&settings.date_format));
            println!("  Type:     {}", txn.kind);
            println!(
                "  Amount:   {}",
                txn.amount.format_with_symbol(&settings.currency_symbol)
            );
            println!("  Category: {}", txn.category);
        }

        TransactionCommands::List {
            kind,
            category,
            search,
            from,
            to,
            month,
            limit,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);
            filter.kind = kind;
            filter.category = category;
            filter.search = search;

            if let Some(window) = parse_month(month.as_deref())? {
                filter = filter.date_range(window.start(), window.end());
            }
            if let Some(from) = from {
                filter.start_date = Some(parse_date(&from)?);
            }
            if let Some(to) = to {
                filter.end_date = Some(parse_date(&to)?);
            }

            let transactions = service.list(&filter)?;
            println!("{}", format_transaction_table(&transactions, settings));
            if !transactions.is_empty() {
                println!("{} transaction(s)", transactions.len());
            }
        }

        TransactionCommands::Show { id } => {
            let txn = service.resolve(&id)?;
            print!("{}", format_transaction_details(&txn, settings));
        }

        TransactionCommands::Edit {
            id,
            kind,
            amount,
            category,
            description,
            date,
        } => {
            let txn = service.resolve(&id)?;

            let input = UpdateTransactionInput {
                kind,
                amount: amount.map(|a| parse_amount("amount", &a)).transpose()?,
                category,
                description,
                date: date.map(|d| parse_date(&d)).transpose()?,
            };

            if input.is_empty() {
                return Err(FinanceError::Validation(
                    "Nothing to change. Pass at least one of --kind, --amount, --category, --description, --date".into(),
                ));
            }

            let updated = service.update(txn.id, input)?;
            println!("Updated transaction: {}", updated.id);
            print!("{}", format_transaction_details(&updated, settings));
        }

        TransactionCommands::Delete { id } => {
            let txn = service.resolve(&id)?;
            let deleted = service.delete(txn.id)?;
            println!("Deleted transaction: {} ({})", deleted.id, deleted.description);
        }
    }

    Ok(())
}
