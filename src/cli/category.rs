//! Category CLI commands

use clap::Subcommand;

use crate::display::format_category_table;
use crate::error::{FinanceError, FinanceResult};
use crate::models::TransactionKind;
use crate::services::{CategoryService, CreateCategoryInput, UpdateCategoryInput};
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List categories
    List {
        /// Only income or only expense categories
        #[arg(short, long)]
        kind: Option<TransactionKind>,
    },

    /// Create a category
    Add {
        /// Category name
        name: String,
        /// income or expense
        kind: TransactionKind,
        /// Icon name
        #[arg(short, long)]
        icon: Option<String>,
        /// Hex color (e.g., "#f59e0b")
        #[arg(short, long)]
        color: Option<String>,
    },

    /// Edit a category; a rename is applied to its transactions and budgets
    Edit {
        /// Category name or ID
        category: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New kind
        #[arg(short, long)]
        kind: Option<TransactionKind>,
        /// New icon
        #[arg(short, long)]
        icon: Option<String>,
        /// New color
        #[arg(short, long)]
        color: Option<String>,
    },

    /// Delete an unused category
    Delete {
        /// Category name or ID
        category: String,
    },
}

/// Handle a category command
pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> FinanceResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List { kind } => {
            let categories = service.list(kind)?;
            println!("{}", format_category_table(&categories));
        }

        CategoryCommands::Add {
            name,
            kind,
            icon,
            color,
        } => {
            let category = service.create(CreateCategoryInput {
                name,
                kind,
                icon,
                color,
            })?;

            println!("Created category: {}", category.name);
            println!("  Type: {}", category.kind);
            println!("  ID:   {}", category.id);
        }

        CategoryCommands::Edit {
            category,
            name,
            kind,
            icon,
            color,
        } => {
            let category = service.resolve(&category)?;

            let input = UpdateCategoryInput {
                name,
                kind,
                icon,
                color,
            };
            if input.name.is_none()
                && input.kind.is_none()
                && input.icon.is_none()
                && input.color.is_none()
            {
                return Err(FinanceError::Validation(
                    "Nothing to change. Pass at least one of --name, --kind, --icon, --color"
                        .into(),
                ));
            }

            let updated = service.update(category.id, input)?;
            println!("Updated category: {} ({})", updated.name, updated.kind);
        }

        CategoryCommands::Delete { category } => {
            let category = service.resolve(&category)?;
            let deleted = service.delete(category.id)?;
            println!("Deleted category: {}", deleted.name);
        }
    }

    Ok(())
}
