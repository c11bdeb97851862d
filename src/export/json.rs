//! JSON Export functionality
//!
//! Exports every stored entity to JSON with schema versioning.

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FinanceError, FinanceResult};
use crate::models::{AlertSettings, Budget, BudgetId, Category, Goal, Transaction};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full database export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub categories: Vec<Category>,
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub goals: Vec<Goal>,

    /// Per-budget alert threshold overrides
    pub alert_overrides: Vec<AlertOverride>,

    pub metadata: ExportMetadata,
}

/// One budget's alert settings override
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertOverride {
    pub budget_id: BudgetId,
    #[serde(flatten)]
    pub settings: AlertSettings,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub transaction_count: usize,
    pub budget_count: usize,
    pub goal_count: usize,
    pub category_count: usize,

    /// Date range of transactions (earliest)
    pub earliest_transaction: Option<String>,

    /// Date range of transactions (latest)
    pub latest_transaction: Option<String>,
}

impl FullExport {
    /// Snapshot everything in storage
    pub fn from_storage(storage: &Storage) -> FinanceResult<Self> {
        let categories = storage.categories.get_all()?;
        let transactions = storage.transactions.get_all()?;
        let budgets = storage.budgets.get_all()?;
        let goals = storage.goals.get_all()?;

        let mut alert_overrides: Vec<AlertOverride> = storage
            .alert_settings
            .get_all()?
            .into_iter()
            .map(|(budget_id, settings)| AlertOverride {
                budget_id,
                settings,
            })
            .collect();
        alert_overrides.sort_by_key(|o| o.budget_id);

        let earliest_transaction = transactions
            .iter()
            .map(|t| t.date)
            .min()
            .map(|d| d.to_string());

        let latest_transaction = transactions
            .iter()
            .map(|t| t.date)
            .max()
            .map(|d| d.to_string());

        let metadata = ExportMetadata {
            transaction_count: transactions.len(),
            budget_count: budgets.len(),
            goal_count: goals.len(),
            category_count: categories.len(),
            earliest_transaction,
            latest_transaction,
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            categories,
            transactions,
            budgets,
            goals,
            alert_overrides,
            metadata,
        })
    }

    /// Check schema version and that references resolve
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let category_names: HashSet<String> = self
            .categories
            .iter()
            .map(|c| c.name.to_lowercase())
            .collect();

        for txn in &self.transactions {
            if !category_names.contains(&txn.category.to_lowercase()) {
                return Err(format!(
                    "Transaction {} references unknown category '{}'",
                    txn.id, txn.category
                ));
            }
        }

        for budget in &self.budgets {
            if !category_names.contains(&budget.category.to_lowercase()) {
                return Err(format!(
                    "Budget {} references unknown category '{}'",
                    budget.id, budget.category
                ));
            }
        }

        let budget_ids: HashSet<BudgetId> = self.budgets.iter().map(|b| b.id).collect();
        for o in &self.alert_overrides {
            if !budget_ids.contains(&o.budget_id) {
                return Err(format!(
                    "Alert settings reference unknown budget {}",
                    o.budget_id
                ));
            }
        }

        Ok(())
    }
}

/// Export the full database to JSON
pub fn export_full_json<W: Write>(storage: &Storage, writer: &mut W, pretty: bool) -> FinanceResult<()> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| FinanceError::Export(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FintrackPaths;
    use crate::models::{Money, TransactionKind};
    use crate::storage::initialize_storage;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        initialize_storage(&paths).unwrap();
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    fn seed(storage: &Storage) -> Budget {
        for day in [3, 20] {
            storage
                .transactions
                .upsert(Transaction::new(
                    TransactionKind::Expense,
                    Money::from_cents(1_000),
                    "Food",
                    "Lunch",
                    NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
                ))
                .unwrap();
        }
        let budget = Budget::new("Food", Money::from_cents(20_000), "January 2025");
        storage.budgets.upsert(budget.clone()).unwrap();
        storage
            .alert_settings
            .set(budget.id, AlertSettings::default())
            .unwrap();
        budget
    }

    #[test]
    fn test_full_export() {
        let (_temp_dir, storage) = create_test_storage();
        let budget = seed(&storage);

        let export = FullExport::from_storage(&storage).unwrap();

        assert_eq!(export.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(export.categories.len(), 10);
        assert_eq!(export.metadata.transaction_count, 2);
        assert_eq!(export.metadata.budget_count, 1);
        assert_eq!(export.metadata.earliest_transaction.as_deref(), Some("2025-01-03"));
        assert_eq!(export.metadata.latest_transaction.as_deref(), Some("2025-01-20"));
        assert_eq!(export.alert_overrides[0].budget_id, budget.id);
        assert!(export.validate().is_ok());
    }

    #[test]
    fn test_json_output_parses_back() {
        let (_temp_dir, storage) = create_test_storage();
        seed(&storage);

        let mut output = Vec::new();
        export_full_json(&storage, &mut output, true).unwrap();

        let parsed: FullExport = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed.transactions.len(), 2);
        assert_eq!(parsed.budgets[0].category, "Food");
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_validate_catches_dangling_category() {
        let (_temp_dir, storage) = create_test_storage();
        seed(&storage);

        let mut export = FullExport::from_storage(&storage).unwrap();
        export.categories.retain(|c| c.name != "Food");
        assert!(export.validate().unwrap_err().contains("unknown category"));

        export.schema_version = "0.1.0".into();
        assert!(export.validate().unwrap_err().contains("Schema version"));
    }
}
