//! Storage layer for fintrack
//!
//! Each entity lives in its own JSON file under the data directory. The
//! repositories keep the records in memory behind `RwLock`s and write the
//! whole file back atomically on save. Every mutation is also recorded in
//! the audit log through [`Storage::log_create`] and friends.

pub mod alert_settings;
pub mod budget;
pub mod categories;
pub mod file_io;
pub mod goals;
pub mod init;
pub mod transactions;

pub use alert_settings::AlertSettingsRepository;
pub use budget::BudgetRepository;
pub use categories::CategoryRepository;
pub use file_io::{read_json, read_json_required, write_json_atomic};
pub use goals::GoalRepository;
pub use init::initialize_storage;
pub use transactions::TransactionRepository;

use serde::Serialize;
use tracing::debug;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::FintrackPaths;
use crate::error::FinanceResult;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: FintrackPaths,
    audit: AuditLogger,
    pub transactions: TransactionRepository,
    pub budgets: BudgetRepository,
    pub goals: GoalRepository,
    pub categories: CategoryRepository,
    pub alert_settings: AlertSettingsRepository,
}

impl Storage {
    /// Create a storage instance (nothing is read yet)
    pub fn new(paths: FintrackPaths) -> FinanceResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            audit: AuditLogger::new(paths.audit_log()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            budgets: BudgetRepository::new(paths.budgets_file()),
            goals: GoalRepository::new(paths.goals_file()),
            categories: CategoryRepository::new(paths.categories_file()),
            alert_settings: AlertSettingsRepository::new(paths.alert_settings_file()),
            paths,
        })
    }

    /// Create a storage instance and load everything from disk
    pub fn open(paths: FintrackPaths) -> FinanceResult<Self> {
        let storage = Self::new(paths)?;
        storage.load_all()?;
        Ok(storage)
    }

    pub fn paths(&self) -> &FintrackPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&self) -> FinanceResult<()> {
        self.transactions.load()?;
        self.budgets.load()?;
        self.goals.load()?;
        self.categories.load()?;
        self.alert_settings.load()?;
        debug!(base = %self.paths.base_dir().display(), "storage loaded");
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> FinanceResult<()> {
        self.transactions.save()?;
        self.budgets.save()?;
        self.goals.save()?;
        self.categories.save()?;
        self.alert_settings.save()?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// Record a create in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        record: &T,
    ) -> FinanceResult<()> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, record))
    }

    /// Record an update in the audit log
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> FinanceResult<()> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
        ))
    }

    /// Record a delete in the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        record: &T,
    ) -> FinanceResult<()> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, record))
    }

    /// Record several entries at once (bulk imports)
    pub fn log_batch(&self, entries: &[AuditEntry]) -> FinanceResult<()> {
        self.audit.log_batch(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::models::{Category, TransactionKind};
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
        assert_eq!(storage.transactions.count().unwrap(), 0);
    }

    #[test]
    fn test_save_all_and_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths.clone()).unwrap();

        storage
            .categories
            .upsert(Category::new("Pets", TransactionKind::Expense))
            .unwrap();
        storage.save_all().unwrap();

        let reopened = Storage::open(paths).unwrap();
        assert!(reopened.categories.get_by_name("pets").unwrap().is_some());
    }

    #[test]
    fn test_log_helpers_write_audit_entries() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        let mut category = Category::new("Pets", TransactionKind::Expense);

        storage
            .log_create(EntityType::Category, category.id.to_string(), None, &category)
            .unwrap();
        let before = category.clone();
        category.name = "Animals".into();
        storage
            .log_update(EntityType::Category, category.id.to_string(), None, &before, &category)
            .unwrap();

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].operation, Operation::Update);
        assert_eq!(
            entries[1].diff_summary.as_deref(),
            Some("name: \"Pets\" -> \"Animals\"")
        );
    }
}
