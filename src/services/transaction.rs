//! Transaction service
//!
//! Provides business logic for transaction management: validated CRUD,
//! category resolution and filtered listing.

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use crate::audit::EntityType;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{Money, Transaction, TransactionId, TransactionKind};
use crate::storage::Storage;

use super::category::CategoryService;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Only income or only expenses
    pub kind: Option<TransactionKind>,
    /// Category name (case-insensitive)
    pub category: Option<String>,
    /// Case-insensitive substring of the description
    pub search: Option<String>,
    /// Earliest date, inclusive
    pub start_date: Option<NaiveDate>,
    /// Latest date, inclusive
    pub end_date: Option<NaiveDate>,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether a transaction passes every criterion except the limit
    pub fn matches(&self, txn: &Transaction) -> bool {
        if self.kind.is_some_and(|kind| txn.kind != kind) {
            return false;
        }
        if let Some(category) = &self.category {
            if !txn.category.eq_ignore_ascii_case(category.trim()) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.trim().to_lowercase();
            if !needle.is_empty() && !txn.description.to_lowercase().contains(&needle) {
                return false;
            }
        }
        if self.start_date.is_some_and(|start| txn.date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| txn.date > end) {
            return false;
        }
        true
    }
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub kind: TransactionKind,
    pub amount: Money,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
}

/// Per-field changes to a transaction; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    pub kind: Option<TransactionKind>,
    pub amount: Option<Money>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}

impl UpdateTransactionInput {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.date.is_none()
    }
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new transaction
    pub fn create(&self, input: CreateTransactionInput) -> FinanceResult<Transaction> {
        let mut txn = Transaction::new(
            input.kind,
            input.amount,
            input.category.trim(),
            input.description.trim(),
            input.date,
        );

        txn.validate()
            .map_err(|e| FinanceError::Validation(e.to_string()))?;

        let category = CategoryService::new(self.storage).resolve_for_kind(&txn.category, txn.kind)?;
        txn.category = category.name;

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.description.clone()),
            &txn,
        )?;
        info!(id = %txn.id, kind = %txn.kind, amount = %txn.amount, "created transaction");

        Ok(txn)
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> FinanceResult<Transaction> {
        self.storage
            .transactions
            .get(id)?
            .ok_or_else(|| FinanceError::transaction_not_found(id.to_string()))
    }

    /// Find a transaction by full or short ID
    pub fn find(&self, identifier: &str) -> FinanceResult<Option<Transaction>> {
        self.storage.transactions.find(identifier)
    }

    /// Find a transaction by full or short ID, failing when it does not exist
    pub fn resolve(&self, identifier: &str) -> FinanceResult<Transaction> {
        self.find(identifier)?
            .ok_or_else(|| FinanceError::transaction_not_found(identifier))
    }

    /// List transactions matching a filter, newest first
    pub fn list(&self, filter: &TransactionFilter) -> FinanceResult<Vec<Transaction>> {
        let mut transactions = match &filter.category {
            Some(category) => self.storage.transactions.get_by_category(category)?,
            None => self.storage.transactions.get_all()?,
        };

        transactions.retain(|t| filter.matches(t));

        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }

        debug!(count = transactions.len(), "listed transactions");
        Ok(transactions)
    }

    /// Update a transaction
    pub fn update(
        &self,
        id: TransactionId,
        input: UpdateTransactionInput,
    ) -> FinanceResult<Transaction> {
        let mut txn = self.get(id)?;
        let before = txn.clone();

        if let Some(kind) = input.kind {
            txn.kind = kind;
        }
        if let Some(amount) = input.amount {
            txn.amount = amount;
        }
        if let Some(category) = input.category {
            txn.category = category.trim().to_string();
        }
        if let Some(description) = input.description {
            txn.description = description.trim().to_string();
        }
        if let Some(date) = input.date {
            txn.date = date;
        }

        txn.validate()
            .map_err(|e| FinanceError::Validation(e.to_string()))?;

        // Re-check when either side of the category/kind pairing moved
        if txn.kind != before.kind || txn.category != before.category {
            let category =
                CategoryService::new(self.storage).resolve_for_kind(&txn.category, txn.kind)?;
            txn.category = category.name;
        }

        txn.updated_at = Utc::now();

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_update(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.description.clone()),
            &before,
            &txn,
        )?;

        Ok(txn)
    }

    /// Delete a transaction
    pub fn delete(&self, id: TransactionId) -> FinanceResult<Transaction> {
        let txn = self.get(id)?;

        self.storage.transactions.delete(id)?;
        self.storage.transactions.save()?;

        self.storage.log_delete(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.description.clone()),
            &txn,
        )?;
        info!(id = %txn.id, "deleted transaction");

        Ok(txn)
    }

    pub fn count(&self) -> FinanceResult<usize> {
        self.storage.transactions.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FintrackPaths;
    use crate::storage::initialize_storage;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn expense(category: &str, cents: i64, description: &str, day: NaiveDate) -> CreateTransactionInput {
        CreateTransactionInput {
            kind: TransactionKind::Expense,
            amount: Money::from_cents(cents),
            category: category.into(),
            description: description.into(),
            date: day,
        }
    }

    #[test]
    fn test_create_and_get() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);

        let txn = service
            .create(expense("food", 4250, "Groceries", date(1, 15)))
            .unwrap();

        let fetched = service.get(txn.id).unwrap();
        assert_eq!(fetched, txn);
        assert_eq!(fetched.category, "Food");
        assert_eq!(service.resolve(&txn.id.to_string()).unwrap().id, txn.id);
    }

    #[test]
    fn test_create_rejects_invalid() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);

        let err = service
            .create(expense("Food", 0, "Nothing", date(1, 1)))
            .unwrap_err();
        assert!(err.is_validation());

        let err = service
            .create(expense("Food", 100, "  ", date(1, 1)))
            .unwrap_err();
        assert!(err.is_validation());

        // Salary is an income category
        let err = service
            .create(expense("Salary", 100, "Oops", date(1, 1)))
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(service.count().unwrap(), 0);
    }

    #[test]
    fn test_filtering() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);

        service.create(expense("Food", 1000, "Coffee beans", date(1, 3))).unwrap();
        service.create(expense("Food", 2000, "Dinner out", date(1, 10))).unwrap();
        service.create(expense("Housing", 90000, "Rent", date(2, 1))).unwrap();
        service
            .create(CreateTransactionInput {
                kind: TransactionKind::Income,
                amount: Money::from_cents(300_000),
                category: "Salary".into(),
                description: "January pay".into(),
                date: date(1, 31),
            })
            .unwrap();

        let food = service.list(&TransactionFilter::new().category("FOOD")).unwrap();
        assert_eq!(food.len(), 2);
        assert_eq!(food[0].description, "Dinner out");

        let income = service
            .list(&TransactionFilter::new().kind(TransactionKind::Income))
            .unwrap();
        assert_eq!(income.len(), 1);

        let searched = service.list(&TransactionFilter::new().search("coffee")).unwrap();
        assert_eq!(searched.len(), 1);

        let january = service
            .list(&TransactionFilter::new().date_range(date(1, 1), date(1, 31)))
            .unwrap();
        assert_eq!(january.len(), 3);

        let recent = service.list(&TransactionFilter::new().limit(2)).unwrap();
        assert_eq!(recent[0].description, "Rent");
        assert_eq!(recent.len(), 2);
    }

    #[test]
    fn test_update_changes_only_given_fields() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);
        let txn = service.create(expense("Food", 1000, "Lunch", date(1, 3))).unwrap();

        let updated = service
            .update(
                txn.id,
                UpdateTransactionInput {
                    amount: Some(Money::from_cents(1500)),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.amount.cents(), 1500);
        assert_eq!(updated.description, "Lunch");
        assert_eq!(updated.category, "Food");
        assert_eq!(updated.date, txn.date);
    }

    #[test]
    fn test_update_kind_requires_matching_category() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);
        let txn = service.create(expense("Food", 1000, "Lunch", date(1, 3))).unwrap();

        let err = service
            .update(
                txn.id,
                UpdateTransactionInput {
                    kind: Some(TransactionKind::Income),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_delete_then_get_not_found() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);
        let txn = service.create(expense("Food", 1000, "Lunch", date(1, 3))).unwrap();

        service.delete(txn.id).unwrap();
        assert!(service.get(txn.id).unwrap_err().is_not_found());
        assert!(service.delete(txn.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_mutations_are_audited() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);
        let txn = service.create(expense("Food", 1000, "Lunch", date(1, 3))).unwrap();
        service.delete(txn.id).unwrap();

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].entity_type, EntityType::Transaction);
    }
}
