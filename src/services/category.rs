//! Category service
//!
//! CRUD for categories plus the name resolution used by the transaction and
//! budget services: names match case-insensitively and resolve to the
//! canonical spelling, and the category kind must fit the record.

use chrono::Utc;
use tracing::info;

use crate::audit::{AuditEntry, EntityType};
use crate::error::{FinanceError, FinanceResult};
use crate::models::{Category, CategoryId, TransactionKind};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

/// Input for creating a category
#[derive(Debug, Clone)]
pub struct CreateCategoryInput {
    pub name: String,
    pub kind: TransactionKind,
    pub icon: Option<String>,
    pub color: Option<String>,
}

/// Per-field changes to a category; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateCategoryInput {
    pub name: Option<String>,
    pub kind: Option<TransactionKind>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new category
    pub fn create(&self, input: CreateCategoryInput) -> FinanceResult<Category> {
        let name = input.name.trim();

        if self.storage.categories.name_exists(name, None)? {
            return Err(FinanceError::Duplicate {
                entity_type: "Category",
                identifier: name.to_string(),
            });
        }

        let category = Category::with_style(
            name,
            input.kind,
            input.icon.unwrap_or_default(),
            input.color.unwrap_or_default(),
        );
        category
            .validate()
            .map_err(|e| FinanceError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_create(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;
        info!(category = %category.name, kind = %category.kind, "created category");

        Ok(category)
    }

    /// Get a category by ID
    pub fn get(&self, id: CategoryId) -> FinanceResult<Category> {
        self.storage
            .categories
            .get(id)?
            .ok_or_else(|| FinanceError::category_not_found(id.to_string()))
    }

    /// Find a category by name or ID
    pub fn find(&self, identifier: &str) -> FinanceResult<Option<Category>> {
        self.storage.categories.find(identifier)
    }

    /// Find a category by name or ID, failing when it does not exist
    pub fn resolve(&self, identifier: &str) -> FinanceResult<Category> {
        self.find(identifier)?
            .ok_or_else(|| FinanceError::category_not_found(identifier))
    }

    /// List categories, optionally of one kind, sorted by name
    pub fn list(&self, kind: Option<TransactionKind>) -> FinanceResult<Vec<Category>> {
        match kind {
            Some(kind) => self.storage.categories.get_by_kind(kind),
            None => self.storage.categories.get_all(),
        }
    }

    /// Resolve a category name for a record of the given kind
    ///
    /// Returns the category with its canonical name. Fails with a validation
    /// error when the name is unknown or belongs to the other kind.
    pub fn resolve_for_kind(&self, name: &str, kind: TransactionKind) -> FinanceResult<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FinanceError::Validation("Category is required".into()));
        }

        let category = self
            .storage
            .categories
            .get_by_name(name)?
            .ok_or_else(|| FinanceError::Validation(format!("Unknown category '{}'", name)))?;

        if category.kind != kind {
            return Err(FinanceError::Validation(format!(
                "Category '{}' is an {} category, not {}",
                category.name, category.kind, kind
            )));
        }

        Ok(category)
    }

    /// Update a category
    ///
    /// A rename is carried through to every transaction and budget filed
    /// under the old name. Changing the kind is refused while records of
    /// the old kind still reference the category.
    pub fn update(&self, id: CategoryId, input: UpdateCategoryInput) -> FinanceResult<Category> {
        let mut category = self.get(id)?;
        let before = category.clone();

        if let Some(name) = input.name {
            let name = name.trim().to_string();
            if self.storage.categories.name_exists(&name, Some(id))? {
                return Err(FinanceError::Duplicate {
                    entity_type: "Category",
                    identifier: name,
                });
            }
            category.name = name;
        }

        if let Some(kind) = input.kind {
            if kind != before.kind {
                let usage = self.usage(&before.name)?;
                if let Some(reason) = usage.describe() {
                    return Err(FinanceError::InUse {
                        entity_type: "Category",
                        identifier: before.name.clone(),
                        reason,
                    });
                }
            }
            category.kind = kind;
        }

        if let Some(icon) = input.icon {
            category.icon = icon;
        }

        if let Some(color) = input.color {
            category.color = color;
        }

        category.updated_at = Utc::now();
        category
            .validate()
            .map_err(|e| FinanceError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        if before.name != category.name {
            self.rename_references(&before.name, &category.name)?;
        }

        self.storage.log_update(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &before,
            &category,
        )?;

        Ok(category)
    }

    /// Delete a category that nothing references
    pub fn delete(&self, id: CategoryId) -> FinanceResult<Category> {
        let category = self.get(id)?;

        if let Some(reason) = self.usage(&category.name)?.describe() {
            return Err(FinanceError::InUse {
                entity_type: "Category",
                identifier: category.name,
                reason,
            });
        }

        self.storage.categories.delete(id)?;
        self.storage.categories.save()?;

        self.storage.log_delete(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;
        info!(category = %category.name, "deleted category");

        Ok(category)
    }

    fn usage(&self, name: &str) -> FinanceResult<CategoryUsage> {
        Ok(CategoryUsage {
            transactions: self.storage.transactions.count_in_category(name)?,
            budgets: self.storage.budgets.get_by_category(name)?.len(),
        })
    }

    fn rename_references(&self, old: &str, new: &str) -> FinanceResult<()> {
        let mut entries = Vec::new();
        let now = Utc::now();

        let transactions = self.storage.transactions.get_by_category(old)?;
        for txn in &transactions {
            let mut renamed = txn.clone();
            renamed.category = new.to_string();
            renamed.updated_at = now;
            entries.push(AuditEntry::update(
                EntityType::Transaction,
                renamed.id.to_string(),
                Some(renamed.description.clone()),
                txn,
                &renamed,
            ));
            self.storage.transactions.upsert(renamed)?;
        }

        let budgets = self.storage.budgets.get_by_category(old)?;
        for budget in &budgets {
            let mut renamed = budget.clone();
            renamed.category = new.to_string();
            renamed.updated_at = now;
            entries.push(AuditEntry::update(
                EntityType::Budget,
                renamed.id.to_string(),
                Some(renamed.category.clone()),
                budget,
                &renamed,
            ));
            self.storage.budgets.upsert(renamed)?;
        }

        if !transactions.is_empty() {
            self.storage.transactions.save()?;
        }
        if !budgets.is_empty() {
            self.storage.budgets.save()?;
        }
        self.storage.log_batch(&entries)?;

        info!(
            from = old,
            to = new,
            transactions = transactions.len(),
            budgets = budgets.len(),
            "renamed category references"
        );
        Ok(())
    }
}

struct CategoryUsage {
    transactions: usize,
    budgets: usize,
}

impl CategoryUsage {
    fn describe(&self) -> Option<String> {
        match (self.transactions, self.budgets) {
            (0, 0) => None,
            (t, 0) => Some(format!("{} transaction(s) reference it", t)),
            (0, b) => Some(format!("{} budget(s) reference it", b)),
            (t, b) => Some(format!(
                "{} transaction(s) and {} budget(s) reference it",
                t, b
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FintrackPaths;
    use crate::models::{Budget, Money, Transaction};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    fn input(name: &str, kind: TransactionKind) -> CreateCategoryInput {
        CreateCategoryInput {
            name: name.into(),
            kind,
            icon: None,
            color: None,
        }
    }

    #[test]
    fn test_create_and_duplicate() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let food = service.create(input("Food", TransactionKind::Expense)).unwrap();
        assert_eq!(service.get(food.id).unwrap().name, "Food");

        let err = service
            .create(input("FOOD", TransactionKind::Expense))
            .unwrap_err();
        assert!(matches!(err, FinanceError::Duplicate { .. }));
    }

    #[test]
    fn test_resolve_for_kind() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        service.create(input("Salary", TransactionKind::Income)).unwrap();

        let resolved = service
            .resolve_for_kind("salary", TransactionKind::Income)
            .unwrap();
        assert_eq!(resolved.name, "Salary");

        assert!(service
            .resolve_for_kind("Salary", TransactionKind::Expense)
            .unwrap_err()
            .is_validation());
        assert!(service
            .resolve_for_kind("Bonus", TransactionKind::Income)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_delete_in_use_refused() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let food = service.create(input("Food", TransactionKind::Expense)).unwrap();

        storage
            .transactions
            .upsert(Transaction::new(
                TransactionKind::Expense,
                Money::from_cents(500),
                "Food",
                "Lunch",
                NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            ))
            .unwrap();

        let err = service.delete(food.id).unwrap_err();
        assert!(matches!(err, FinanceError::InUse { .. }));
    }

    #[test]
    fn test_delete_unused() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let pets = service.create(input("Pets", TransactionKind::Expense)).unwrap();

        service.delete(pets.id).unwrap();
        assert!(service.get(pets.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_rename_cascades() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let food = service.create(input("Food", TransactionKind::Expense)).unwrap();
        storage
            .budgets
            .upsert(Budget::new("Food", Money::from_cents(20_000), "January 2025"))
            .unwrap();

        service
            .update(
                food.id,
                UpdateCategoryInput {
                    name: Some("Groceries".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(storage.budgets.get_by_category("Groceries").unwrap().len(), 1);
        assert!(storage.budgets.get_by_category("Food").unwrap().is_empty());
    }

    #[test]
    fn test_kind_change_refused_when_used() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let food = service.create(input("Food", TransactionKind::Expense)).unwrap();
        storage
            .budgets
            .upsert(Budget::new("Food", Money::from_cents(20_000), "January 2025"))
            .unwrap();

        let err = service
            .update(
                food.id,
                UpdateCategoryInput {
                    kind: Some(TransactionKind::Income),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, FinanceError::InUse { .. }));
    }
}
