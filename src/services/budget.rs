//! Budget service
//!
//! Provides business logic for budget management: validated CRUD and the
//! spending summaries derived from transactions.

use chrono::Utc;
use tracing::info;

use crate::audit::EntityType;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{
    Budget, BudgetId, BudgetSummary, Money, MonthRange, Transaction, TransactionKind,
};
use crate::storage::Storage;

use super::category::CategoryService;

/// Total of expense amounts filed under `category` (case-insensitive)
pub fn category_spend(transactions: &[Transaction], category: &str) -> Money {
    transactions
        .iter()
        .filter(|t| t.is_expense_in(category))
        .map(|t| t.amount.abs())
        .sum()
}

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

/// Input for creating a budget
#[derive(Debug, Clone)]
pub struct CreateBudgetInput {
    pub category: String,
    pub monthly_limit: Money,
    /// Period label; the current month's long label when omitted
    pub period: Option<String>,
}

/// Per-field changes to a budget; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateBudgetInput {
    pub category: Option<String>,
    pub monthly_limit: Option<Money>,
    pub period: Option<String>,
}

/// All budgets with their derived spending
#[derive(Debug, Clone)]
pub struct BudgetOverview {
    /// Month the spending was restricted to, if any
    pub window: Option<MonthRange>,
    pub total_limit: Money,
    pub total_spent: Money,
    pub budgets: Vec<BudgetSummary>,
}

impl BudgetOverview {
    pub fn total_remaining(&self) -> Money {
        self.total_limit - self.total_spent
    }

    pub fn over_budget(&self) -> impl Iterator<Item = &BudgetSummary> {
        self.budgets.iter().filter(|s| s.is_over_budget())
    }
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new budget
    pub fn create(&self, input: CreateBudgetInput) -> FinanceResult<Budget> {
        let period = input
            .period
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| MonthRange::current().long_label());

        let mut budget = Budget::new(input.category.trim(), input.monthly_limit, period);
        budget
            .validate()
            .map_err(|e| FinanceError::Validation(e.to_string()))?;

        let category = CategoryService::new(self.storage)
            .resolve_for_kind(&budget.category, TransactionKind::Expense)?;
        budget.category = category.name;

        self.ensure_unique(&budget)?;

        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;

        self.storage.log_create(
            EntityType::Budget,
            budget.id.to_string(),
            Some(budget.category.clone()),
            &budget,
        )?;
        info!(id = %budget.id, category = %budget.category, limit = %budget.monthly_limit, "created budget");

        Ok(budget)
    }

    /// One budget per category and period label
    fn ensure_unique(&self, budget: &Budget) -> FinanceResult<()> {
        let clash = self
            .storage
            .budgets
            .get_by_category(&budget.category)?
            .into_iter()
            .any(|b| b.id != budget.id && b.period.eq_ignore_ascii_case(&budget.period));

        if clash {
            return Err(FinanceError::Duplicate {
                entity_type: "Budget",
                identifier: format!("{} ({})", budget.category, budget.period),
            });
        }
        Ok(())
    }

    /// Get a budget by ID
    pub fn get(&self, id: BudgetId) -> FinanceResult<Budget> {
        self.storage
            .budgets
            .get(id)?
            .ok_or_else(|| FinanceError::budget_not_found(id.to_string()))
    }

    /// Find a budget by ID or category name
    pub fn find(&self, identifier: &str) -> FinanceResult<Option<Budget>> {
        self.storage.budgets.find(identifier)
    }

    /// Find a budget by ID or category name, failing when it does not exist
    pub fn resolve(&self, identifier: &str) -> FinanceResult<Budget> {
        self.find(identifier)?
            .ok_or_else(|| FinanceError::budget_not_found(identifier))
    }

    /// All budgets in creation order
    pub fn list(&self) -> FinanceResult<Vec<Budget>> {
        self.storage.budgets.get_all()
    }

    /// Update a budget
    pub fn update(&self, id: BudgetId, input: UpdateBudgetInput) -> FinanceResult<Budget> {
        let mut budget = self.get(id)?;
        let before = budget.clone();

        if let Some(category) = input.category {
            let category = CategoryService::new(self.storage)
                .resolve_for_kind(&category, TransactionKind::Expense)?;
            budget.category = category.name;
        }
        if let Some(limit) = input.monthly_limit {
            budget.monthly_limit = limit;
        }
        if let Some(period) = input.period {
            budget.period = period.trim().to_string();
        }

        budget
            .validate()
            .map_err(|e| FinanceError::Validation(e.to_string()))?;
        self.ensure_unique(&budget)?;

        budget.updated_at = Utc::now();

        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;

        self.storage.log_update(
            EntityType::Budget,
            budget.id.to_string(),
            Some(budget.category.clone()),
            &before,
            &budget,
        )?;

        Ok(budget)
    }

    /// Delete a budget along with its alert settings override
    pub fn delete(&self, id: BudgetId) -> FinanceResult<Budget> {
        let budget = self.get(id)?;

        self.storage.budgets.delete(id)?;
        self.storage.budgets.save()?;

        if let Some(settings) = self.storage.alert_settings.get(id)? {
            self.storage.alert_settings.remove(id)?;
            self.storage.alert_settings.save()?;
            self.storage.log_delete(
                EntityType::AlertSettings,
                budget.id.to_string(),
                Some(budget.category.clone()),
                &settings,
            )?;
        }

        self.storage.log_delete(
            EntityType::Budget,
            budget.id.to_string(),
            Some(budget.category.clone()),
            &budget,
        )?;
        info!(id = %budget.id, category = %budget.category, "deleted budget");

        Ok(budget)
    }

    /// Transactions that count toward spending, optionally limited to a month
    pub fn spending_transactions(&self, window: Option<MonthRange>) -> FinanceResult<Vec<Transaction>> {
        match window {
            Some(month) => self
                .storage
                .transactions
                .get_by_date_range(month.start(), month.end()),
            None => self.storage.transactions.get_all(),
        }
    }

    /// Spending summary for one budget
    pub fn summary(&self, budget: &Budget, window: Option<MonthRange>) -> FinanceResult<BudgetSummary> {
        let transactions = self.spending_transactions(window)?;
        let spent = category_spend(&transactions, &budget.category);
        Ok(BudgetSummary::new(budget.clone(), spent))
    }

    /// Spending summaries for every budget
    pub fn overview(&self, window: Option<MonthRange>) -> FinanceResult<BudgetOverview> {
        let transactions = self.spending_transactions(window)?;

        let budgets: Vec<BudgetSummary> = self
            .list()?
            .into_iter()
            .map(|budget| {
                let spent = category_spend(&transactions, &budget.category);
                BudgetSummary::new(budget, spent)
            })
            .collect();

        Ok(BudgetOverview {
            window,
            total_limit: budgets.iter().map(|s| s.budget.monthly_limit).sum(),
            total_spent: budgets.iter().map(|s| s.spent).sum(),
            budgets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FintrackPaths;
    use crate::models::{AlertSettings, BudgetStatus};
    use crate::storage::initialize_storage;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    fn food_budget(cents: i64) -> CreateBudgetInput {
        CreateBudgetInput {
            category: "food".into(),
            monthly_limit: Money::from_cents(cents),
            period: Some("January 2025".into()),
        }
    }

    fn add_expense(storage: &Storage, category: &str, cents: i64, month: u32) {
        storage
            .transactions
            .upsert(Transaction::new(
                TransactionKind::Expense,
                Money::from_cents(cents),
                category,
                "test",
                NaiveDate::from_ymd_opt(2025, month, 10).unwrap(),
            ))
            .unwrap();
    }

    #[test]
    fn test_category_spend() {
        let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let transactions = vec![
            Transaction::new(TransactionKind::Expense, Money::from_cents(100), "Food", "a", day),
            Transaction::new(TransactionKind::Expense, Money::from_cents(250), "food", "b", day),
            Transaction::new(TransactionKind::Income, Money::from_cents(999), "Food", "c", day),
            Transaction::new(TransactionKind::Expense, Money::from_cents(400), "Housing", "d", day),
        ];
        assert_eq!(category_spend(&transactions, "Food").cents(), 350);
        assert_eq!(category_spend(&[], "Food"), Money::zero());
    }

    #[test]
    fn test_create_and_get() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);

        let budget = service.create(food_budget(20_000)).unwrap();
        let fetched = service.get(budget.id).unwrap();
        assert_eq!(fetched, budget);
        assert_eq!(fetched.category, "Food");
        assert_eq!(service.resolve("FOOD").unwrap().id, budget.id);
    }

    #[test]
    fn test_create_validation() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);

        assert!(service.create(food_budget(0)).unwrap_err().is_validation());

        let income = CreateBudgetInput {
            category: "Salary".into(),
            monthly_limit: Money::from_cents(100),
            period: None,
        };
        assert!(service.create(income).unwrap_err().is_validation());
    }

    #[test]
    fn test_duplicate_period_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);

        service.create(food_budget(20_000)).unwrap();
        let err = service.create(food_budget(30_000)).unwrap_err();
        assert!(matches!(err, FinanceError::Duplicate { .. }));
    }

    #[test]
    fn test_default_period_is_current_month() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);

        let budget = service
            .create(CreateBudgetInput {
                category: "Housing".into(),
                monthly_limit: Money::from_cents(150_000),
                period: None,
            })
            .unwrap();
        assert_eq!(budget.period, MonthRange::current().long_label());
    }

    #[test]
    fn test_summary_and_window() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let budget = service.create(food_budget(20_000)).unwrap();

        add_expense(&storage, "Food", 17_000, 1);
        add_expense(&storage, "Food", 5_000, 2);

        let all_time = service.summary(&budget, None).unwrap();
        assert_eq!(all_time.spent.cents(), 22_000);
        assert_eq!(all_time.status, BudgetStatus::OverBudget);

        let january = service
            .summary(&budget, MonthRange::new(2025, 1))
            .unwrap();
        assert_eq!(january.spent.cents(), 17_000);
        assert_eq!(january.percentage, Some(85.0));
        assert_eq!(january.status, BudgetStatus::NearLimit);
    }

    #[test]
    fn test_overview_totals() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        service.create(food_budget(20_000)).unwrap();
        service
            .create(CreateBudgetInput {
                category: "Housing".into(),
                monthly_limit: Money::from_cents(100_000),
                period: Some("January 2025".into()),
            })
            .unwrap();
        add_expense(&storage, "Food", 25_000, 1);

        let overview = service.overview(None).unwrap();
        assert_eq!(overview.total_limit.cents(), 120_000);
        assert_eq!(overview.total_spent.cents(), 25_000);
        assert_eq!(overview.total_remaining().cents(), 95_000);
        assert_eq!(overview.over_budget().count(), 1);
    }

    #[test]
    fn test_update_and_delete() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let budget = service.create(food_budget(20_000)).unwrap();

        let updated = service
            .update(
                budget.id,
                UpdateBudgetInput {
                    monthly_limit: Some(Money::from_cents(25_000)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.monthly_limit.cents(), 25_000);
        assert_eq!(updated.category, "Food");

        storage
            .alert_settings
            .set(budget.id, AlertSettings::default())
            .unwrap();
        service.delete(budget.id).unwrap();

        assert!(service.get(budget.id).unwrap_err().is_not_found());
        assert!(storage.alert_settings.get(budget.id).unwrap().is_none());
    }
}
