//! Budget alert evaluation
//!
//! [`evaluate_alerts`] is a pure function over budgets, transactions and an
//! [`AlertPolicy`]. [`AlertService`] wires it to storage and manages the
//! per-budget threshold overrides.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::audit::EntityType;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{
    Alert, AlertId, AlertSettings, AlertSettingsUpdate, AlertSeverity, Budget, BudgetId, Money,
    MonthRange, Transaction,
};
use crate::storage::Storage;

use super::budget::{category_spend, BudgetService};

/// Which thresholds apply to which budget
#[derive(Debug, Clone, Default)]
pub struct AlertPolicy {
    /// Used for budgets without an override
    pub defaults: AlertSettings,
    pub overrides: HashMap<BudgetId, AlertSettings>,
}

impl AlertPolicy {
    pub fn new(defaults: AlertSettings, overrides: HashMap<BudgetId, AlertSettings>) -> Self {
        Self {
            defaults,
            overrides,
        }
    }

    pub fn settings_for(&self, budget_id: BudgetId) -> AlertSettings {
        self.overrides
            .get(&budget_id)
            .copied()
            .unwrap_or(self.defaults)
    }
}

/// Check a single budget's spend against its thresholds
///
/// A zero limit always yields an error alert with no percentage.
pub fn evaluate_budget(budget: &Budget, spent: Money, settings: &AlertSettings) -> Option<Alert> {
    if !settings.enabled {
        return None;
    }

    let percentage = spent.percentage_of(budget.monthly_limit);

    let (severity, threshold) = match percentage {
        None => (AlertSeverity::Error, settings.error_threshold),
        Some(p) if p >= settings.error_threshold => (AlertSeverity::Error, settings.error_threshold),
        Some(p) if p >= settings.warning_threshold => {
            (AlertSeverity::Warning, settings.warning_threshold)
        }
        Some(_) => return None,
    };

    let message = match severity {
        AlertSeverity::Error => format!("Budget exceeded for {}", budget.category),
        AlertSeverity::Warning => format!("Budget alert for {}", budget.category),
    };

    Some(Alert {
        id: AlertId::new(),
        budget_id: budget.id,
        category: budget.category.clone(),
        severity,
        message,
        percentage,
        threshold,
        spent,
        limit: budget.monthly_limit,
    })
}

/// Evaluate every budget, in input order
pub fn evaluate_alerts(
    budgets: &[Budget],
    transactions: &[Transaction],
    policy: &AlertPolicy,
) -> Vec<Alert> {
    budgets
        .iter()
        .filter_map(|budget| {
            let spent = category_spend(transactions, &budget.category);
            evaluate_budget(budget, spent, &policy.settings_for(budget.id))
        })
        .collect()
}

/// Service for alert checks and alert settings
pub struct AlertService<'a> {
    storage: &'a Storage,
    defaults: AlertSettings,
}

impl<'a> AlertService<'a> {
    /// `defaults` are the global thresholds from the settings file
    pub fn new(storage: &'a Storage, defaults: AlertSettings) -> Self {
        Self { storage, defaults }
    }

    fn policy(&self) -> FinanceResult<AlertPolicy> {
        Ok(AlertPolicy::new(
            self.defaults,
            self.storage.alert_settings.get_all()?,
        ))
    }

    /// Evaluate all budgets, optionally counting only one month's spending
    pub fn check_alerts(&self, window: Option<MonthRange>) -> FinanceResult<Vec<Alert>> {
        let budgets = self.storage.budgets.get_all()?;
        let transactions = BudgetService::new(self.storage).spending_transactions(window)?;

        let alerts = evaluate_alerts(&budgets, &transactions, &self.policy()?);
        debug!(
            budgets = budgets.len(),
            alerts = alerts.len(),
            "evaluated budget alerts"
        );
        Ok(alerts)
    }

    /// Effective settings for a budget: its override or the defaults
    pub fn get_settings(&self, budget_id: BudgetId) -> FinanceResult<AlertSettings> {
        self.require_budget(budget_id)?;
        Ok(self
            .storage
            .alert_settings
            .get(budget_id)?
            .unwrap_or(self.defaults))
    }

    /// Whether a budget has its own thresholds
    pub fn has_override(&self, budget_id: BudgetId) -> FinanceResult<bool> {
        Ok(self.storage.alert_settings.get(budget_id)?.is_some())
    }

    /// Store an override built from `update` laid over the defaults
    ///
    /// Fields not given take the default value, not the previous override.
    pub fn update_settings(
        &self,
        budget_id: BudgetId,
        update: AlertSettingsUpdate,
    ) -> FinanceResult<AlertSettings> {
        let budget = self.require_budget(budget_id)?;

        let settings = update.apply_to(&self.defaults);
        settings
            .validate()
            .map_err(|e| FinanceError::Validation(e.to_string()))?;

        let previous = self.storage.alert_settings.get(budget_id)?;
        self.storage.alert_settings.set(budget_id, settings)?;
        self.storage.alert_settings.save()?;

        match previous {
            Some(before) => self.storage.log_update(
                EntityType::AlertSettings,
                budget_id.to_string(),
                Some(budget.category.clone()),
                &before,
                &settings,
            )?,
            None => self.storage.log_create(
                EntityType::AlertSettings,
                budget_id.to_string(),
                Some(budget.category.clone()),
                &settings,
            )?,
        }
        info!(budget = %budget.category, %settings, "updated alert settings");

        Ok(settings)
    }

    /// Drop a budget's override, returning whether there was one
    pub fn reset_settings(&self, budget_id: BudgetId) -> FinanceResult<bool> {
        let budget = self.require_budget(budget_id)?;

        let Some(previous) = self.storage.alert_settings.get(budget_id)? else {
            return Ok(false);
        };

        self.storage.alert_settings.remove(budget_id)?;
        self.storage.alert_settings.save()?;
        self.storage.log_delete(
            EntityType::AlertSettings,
            budget_id.to_string(),
            Some(budget.category),
            &previous,
        )?;

        Ok(true)
    }

    fn require_budget(&self, budget_id: BudgetId) -> FinanceResult<Budget> {
        self.storage
            .budgets
            .get(budget_id)?
            .ok_or_else(|| FinanceError::budget_not_found(budget_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FintrackPaths;
    use crate::models::TransactionKind;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn budget(category: &str, limit: i64) -> Budget {
        Budget::new(category, Money::from_cents(limit), "January 2025")
    }

    fn expense(category: &str, cents: i64) -> Transaction {
        expense_on(category, cents, 15)
    }

    fn expense_on(category: &str, cents: i64, day: u32) -> Transaction {
        Transaction::new(
            TransactionKind::Expense,
            Money::from_cents(cents),
            category,
            "test",
            NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
        )
    }

    #[test]
    fn test_warning_at_85_percent() {
        let budgets = vec![budget("Food", 20_000)];
        let transactions = vec![expense("Food", 17_000)];

        let alerts = evaluate_alerts(&budgets, &transactions, &AlertPolicy::default());

        assert_eq!(alerts.len(), 1);
        let alert = &alerts[0];
        assert_eq!(alert.severity, AlertSeverity::Warning);
        assert_eq!(alert.message, "Budget alert for Food");
        assert_eq!(alert.percentage, Some(85.0));
        assert_eq!(alert.threshold, 80.0);
        assert_eq!(alert.budget_id, budgets[0].id);
    }

    #[test]
    fn test_error_at_limit() {
        let budgets = vec![budget("Food", 20_000)];
        let transactions = vec![expense("Food", 15_000), expense("food", 5_000)];

        let alerts = evaluate_alerts(&budgets, &transactions, &AlertPolicy::default());

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, AlertSeverity::Error);
        assert_eq!(alerts[0].message, "Budget exceeded for Food");
        assert_eq!(alerts[0].percentage, Some(100.0));
        assert_eq!(alerts[0].threshold, 100.0);
    }

    #[test]
    fn test_below_warning_no_alert() {
        let budgets = vec![budget("Food", 20_000)];
        let transactions = vec![expense("Food", 15_999), expense("Housing", 90_000)];

        assert!(evaluate_alerts(&budgets, &transactions, &AlertPolicy::default()).is_empty());
    }

    #[test]
    fn test_income_does_not_count() {
        let budgets = vec![budget("Food", 100)];
        let income = Transaction::new(
            TransactionKind::Income,
            Money::from_cents(10_000),
            "Food",
            "refund",
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        );

        assert!(evaluate_alerts(&budgets, &[income], &AlertPolicy::default()).is_empty());
    }

    #[test]
    fn test_zero_limit_always_errors() {
        let zero = budget("Food", 0);
        let alert = evaluate_budget(&zero, Money::zero(), &AlertSettings::default()).unwrap();

        assert_eq!(alert.severity, AlertSeverity::Error);
        assert_eq!(alert.percentage, None);
        assert_eq!(alert.threshold, 100.0);
    }

    #[test]
    fn test_disabled_settings_skip_budget() {
        let food = budget("Food", 10_000);
        let mut overrides = HashMap::new();
        overrides.insert(
            food.id,
            AlertSettings {
                enabled: false,
                ..Default::default()
            },
        );
        let policy = AlertPolicy::new(AlertSettings::default(), overrides);

        let alerts = evaluate_alerts(&[food], &[expense("Food", 50_000)], &policy);
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_override_thresholds() {
        let food = budget("Food", 10_000);
        let housing = budget("Housing", 10_000);
        let mut overrides = HashMap::new();
        overrides.insert(
            food.id,
            AlertSettings {
                warning_threshold: 50.0,
                error_threshold: 60.0,
                enabled: true,
            },
        );
        let policy = AlertPolicy::new(AlertSettings::default(), overrides);
        let transactions = vec![expense("Food", 6_000), expense("Housing", 6_000)];

        let alerts = evaluate_alerts(&[food, housing], &transactions, &policy);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].category, "Food");
        assert_eq!(alerts[0].severity, AlertSeverity::Error);
    }

    #[test]
    fn test_alert_ids_unique_and_order_follows_budgets() {
        let budgets = vec![budget("Food", 100), budget("Housing", 100)];
        let transactions = vec![expense("Housing", 100), expense("Food", 90)];

        let alerts = evaluate_alerts(&budgets, &transactions, &AlertPolicy::default());
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].category, "Food");
        assert_eq!(alerts[1].category, "Housing");
        assert_ne!(alerts[0].id, alerts[1].id);
    }

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_service_check_alerts_with_window() {
        let (_temp_dir, storage) = create_test_storage();
        let food = budget("Food", 10_000);
        storage.budgets.upsert(food).unwrap();
        storage.transactions.upsert(expense_on("Food", 9_000, 20)).unwrap();
        storage
            .transactions
            .upsert(Transaction::new(
                TransactionKind::Expense,
                Money::from_cents(9_000),
                "Food",
                "last year",
                NaiveDate::from_ymd_opt(2024, 12, 20).unwrap(),
            ))
            .unwrap();

        let service = AlertService::new(&storage, AlertSettings::default());

        let all_time = service.check_alerts(None).unwrap();
        assert_eq!(all_time[0].severity, AlertSeverity::Error);

        let january = service.check_alerts(MonthRange::new(2025, 1)).unwrap();
        assert_eq!(january[0].severity, AlertSeverity::Warning);
        assert_eq!(january[0].percentage, Some(90.0));
    }

    #[test]
    fn test_update_merges_over_defaults() {
        let (_temp_dir, storage) = create_test_storage();
        let food = budget("Food", 10_000);
        let id = food.id;
        storage.budgets.upsert(food).unwrap();
        let service = AlertService::new(&storage, AlertSettings::default());

        let first = service
            .update_settings(
                id,
                AlertSettingsUpdate {
                    error_threshold: Some(120.0),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(first.warning_threshold, 80.0);
        assert_eq!(first.error_threshold, 120.0);

        let second = service
            .update_settings(
                id,
                AlertSettingsUpdate {
                    warning_threshold: Some(70.0),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(second.warning_threshold, 70.0);
        assert_eq!(second.error_threshold, 100.0);
        assert_eq!(service.get_settings(id).unwrap(), second);
    }

    #[test]
    fn test_update_rejects_bad_thresholds() {
        let (_temp_dir, storage) = create_test_storage();
        let food = budget("Food", 10_000);
        let id = food.id;
        storage.budgets.upsert(food).unwrap();
        let service = AlertService::new(&storage, AlertSettings::default());

        let err = service
            .update_settings(
                id,
                AlertSettingsUpdate {
                    warning_threshold: Some(150.0),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(err.is_validation());
        assert!(!service.has_override(id).unwrap());
    }

    #[test]
    fn test_settings_for_missing_budget() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AlertService::new(&storage, AlertSettings::default());

        let missing = BudgetId::new();
        assert!(service.get_settings(missing).unwrap_err().is_not_found());
        assert!(service
            .update_settings(missing, AlertSettingsUpdate::default())
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_reset_settings() {
        let (_temp_dir, storage) = create_test_storage();
        let food = budget("Food", 10_000);
        let id = food.id;
        storage.budgets.upsert(food).unwrap();
        let defaults = AlertSettings {
            warning_threshold: 75.0,
            ..Default::default()
        };
        let service = AlertService::new(&storage, defaults);

        service
            .update_settings(
                id,
                AlertSettingsUpdate {
                    enabled: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(service.reset_settings(id).unwrap());
        assert!(!service.reset_settings(id).unwrap());
        assert_eq!(service.get_settings(id).unwrap(), defaults);
    }
}
