//! Savings goal service

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::audit::EntityType;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{Goal, GoalId, Money};
use crate::storage::Storage;

/// Service for savings goal management
pub struct GoalService<'a> {
    storage: &'a Storage,
}

#[derive(Debug, Clone)]
pub struct CreateGoalInput {
    pub name: String,
    pub target_amount: Money,
    /// Amount already saved, zero when omitted
    pub current_amount: Option<Money>,
    pub deadline: NaiveDate,
}

/// Per-field changes to a goal; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateGoalInput {
    pub name: Option<String>,
    pub target_amount: Option<Money>,
    pub current_amount: Option<Money>,
    pub deadline: Option<NaiveDate>,
}

impl<'a> GoalService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(&self, input: CreateGoalInput) -> FinanceResult<Goal> {
        let mut goal = Goal::new(input.name.trim(), input.target_amount, input.deadline);
        if let Some(current) = input.current_amount {
            goal.current_amount = current;
        }

        goal.validate()
            .map_err(|e| FinanceError::Validation(e.to_string()))?;

        self.storage.goals.upsert(goal.clone())?;
        self.storage.goals.save()?;

        self.storage.log_create(
            EntityType::Goal,
            goal.id.to_string(),
            Some(goal.name.clone()),
            &goal,
        )?;
        info!(id = %goal.id, name = %goal.name, target = %goal.target_amount, "created goal");

        Ok(goal)
    }

    pub fn get(&self, id: GoalId) -> FinanceResult<Goal> {
        self.storage
            .goals
            .get(id)?
            .ok_or_else(|| FinanceError::goal_not_found(id.to_string()))
    }

    /// Find a goal by ID or name
    pub fn find(&self, identifier: &str) -> FinanceResult<Option<Goal>> {
        self.storage.goals.find(identifier)
    }

    pub fn resolve(&self, identifier: &str) -> FinanceResult<Goal> {
        self.find(identifier)?
            .ok_or_else(|| FinanceError::goal_not_found(identifier))
    }

    /// All goals, nearest deadline first
    pub fn list(&self) -> FinanceResult<Vec<Goal>> {
        self.storage.goals.get_all()
    }

    pub fn update(&self, id: GoalId, input: UpdateGoalInput) -> FinanceResult<Goal> {
        let mut goal = self.get(id)?;
        let before = goal.clone();

        if let Some(name) = input.name {
            goal.name = name.trim().to_string();
        }
        if let Some(target) = input.target_amount {
            goal.target_amount = target;
        }
        if let Some(current) = input.current_amount {
            goal.current_amount = current;
        }
        if let Some(deadline) = input.deadline {
            goal.deadline = deadline;
        }

        goal.validate()
            .map_err(|e| FinanceError::Validation(e.to_string()))?;
        goal.updated_at = Utc::now();

        self.save_update(&before, &goal)?;
        Ok(goal)
    }

    /// Add money to a goal's saved amount
    pub fn contribute(&self, id: GoalId, amount: Money) -> FinanceResult<Goal> {
        if !amount.is_positive() {
            return Err(FinanceError::Validation(format!(
                "Contribution must be greater than 0 (got {})",
                amount
            )));
        }

        let mut goal = self.get(id)?;
        let before = goal.clone();
        let was_completed = goal.is_completed();

        goal.contribute(amount);
        self.save_update(&before, &goal)?;

        if goal.is_completed() && !was_completed {
            info!(id = %goal.id, name = %goal.name, "goal reached");
        }
        Ok(goal)
    }

    fn save_update(&self, before: &Goal, goal: &Goal) -> FinanceResult<()> {
        self.storage.goals.upsert(goal.clone())?;
        self.storage.goals.save()?;

        self.storage.log_update(
            EntityType::Goal,
            goal.id.to_string(),
            Some(goal.name.clone()),
            before,
            goal,
        )
    }

    pub fn delete(&self, id: GoalId) -> FinanceResult<Goal> {
        let goal = self.get(id)?;

        self.storage.goals.delete(id)?;
        self.storage.goals.save()?;

        self.storage.log_delete(
            EntityType::Goal,
            goal.id.to_string(),
            Some(goal.name.clone()),
            &goal,
        )?;

        Ok(goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FintrackPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    fn input(name: &str, target: i64) -> CreateGoalInput {
        CreateGoalInput {
            name: name.into(),
            target_amount: Money::from_cents(target),
            current_amount: None,
            deadline: NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
        }
    }

    #[test]
    fn test_create_and_get() {
        let (_temp_dir, storage) = create_test_storage();
        let service = GoalService::new(&storage);

        let goal = service.create(input("Vacation", 300_000)).unwrap();
        assert_eq!(service.get(goal.id).unwrap(), goal);
        assert_eq!(service.resolve("vacation").unwrap().id, goal.id);
        assert_eq!(goal.current_amount, Money::zero());
    }

    #[test]
    fn test_create_validation() {
        let (_temp_dir, storage) = create_test_storage();
        let service = GoalService::new(&storage);

        assert!(service.create(input(" ", 100)).unwrap_err().is_validation());
        assert!(service.create(input("Car", 0)).unwrap_err().is_validation());
    }

    #[test]
    fn test_contribute() {
        let (_temp_dir, storage) = create_test_storage();
        let service = GoalService::new(&storage);
        let goal = service.create(input("Laptop", 150_000)).unwrap();

        let goal = service.contribute(goal.id, Money::from_cents(100_000)).unwrap();
        assert!(!goal.is_completed());

        let goal = service.contribute(goal.id, Money::from_cents(60_000)).unwrap();
        assert!(goal.is_completed());
        assert_eq!(goal.progress_percentage(), 100.0);

        assert!(service
            .contribute(goal.id, Money::from_cents(-5))
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_update_and_delete() {
        let (_temp_dir, storage) = create_test_storage();
        let service = GoalService::new(&storage);
        let goal = service.create(input("Car", 1_000_000)).unwrap();

        let updated = service
            .update(
                goal.id,
                UpdateGoalInput {
                    current_amount: Some(Money::from_cents(250_000)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.progress_percentage(), 25.0);
        assert_eq!(updated.name, "Car");

        service.delete(goal.id).unwrap();
        assert!(service.get(goal.id).unwrap_err().is_not_found());
    }
}
