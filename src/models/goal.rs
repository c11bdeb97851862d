//! Savings goal model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::GoalId;
use super::money::Money;

/// A savings target with a deadline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub name: String,
    pub target_amount: Money,

    /// Amount saved so far
    #[serde(default)]
    pub current_amount: Money,

    pub deadline: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    /// Create a new goal with nothing saved yet
    pub fn new(name: impl Into<String>, target_amount: Money, deadline: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: GoalId::new(),
            name: name.into(),
            target_amount,
            current_amount: Money::zero(),
            deadline,
            created_at: now,
            updated_at: now,
        }
    }

    /// Progress toward the target, capped at 100
    pub fn progress_percentage(&self) -> f64 {
        match self.current_amount.percentage_of(self.target_amount) {
            Some(p) => p.clamp(0.0, 100.0),
            None => 100.0,
        }
    }

    /// Amount still needed; zero once the target is reached
    pub fn remaining(&self) -> Money {
        let remaining = self.target_amount - self.current_amount;
        if remaining.is_negative() {
            Money::zero()
        } else {
            remaining
        }
    }

    pub fn is_completed(&self) -> bool {
        self.current_amount >= self.target_amount
    }

    /// Days from `today` until the deadline; negative once it has passed
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        (self.deadline - today).num_days()
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_completed() && self.deadline < today
    }

    /// Add money to the goal
    pub fn contribute(&mut self, amount: Money) {
        self.current_amount += amount;
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.name.trim().is_empty() {
            return Err(GoalValidationError::EmptyName);
        }

        if !self.target_amount.is_positive() {
            return Err(GoalValidationError::NonPositiveTarget(self.target_amount));
        }

        if self.current_amount.is_negative() {
            return Err(GoalValidationError::NegativeCurrent(self.current_amount));
        }

        Ok(())
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} of {} by {}",
            self.name, self.current_amount, self.target_amount, self.deadline
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalValidationError {
    EmptyName,
    NonPositiveTarget(Money),
    NegativeCurrent(Money),
}

impl fmt::Display for GoalValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Goal name cannot be empty"),
            Self::NonPositiveTarget(m) => {
                write!(f, "Target amount must be greater than 0 (got {})", m)
            }
            Self::NegativeCurrent(m) => {
                write!(f, "Current amount cannot be negative (got {})", m)
            }
        }
    }
}

impl std::error::Error for GoalValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn deadline() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()
    }

    #[test]
    fn test_progress() {
        let mut goal = Goal::new("Emergency fund", Money::from_cents(100_000), deadline());
        assert_eq!(goal.progress_percentage(), 0.0);
        assert_eq!(goal.remaining().cents(), 100_000);

        goal.contribute(Money::from_cents(25_000));
        assert_eq!(goal.progress_percentage(), 25.0);
        assert_eq!(goal.remaining().cents(), 75_000);
        assert!(!goal.is_completed());
    }

    #[test]
    fn test_progress_capped() {
        let mut goal = Goal::new("Laptop", Money::from_cents(10_000), deadline());
        goal.contribute(Money::from_cents(15_000));
        assert_eq!(goal.progress_percentage(), 100.0);
        assert_eq!(goal.remaining(), Money::zero());
        assert!(goal.is_completed());
    }

    #[test]
    fn test_days_remaining() {
        let goal = Goal::new("Trip", Money::from_cents(10_000), deadline());
        let today = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        assert_eq!(goal.days_remaining(today), 30);
        assert!(!goal.is_overdue(today));

        let later = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        assert_eq!(goal.days_remaining(later), -2);
        assert!(goal.is_overdue(later));
    }

    #[test]
    fn test_validation() {
        let goal = Goal::new("", Money::from_cents(100), deadline());
        assert_eq!(goal.validate(), Err(GoalValidationError::EmptyName));

        let goal = Goal::new("Car", Money::zero(), deadline());
        assert!(matches!(
            goal.validate(),
            Err(GoalValidationError::NonPositiveTarget(_))
        ));
    }
}
