//! Budget model
//!
//! A budget caps monthly spending for one expense category. What has been
//! spent against it is never stored; it is derived from transactions each
//! time it is needed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::BudgetId;
use super::money::Money;

/// A monthly spending limit for a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// Unique identifier
    pub id: BudgetId,

    /// Expense category name this budget covers
    pub category: String,

    /// Maximum spend per month
    pub monthly_limit: Money,

    /// Human-readable period label, e.g. "October 2026"
    #[serde(default)]
    pub period: String,

    /// When the budget was created
    pub created_at: DateTime<Utc>,

    /// When the budget was last modified
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    /// Create a new budget
    pub fn new(category: impl Into<String>, monthly_limit: Money, period: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: BudgetId::new(),
            category: category.into(),
            monthly_limit,
            period: period.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate the budget
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.category.trim().is_empty() {
            return Err(BudgetValidationError::MissingCategory);
        }

        if !self.monthly_limit.is_positive() {
            return Err(BudgetValidationError::NonPositiveLimit(self.monthly_limit));
        }

        Ok(())
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} / month", self.category, self.monthly_limit)
    }
}

/// Where a budget's spending stands relative to its limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    OnTrack,
    NearLimit,
    OverBudget,
}

impl BudgetStatus {
    /// Usage at or above this percentage counts as near the limit
    pub const NEAR_LIMIT_PERCENT: f64 = 80.0;

    /// Classify a usage percentage. `None` means the limit is zero.
    pub fn from_percentage(percentage: Option<f64>) -> Self {
        match percentage {
            None => Self::OverBudget,
            Some(p) if p > 100.0 => Self::OverBudget,
            Some(p) if p >= Self::NEAR_LIMIT_PERCENT => Self::NearLimit,
            Some(_) => Self::OnTrack,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::OnTrack => "on track",
            Self::NearLimit => "near limit",
            Self::OverBudget => "over budget",
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// A budget together with the spending derived for it
#[derive(Debug, Clone)]
pub struct BudgetSummary {
    pub budget: Budget,

    /// Sum of matching expenses
    pub spent: Money,

    /// Limit minus spent (negative when overspent)
    pub remaining: Money,

    /// Spent as a percentage of the limit; `None` for a zero limit
    pub percentage: Option<f64>,

    pub status: BudgetStatus,
}

impl BudgetSummary {
    pub fn new(budget: Budget, spent: Money) -> Self {
        let percentage = spent.percentage_of(budget.monthly_limit);
        Self {
            remaining: budget.monthly_limit - spent,
            status: BudgetStatus::from_percentage(percentage),
            percentage,
            spent,
            budget,
        }
    }

    pub fn is_over_budget(&self) -> bool {
        self.status == BudgetStatus::OverBudget
    }
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    MissingCategory,
    NonPositiveLimit(Money),
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCategory => write!(f, "Category is required"),
            Self::NonPositiveLimit(limit) => {
                write!(f, "Monthly limit must be greater than 0 (got {})", limit)
            }
        }
    }
}

impl std::error::Error for BudgetValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_budget() {
        let budget = Budget::new("Food", Money::from_cents(20_000), "January 2025");
        assert_eq!(budget.category, "Food");
        assert!(budget.validate().is_ok());
        assert_eq!(budget.to_string(), "Food: $200.00 / month");
    }

    #[test]
    fn test_validation() {
        let budget = Budget::new("Food", Money::zero(), "January 2025");
        assert_eq!(
            budget.validate(),
            Err(BudgetValidationError::NonPositiveLimit(Money::zero()))
        );

        let budget = Budget::new(" ", Money::from_cents(100), "January 2025");
        assert_eq!(budget.validate(), Err(BudgetValidationError::MissingCategory));
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(BudgetStatus::from_percentage(Some(79.9)), BudgetStatus::OnTrack);
        assert_eq!(BudgetStatus::from_percentage(Some(80.0)), BudgetStatus::NearLimit);
        assert_eq!(BudgetStatus::from_percentage(Some(100.0)), BudgetStatus::NearLimit);
        assert_eq!(BudgetStatus::from_percentage(Some(100.5)), BudgetStatus::OverBudget);
        assert_eq!(BudgetStatus::from_percentage(None), BudgetStatus::OverBudget);
    }

    #[test]
    fn test_summary() {
        let budget = Budget::new("Food", Money::from_cents(20_000), "January 2025");
        let summary = BudgetSummary::new(budget, Money::from_cents(17_000));
        assert_eq!(summary.remaining.cents(), 3_000);
        assert_eq!(summary.percentage, Some(85.0));
        assert_eq!(summary.status, BudgetStatus::NearLimit);

        let budget = Budget::new("Food", Money::from_cents(10_000), "January 2025");
        let summary = BudgetSummary::new(budget, Money::from_cents(12_500));
        assert_eq!(summary.remaining.cents(), -2_500);
        assert!(summary.is_over_budget());
    }

    #[test]
    fn test_serialization() {
        let budget = Budget::new("Food", Money::from_cents(20_000), "January 2025");
        let json = serde_json::to_string(&budget).unwrap();
        let back: Budget = serde_json::from_str(&json).unwrap();
        assert_eq!(budget, back);
    }
}
