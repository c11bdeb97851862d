//! Core data models for fintrack
//!
//! This module contains the data structures of the personal finance domain:
//! transactions, categories, budgets, savings goals and budget alerts.

pub mod alert;
pub mod budget;
pub mod category;
pub mod goal;
pub mod ids;
pub mod money;
pub mod period;
pub mod transaction;

pub use alert::{Alert, AlertSettings, AlertSettingsUpdate, AlertSeverity};
pub use budget::{Budget, BudgetStatus, BudgetSummary};
pub use category::{default_categories, Category};
pub use goal::Goal;
pub use ids::{AlertId, BudgetId, CategoryId, GoalId, TransactionId};
pub use money::Money;
pub use period::MonthRange;
pub use transaction::{Transaction, TransactionKind};
