//! Service layer for fintrack
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, category resolution, audit logging, and the
//! derived values (budget spending, alerts) that are never stored.

pub mod alert;
pub mod budget;
pub mod category;
pub mod goal;
pub mod import;
pub mod transaction;

pub use alert::{evaluate_alerts, evaluate_budget, AlertPolicy, AlertService};
pub use budget::{category_spend, BudgetOverview, BudgetService, CreateBudgetInput, UpdateBudgetInput};
pub use category::{CategoryService, CreateCategoryInput, UpdateCategoryInput};
pub use goal::{CreateGoalInput, GoalService, UpdateGoalInput};
pub use import::{ImportResult, ImportService, ImportTable};
pub use transaction::{
    CreateTransactionInput, TransactionFilter, TransactionService, UpdateTransactionInput,
};
