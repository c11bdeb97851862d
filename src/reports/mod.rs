//! Reports module for fintrack
//!
//! Aggregations over transactions: period totals and percentage changes,
//! the dashboard, the six-month trend, the category breakdown, and the
//! overall analytics built from them.

pub mod analytics;
pub mod categories;
pub mod dashboard;
pub mod summary;
pub mod trend;

pub use analytics::{AnalyticsReport, FinancialStats};
pub use categories::{CategoryBreakdown, CategoryShare};
pub use dashboard::DashboardReport;
pub use summary::{money_change, percentage_change, PeriodTotals};
pub use trend::{TrendPoint, TrendReport};
