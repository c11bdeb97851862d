//! Dashboard Report
//!
//! Current-month income, expenses and balance compared with the previous
//! month, plus the most recent transactions.

use chrono::NaiveDate;

use crate::error::FinanceResult;
use crate::models::{MonthRange, Transaction};
use crate::storage::Storage;

use super::summary::{money_change, PeriodTotals};

/// Dashboard figures for one reference month
#[derive(Debug, Clone)]
pub struct DashboardReport {
    pub month: MonthRange,
    pub current: PeriodTotals,
    pub previous: PeriodTotals,
    pub income_change: f64,
    pub expense_change: f64,
    pub balance_change: f64,
    /// Newest first
    pub recent: Vec<Transaction>,
}

impl DashboardReport {
    /// Generate the dashboard for the month containing `today`
    pub fn generate(storage: &Storage, today: NaiveDate, recent_count: usize) -> FinanceResult<Self> {
        let transactions = storage.transactions.get_all()?;
        Ok(Self::from_transactions(&transactions, today, recent_count))
    }

    /// Build the dashboard from an in-memory transaction list
    pub fn from_transactions(transactions: &[Transaction], today: NaiveDate, recent_count: usize) -> Self {
        let month = MonthRange::for_date(today);
        let current = PeriodTotals::for_month(transactions, month);
        let previous = PeriodTotals::for_month(transactions, month.prev());

        let mut recent = transactions.to_vec();
        recent.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        recent.truncate(recent_count);

        Self {
            month,
            income_change: money_change(current.income, previous.income),
            expense_change: money_change(current.expenses, previous.expenses),
            balance_change: money_change(current.net(), previous.net()),
            current,
            previous,
            recent,
        }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("Dashboard: {}\n", self.month.long_label()));
        output.push_str(&"=".repeat(60));
        output.push('\n');

        let rows = [
            ("Income", self.current.income, self.income_change),
            ("Expenses", self.current.expenses, self.expense_change),
            ("Balance", self.current.net(), self.balance_change),
        ];
        for (label, amount, change) in rows {
            output.push_str(&format!(
                "{:<12} {:>14}   {:>+7.1}% vs {}\n",
                label,
                amount.format_with_symbol(currency_symbol),
                change,
                self.month.prev().short_label()
            ));
        }

        output.push('\n');
        if self.recent.is_empty() {
            output.push_str("No transactions yet.\n");
        } else {
            output.push_str("Recent transactions:\n");
            for txn in &self.recent {
                output.push_str(&format!(
                    "  {}  {:<16} {:>12}  {}\n",
                    txn.date,
                    txn.category,
                    txn.signed_amount().format_with_symbol(currency_symbol),
                    txn.description
                ));
            }
        }

        output
    }
}
