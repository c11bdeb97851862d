//! Analytics Report
//!
//! Overall statistics together with the six-month trend and the category
//! breakdown. This is the data behind `report analytics` and the report CSV.

use chrono::NaiveDate;

use crate::error::FinanceResult;
use crate::models::{Money, Transaction};
use crate::storage::Storage;

use super::categories::CategoryBreakdown;
use super::summary::PeriodTotals;
use super::trend::TrendReport;

/// Number of months the averages are taken over
pub const AVERAGING_MONTHS: i64 = 6;

/// Whole-history figures
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinancialStats {
    pub total_income: Money,
    pub total_expenses: Money,
    pub net_income: Money,
    pub average_monthly_income: Money,
    pub average_monthly_expenses: Money,
    /// (income - expenses) / income * 100; zero without income
    pub savings_rate: f64,
    pub transaction_count: usize,
}

impl FinancialStats {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let totals = PeriodTotals::from_transactions(transactions);

        let savings_rate = if totals.income.is_positive() {
            (totals.income - totals.expenses).to_f64() / totals.income.to_f64() * 100.0
        } else {
            0.0
        };

        Self {
            total_income: totals.income,
            total_expenses: totals.expenses,
            net_income: totals.net(),
            average_monthly_income: average(totals.income),
            average_monthly_expenses: average(totals.expenses),
            savings_rate,
            transaction_count: totals.transaction_count,
        }
    }
}

fn average(total: Money) -> Money {
    Money::from_decimal(total.to_f64() / AVERAGING_MONTHS as f64)
}

/// Everything the analytics view shows
#[derive(Debug, Clone)]
pub struct AnalyticsReport {
    pub generated_on: NaiveDate,
    pub stats: FinancialStats,
    pub trend: TrendReport,
    pub categories: CategoryBreakdown,
}

impl AnalyticsReport {
    pub fn generate(storage: &Storage, today: NaiveDate) -> FinanceResult<Self> {
        let transactions = storage.transactions.get_all()?;
        Ok(Self::from_transactions(&transactions, today))
    }

    pub fn from_transactions(transactions: &[Transaction], today: NaiveDate) -> Self {
        Self {
            generated_on: today,
            stats: FinancialStats::from_transactions(transactions),
            trend: TrendReport::from_transactions(transactions, today),
            categories: CategoryBreakdown::from_transactions(transactions),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stats.transaction_count == 0
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let stats = &self.stats;
        let mut output = String::new();

        output.push_str(&format!("Financial Analytics ({})\n", self.generated_on));
        output.push_str(&"=".repeat(60));
        output.push('\n');

        let rows = [
            ("Total Income", stats.total_income),
            ("Total Expenses", stats.total_expenses),
            ("Net Income", stats.net_income),
            ("Average Monthly Income", stats.average_monthly_income),
            ("Average Monthly Expenses", stats.average_monthly_expenses),
        ];
        for (label, amount) in rows {
            output.push_str(&format!(
                "{:<28} {:>14}\n",
                label,
                amount.format_with_symbol(currency_symbol)
            ));
        }
        output.push_str(&format!("{:<28} {:>13.1}%\n", "Savings Rate", stats.savings_rate));
        output.push('\n');
        output.push_str(&self.trend.format_terminal(currency_symbol));
        output.push('\n');
        output.push_str(&self.categories.format_terminal(currency_symbol));

        output
    }
}
