//! Monthly income/expense trend over the trailing six months

use chrono::NaiveDate;

use crate::error::FinanceResult;
use crate::models::{MonthRange, Transaction};
use crate::storage::Storage;

use super::summary::PeriodTotals;

/// One bucket of the trend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendPoint {
    pub month: MonthRange,
    pub totals: PeriodTotals,
}

/// Six contiguous monthly buckets, oldest first
#[derive(Debug, Clone)]
pub struct TrendReport {
    pub points: Vec<TrendPoint>,
}

impl TrendReport {
    pub fn generate(storage: &Storage, today: NaiveDate) -> FinanceResult<Self> {
        let transactions = storage.transactions.get_all()?;
        Ok(Self::from_transactions(&transactions, today))
    }

    pub fn from_transactions(transactions: &[Transaction], today: NaiveDate) -> Self {
        let points = MonthRange::last_six_months(today)
            .into_iter()
            .map(|month| TrendPoint {
                month,
                totals: PeriodTotals::for_month(transactions, month),
            })
            .collect();
        Self { points }
    }

    /// Sum over every bucket
    pub fn totals(&self) -> PeriodTotals {
        self.points.iter().fold(PeriodTotals::default(), |mut acc, p| {
            acc.income += p.totals.income;
            acc.expenses += p.totals.expenses;
            acc.transaction_count += p.totals.transaction_count;
            acc
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let mut output = String::new();

        output.push_str("Monthly Trend (last 6 months)\n");
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:<10} {:>14} {:>14} {:>14}\n",
            "Month", "Income", "Expenses", "Net"
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        for point in &self.points {
            output.push_str(&format!(
                "{:<10} {:>14} {:>14} {:>14}\n",
                point.month.short_label(),
                point.totals.income.format_with_symbol(currency_symbol),
                point.totals.expenses.format_with_symbol(currency_symbol),
                point.totals.net().format_with_symbol(currency_symbol)
            ));
        }

        output
    }
}
