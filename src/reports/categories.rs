//! Expense breakdown by category

use std::collections::HashMap;

use crate::error::FinanceResult;
use crate::models::{Money, Transaction, TransactionKind};
use crate::storage::Storage;

/// One category's share of total expenses
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub amount: Money,
    pub transaction_count: usize,
    /// Percentage of total expenses
    pub percentage: f64,
}

/// Expenses grouped by category, largest first
#[derive(Debug, Clone)]
pub struct CategoryBreakdown {
    pub rows: Vec<CategoryShare>,
    pub total: Money,
}

impl CategoryBreakdown {
    pub fn generate(storage: &Storage) -> FinanceResult<Self> {
        let transactions = storage.transactions.get_all()?;
        Ok(Self::from_transactions(&transactions))
    }

    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        // Keyed case-insensitively; the first spelling seen is displayed
        let mut by_category: HashMap<String, (String, Money, usize)> = HashMap::new();
        let mut total = Money::zero();

        for txn in transactions.iter().filter(|t| t.kind == TransactionKind::Expense) {
            let amount = txn.amount.abs();
            let entry = by_category
                .entry(txn.category.to_lowercase())
                .or_insert_with(|| (txn.category.clone(), Money::zero(), 0));
            entry.1 += amount;
            entry.2 += 1;
            total += amount;
        }

        let mut rows: Vec<CategoryShare> = by_category
            .into_values()
            .map(|(category, amount, transaction_count)| CategoryShare {
                percentage: amount.percentage_of(total).unwrap_or(0.0),
                category,
                amount,
                transaction_count,
            })
            .collect();

        rows.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));

        Self { rows, total }
    }

    /// The `limit` largest categories
    pub fn top(&self, limit: usize) -> &[CategoryShare] {
        &self.rows[..limit.min(self.rows.len())]
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let mut output = String::new();

        output.push_str("Expenses by Category\n");
        output.push_str(&"=".repeat(60));
        output.push('\n');

        if self.rows.is_empty() {
            output.push_str("No expenses recorded.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<25} {:>14} {:>8} {:>8}\n",
            "Category", "Amount", "Count", "%"
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!(
                "{:<25} {:>14} {:>8} {:>7.1}%\n",
                row.category,
                row.amount.format_with_symbol(currency_symbol),
                row.transaction_count,
                row.percentage
            ));
        }

        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:<25} {:>14}\n",
            "TOTAL",
            self.total.format_with_symbol(currency_symbol)
        ));

        output
    }
}
