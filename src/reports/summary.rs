//! Income and expense totals per period

use crate::models::{Money, MonthRange, Transaction, TransactionKind};

/// Income, expenses and net for a set of transactions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodTotals {
    pub income: Money,
    /// Sum of absolute expense amounts
    pub expenses: Money,
    pub transaction_count: usize,
}

impl PeriodTotals {
    /// Totals over every transaction given
    pub fn from_transactions<'t>(transactions: impl IntoIterator<Item = &'t Transaction>) -> Self {
        transactions
            .into_iter()
            .fold(Self::default(), |mut totals, txn| {
                match txn.kind {
                    TransactionKind::Income => totals.income += txn.amount,
                    TransactionKind::Expense => totals.expenses += txn.amount.abs(),
                }
                totals.transaction_count += 1;
                totals
            })
    }

    /// Totals over the transactions dated inside `month` (inclusive bounds)
    pub fn for_month(transactions: &[Transaction], month: MonthRange) -> Self {
        Self::from_transactions(transactions.iter().filter(|t| month.contains(t.date)))
    }

    /// Income minus expenses
    pub fn net(&self) -> Money {
        self.income - self.expenses
    }
}

/// Relative change from `previous` to `current`, in percent
///
/// A zero baseline gives 100 for growth and 0 otherwise.
pub fn percentage_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return if current > 0.0 { 100.0 } else { 0.0 };
    }
    (current - previous) / previous * 100.0
}

/// [`percentage_change`] over money amounts
pub fn money_change(current: Money, previous: Money) -> f64 {
    percentage_change(current.to_f64(), previous.to_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn txn(kind: TransactionKind, cents: i64, date: (i32, u32, u32)) -> Transaction {
        Transaction::new(
            kind,
            Money::from_cents(cents),
            "Food",
            "test",
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        )
    }

    #[test]
    fn test_percentage_change() {
        assert_eq!(percentage_change(0.0, 0.0), 0.0);
        assert_eq!(percentage_change(25.0, 0.0), 100.0);
        assert_eq!(percentage_change(-25.0, 0.0), 0.0);
        assert_eq!(percentage_change(50.0, 100.0), -50.0);
        assert_eq!(percentage_change(150.0, 100.0), 50.0);
    }

    #[test]
    fn test_money_change() {
        assert_eq!(
            money_change(Money::from_cents(30_000), Money::from_cents(20_000)),
            50.0
        );
    }

    #[test]
    fn test_totals() {
        let transactions = vec![
            txn(TransactionKind::Income, 300_000, (2025, 1, 1)),
            txn(TransactionKind::Expense, 5_000, (2025, 1, 10)),
            txn(TransactionKind::Expense, 2_500, (2025, 1, 31)),
        ];

        let totals = PeriodTotals::from_transactions(&transactions);
        assert_eq!(totals.income.cents(), 300_000);
        assert_eq!(totals.expenses.cents(), 7_500);
        assert_eq!(totals.net().cents(), 292_500);
        assert_eq!(totals.transaction_count, 3);
    }

    #[test]
    fn test_month_bounds_inclusive() {
        let transactions = vec![
            txn(TransactionKind::Expense, 100, (2024, 12, 31)),
            txn(TransactionKind::Expense, 200, (2025, 1, 1)),
            txn(TransactionKind::Expense, 400, (2025, 1, 31)),
            txn(TransactionKind::Expense, 800, (2025, 2, 1)),
        ];

        let january = MonthRange::new(2025, 1).unwrap();
        let totals = PeriodTotals::for_month(&transactions, january);
        assert_eq!(totals.expenses.cents(), 600);
        assert_eq!(totals.transaction_count, 2);
    }
}
