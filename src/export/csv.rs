//! CSV Export functionality
//!
//! Two CSV shapes: the sectioned financial report (summary, monthly trend,
//! category breakdown) and a flat transaction listing.

use std::io::Write;

use chrono::NaiveDate;

use crate::error::{FinanceError, FinanceResult};
use crate::models::Money;
use crate::reports::AnalyticsReport;
use crate::storage::Storage;

/// File name used for the report when no path is given
pub fn report_file_name(date: NaiveDate) -> String {
    format!("financial-report-{}.csv", date.format("%Y-%m-%d"))
}

/// Write the financial report
///
/// Refuses to write anything when there are no transactions.
pub fn export_report_csv<W: Write>(
    report: &AnalyticsReport,
    currency_symbol: &str,
    writer: &mut W,
) -> FinanceResult<()> {
    if report.is_empty() {
        return Err(FinanceError::Export(
            "No transactions to include in the report".into(),
        ));
    }

    let money = |m: Money| m.format_with_symbol(currency_symbol);
    let stats = &report.stats;

    // Sections have different widths
    let mut out = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(writer);

    out.write_record(["Financial Analytics Report"])
        .map_err(export_error)?;
    out.write_record([format!("Generated on: {}", report.generated_on)])
        .map_err(export_error)?;
    blank_line(&mut out)?;

    out.write_record(["FINANCIAL SUMMARY"])
        .map_err(export_error)?;
    out.write_record(["Category", "Amount"])
        .map_err(export_error)?;
    let summary = [
        ("Total Income", money(stats.total_income)),
        ("Total Expenses", money(stats.total_expenses)),
        ("Net Income", money(stats.net_income)),
        ("Average Monthly Income", money(stats.average_monthly_income)),
        ("Average Monthly Expenses", money(stats.average_monthly_expenses)),
        ("Savings Rate", format!("{:.1}%", stats.savings_rate)),
    ];
    for (label, value) in summary {
        out.write_record([label.to_string(), value])
            .map_err(export_error)?;
    }
    blank_line(&mut out)?;

    out.write_record(["MONTHLY TREND"]).map_err(export_error)?;
    out.write_record(["Month", "Income", "Expenses", "Net"])
        .map_err(export_error)?;
    for point in &report.trend.points {
        out.write_record([
            point.month.long_label(),
            money(point.totals.income),
            money(point.totals.expenses),
            money(point.totals.net()),
        ])
        .map_err(export_error)?;
    }
    blank_line(&mut out)?;

    out.write_record(["EXPENSES BY CATEGORY"])
        .map_err(export_error)?;
    out.write_record(["Category", "Amount", "Percentage"])
        .map_err(export_error)?;
    for row in &report.categories.rows {
        out.write_record([
            row.category.clone(),
            money(row.amount),
            format!("{:.1}%", row.percentage),
        ])
        .map_err(export_error)?;
    }

    out.flush().map_err(export_error)?;
    Ok(())
}

/// End the current section with an empty line
///
/// A zero-field record would be written as `""`, so the newline goes to the
/// underlying writer directly.
fn blank_line<W: Write>(out: &mut csv::Writer<W>) -> FinanceResult<()> {
    out.flush().map_err(export_error)?;
    out.get_mut().write_all(b"\n").map_err(export_error)
}

fn export_error(e: impl std::fmt::Display) -> FinanceError {
    FinanceError::Export(e.to_string())
}

/// Export all transactions, newest first
pub fn export_transactions_csv<W: Write>(storage: &Storage, writer: W) -> FinanceResult<usize> {
    let transactions = storage.transactions.get_all()?;
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(["ID", "Date", "Type", "Category", "Description", "Amount"])
        .map_err(|e| FinanceError::Export(e.to_string()))?;

    for txn in &transactions {
        csv_writer
            .write_record([
                txn.id.as_uuid().to_string(),
                txn.date.to_string(),
                txn.kind.to_string(),
                txn.category.clone(),
                txn.description.clone(),
                format!("{:.2}", txn.amount.to_f64()),
            ])
            .map_err(|e| FinanceError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| FinanceError::Export(e.to_string()))?;

    Ok(transactions.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FintrackPaths;
    use crate::models::{Transaction, TransactionKind};
    use tempfile::TempDir;

    fn transactions() -> Vec<Transaction> {
        vec![
            Transaction::new(
                TransactionKind::Income,
                Money::from_cents(600_000),
                "Salary",
                "January pay",
                NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            ),
            Transaction::new(
                TransactionKind::Expense,
                Money::from_cents(4_550),
                "Food",
                "Dinner, drinks",
                NaiveDate::from_ymd_opt(2025, 1, 12).unwrap(),
            ),
        ]
    }

    #[test]
    fn test_report_file_name() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(report_file_name(date), "financial-report-2025-03-09.csv");
    }

    #[test]
    fn test_report_layout() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let report = AnalyticsReport::from_transactions(&transactions(), today);

        let mut output = Vec::new();
        export_report_csv(&report, "$", &mut output).unwrap();
        let csv = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Financial Analytics Report");
        assert_eq!(lines[1], "Generated on: 2025-01-31");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "FINANCIAL SUMMARY");
        assert_eq!(lines[4], "Category,Amount");
        assert_eq!(lines[5], "Total Income,\"$6,000.00\"");
        assert_eq!(lines[6], "Total Expenses,$45.50");
        assert!(csv.contains("Savings Rate,99.2%"));
        assert!(csv.contains("January 2025,\"$6,000.00\",$45.50,\"$5,954.50\""));
        assert!(csv.contains("Food,$45.50,100.0%"));
    }

    #[test]
    fn test_report_quotes_awkward_category_names() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let txns = vec![Transaction::new(
            TransactionKind::Expense,
            Money::from_cents(1_000),
            "Kids, \"School\"",
            "Books",
            NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
        )];
        let report = AnalyticsReport::from_transactions(&txns, today);

        let mut output = Vec::new();
        export_report_csv(&report, "$", &mut output).unwrap();
        let csv = String::from_utf8(output).unwrap();

        assert!(csv.contains("\"Kids, \"\"School\"\"\",$10.00,100.0%"));
        assert!(!csv.contains("\"\"\n"));
    }

    #[test]
    fn test_report_refuses_without_transactions() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let report = AnalyticsReport::from_transactions(&[], today);

        let mut output = Vec::new();
        let err = export_report_csv(&report, "$", &mut output).unwrap_err();
        assert!(matches!(err, FinanceError::Export(_)));
        assert!(output.is_empty());
    }

    #[test]
    fn test_export_transactions() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        for txn in transactions() {
            storage.transactions.upsert(txn).unwrap();
        }

        let mut output = Vec::new();
        let count = export_transactions_csv(&storage, &mut output).unwrap();
        assert_eq!(count, 2);

        let csv = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "ID,Date,Type,Category,Description,Amount");
        assert!(lines[1].contains(",2025-01-12,expense,Food,\"Dinner, drinks\",45.50"));
        assert!(lines[2].ends_with(",2025-01-01,income,Salary,January pay,6000.00"));
    }
}
