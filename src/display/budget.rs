//! Budget display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::config::Settings;
use crate::models::{AlertSettings, BudgetSummary};
use crate::services::BudgetOverview;

use super::format_percentage;

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Limit")]
    limit: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Used")]
    used: String,
    #[tabled(rename = "Status")]
    status: String,
}

fn usage(summary: &BudgetSummary) -> String {
    summary
        .percentage
        .map(format_percentage)
        .unwrap_or_else(|| "n/a".to_string())
}

/// Render every budget with its derived spending and a totals line
pub fn format_budget_overview(overview: &BudgetOverview, settings: &Settings) -> String {
    if overview.budgets.is_empty() {
        return "No budgets found.".to_string();
    }

    let rows = overview.budgets.iter().map(|s| BudgetRow {
        id: s.budget.id.to_string(),
        category: s.budget.category.clone(),
        period: s.budget.period.clone(),
        limit: s.budget.monthly_limit.format_with_symbol(&settings.currency_symbol),
        spent: s.spent.format_with_symbol(&settings.currency_symbol),
        remaining: s.remaining.format_with_symbol(&settings.currency_symbol),
        used: usage(s),
        status: s.status.to_string(),
    });

    let mut output = String::new();
    if let Some(window) = overview.window {
        output.push_str(&format!("Spending in {}\n", window.long_label()));
    }
    output.push_str(&Table::new(rows).with(Style::rounded()).to_string());
    output.push('\n');
    output.push_str(&format!(
        "Total: {} of {} spent, {} remaining",
        overview.total_spent.format_with_symbol(&settings.currency_symbol),
        overview.total_limit.format_with_symbol(&settings.currency_symbol),
        overview.total_remaining().format_with_symbol(&settings.currency_symbol)
    ));

    let over = overview.over_budget().count();
    if over > 0 {
        output.push_str(&format!("\n{} budget(s) over limit", over));
    }

    output
}

/// Format one budget with its spending and effective alert settings
pub fn format_budget_details(
    summary: &BudgetSummary,
    alerts: &AlertSettings,
    settings: &Settings,
) -> String {
    let budget = &summary.budget;
    let mut output = String::new();

    output.push_str(&format!("Budget:    {}\n", budget.id));
    output.push_str(&format!("Category:  {}\n", budget.category));
    output.push_str(&format!("Period:    {}\n", budget.period));
    output.push_str(&format!(
        "Limit:     {}\n",
        budget.monthly_limit.format_with_symbol(&settings.currency_symbol)
    ));
    output.push_str(&format!(
        "Spent:     {}\n",
        summary.spent.format_with_symbol(&settings.currency_symbol)
    ));
    output.push_str(&format!(
        "Remaining: {}\n",
        summary.remaining.format_with_symbol(&settings.currency_symbol)
    ));
    output.push_str(&format!("Used:      {}\n", usage(summary)));
    output.push_str(&format!("Status:    {}\n", summary.status));
    output.push_str(&format!("Alerts:    {}\n", alerts));

    output
}
