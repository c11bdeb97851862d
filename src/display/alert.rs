//! Alert display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::config::Settings;
use crate::models::{Alert, AlertSettings};

use super::format_percentage;

#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Message")]
    message: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Limit")]
    limit: String,
    #[tabled(rename = "Used")]
    used: String,
    #[tabled(rename = "Threshold")]
    threshold: String,
}

pub fn format_alert_table(alerts: &[Alert], settings: &Settings) -> String {
    if alerts.is_empty() {
        return "No budget alerts.".to_string();
    }

    let rows = alerts.iter().map(|a| AlertRow {
        severity: a.severity.to_string().to_uppercase(),
        message: a.message.clone(),
        spent: a.spent.format_with_symbol(&settings.currency_symbol),
        limit: a.limit.format_with_symbol(&settings.currency_symbol),
        used: a
            .percentage
            .map(format_percentage)
            .unwrap_or_else(|| "no limit set".to_string()),
        threshold: format_percentage(a.threshold),
    });

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Describe a budget's effective settings and where they come from
pub fn format_alert_settings(category: &str, settings: &AlertSettings, is_override: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!("Alert settings for {}\n", category));
    output.push_str(&format!(
        "  Warning threshold: {}\n",
        format_percentage(settings.warning_threshold)
    ));
    output.push_str(&format!(
        "  Error threshold:   {}\n",
        format_percentage(settings.error_threshold)
    ));
    output.push_str(&format!(
        "  Enabled:           {}\n",
        if settings.enabled { "yes" } else { "no" }
    ));
    output.push_str(&format!(
        "  Source:            {}\n",
        if is_override { "budget override" } else { "global default" }
    ));

    output
}
