//! Display formatting for terminal output
//!
//! List views are rendered as tables with `tabled`; single records are
//! rendered as aligned key/value blocks.

pub mod alert;
pub mod budget;
pub mod category;
pub mod goal;
pub mod transaction;

pub use alert::{format_alert_settings, format_alert_table};
pub use budget::{format_budget_details, format_budget_overview};
pub use category::format_category_table;
pub use goal::{format_goal_details, format_goal_table};
pub use transaction::{format_transaction_details, format_transaction_table};

/// Percentage with one decimal place, e.g. `85.0%`
pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Shorten `s` to at most `max_len` characters, ending in `...` when cut
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return ".".repeat(max_len);
    }
    let kept: String = s.chars().take(max_len - 3).collect();
    format!("{}...", kept)
}
