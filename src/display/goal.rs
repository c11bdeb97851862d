//! Goal display formatting

use chrono::NaiveDate;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::config::Settings;
use crate::models::Goal;

use super::format_percentage;

#[derive(Tabled)]
struct GoalRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Saved")]
    saved: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Deadline")]
    deadline: String,
}

fn deadline_note(goal: &Goal, today: NaiveDate) -> String {
    if goal.is_completed() {
        return "completed".to_string();
    }
    match goal.days_remaining(today) {
        d if d < 0 => format!("{} days overdue", -d),
        0 => "due today".to_string(),
        1 => "1 day left".to_string(),
        d => format!("{} days left", d),
    }
}

pub fn format_goal_table(goals: &[Goal], today: NaiveDate, settings: &Settings) -> String {
    if goals.is_empty() {
        return "No goals found.".to_string();
    }

    let rows = goals.iter().map(|g| GoalRow {
        id: g.id.to_string(),
        name: g.name.clone(),
        saved: g.current_amount.format_with_symbol(&settings.currency_symbol),
        target: g.target_amount.format_with_symbol(&settings.currency_symbol),
        progress: format_percentage(g.progress_percentage()),
        deadline: format!(
            "{} ({})",
            g.deadline.format(&settings.date_format),
            deadline_note(g, today)
        ),
    });

    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn format_goal_details(goal: &Goal, today: NaiveDate, settings: &Settings) -> String {
    let mut output = String::new();

    output.push_str(&format!("Goal:      {}\n", goal.id));
    output.push_str(&format!("Name:      {}\n", goal.name));
    output.push_str(&format!(
        "Saved:     {} of {}\n",
        goal.current_amount.format_with_symbol(&settings.currency_symbol),
        goal.target_amount.format_with_symbol(&settings.currency_symbol)
    ));
    output.push_str(&format!(
        "Remaining: {}\n",
        goal.remaining().format_with_symbol(&settings.currency_symbol)
    ));
    output.push_str(&format!(
        "Progress:  {}\n",
        format_percentage(goal.progress_percentage())
    ));
    output.push_str(&format!(
        "Deadline:  {} ({})\n",
        goal.deadline.format(&settings.date_format),
        deadline_note(goal, today)
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    fn goal() -> Goal {
        let mut goal = Goal::new(
            "Vacation",
            Money::from_cents(200_000),
            NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
        );
        goal.contribute(Money::from_cents(50_000));
        goal
    }

    #[test]
    fn test_deadline_note() {
        let goal = goal();
        assert_eq!(
            deadline_note(&goal, NaiveDate::from_ymd_opt(2025, 6, 20).unwrap()),
            "10 days left"
        );
        assert_eq!(
            deadline_note(&goal, NaiveDate::from_ymd_opt(2025, 7, 2).unwrap()),
            "2 days overdue"
        );
    }

    #[test]
    fn test_goal_output() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 29).unwrap();
        let table = format_goal_table(&[goal()], today, &Settings::default());
        assert!(table.contains("25.0%"));
        assert!(table.contains("1 day left"));

        let details = format_goal_details(&goal(), today, &Settings::default());
        assert!(details.contains("Saved:     $500.00 of $2,000.00"));
        assert!(details.contains("Remaining: $1,500.00"));
    }
}
