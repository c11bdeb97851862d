//! Category display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Category;

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Icon")]
    icon: String,
    #[tabled(rename = "Color")]
    color: String,
}

pub fn format_category_table(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'fintrack init' to create default categories."
            .to_string();
    }

    let rows = categories.iter().map(|c| CategoryRow {
        name: c.name.clone(),
        kind: c.kind.to_string(),
        icon: c.icon.clone(),
        color: c.color.clone(),
    });

    Table::new(rows).with(Style::rounded()).to_string()
}
