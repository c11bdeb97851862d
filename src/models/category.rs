//! Category model
//!
//! Categories label transactions and budgets. Each one belongs to exactly one
//! side of the ledger, so an expense can never be filed under "Salary".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;
use super::transaction::TransactionKind;

/// A named income or expense category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Category name (unique, case-insensitive)
    pub name: String,

    /// Which kind of transaction this category applies to
    pub kind: TransactionKind,

    /// Display icon name
    #[serde(default)]
    pub icon: String,

    /// Display color (hex)
    #[serde(default)]
    pub color: String,

    /// When the category was created
    pub created_at: DateTime<Utc>,

    /// When the category was last modified
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a new category
    pub fn new(name: impl Into<String>, kind: TransactionKind) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            name: name.into(),
            kind,
            icon: String::new(),
            color: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a category with display attributes
    pub fn with_style(
        name: impl Into<String>,
        kind: TransactionKind,
        icon: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        let mut category = Self::new(name, kind);
        category.icon = icon.into();
        category.color = color.into();
        category
    }

    /// Case-insensitive name comparison
    pub fn has_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if self.name.len() > 50 {
            return Err(CategoryValidationError::NameTooLong(self.name.len()));
        }

        if !self.color.is_empty() && !is_hex_color(&self.color) {
            return Err(CategoryValidationError::InvalidColor(self.color.clone()));
        }

        Ok(())
    }
}

fn is_hex_color(s: &str) -> bool {
    match s.strip_prefix('#') {
        Some(hex) => matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Categories seeded into a fresh data directory: (name, kind, icon, color)
const DEFAULT_CATEGORIES: &[(&str, TransactionKind, &str, &str)] = &[
    ("Salary", TransactionKind::Income, "Briefcase", "#10b981"),
    ("Freelance", TransactionKind::Income, "Laptop", "#3b82f6"),
    ("Investments", TransactionKind::Income, "TrendingUp", "#8b5cf6"),
    ("Food", TransactionKind::Expense, "UtensilsCrossed", "#f59e0b"),
    ("Transportation", TransactionKind::Expense, "Car", "#6366f1"),
    ("Housing", TransactionKind::Expense, "Home", "#ef4444"),
    ("Utilities", TransactionKind::Expense, "Zap", "#14b8a6"),
    ("Entertainment", TransactionKind::Expense, "Film", "#ec4899"),
    ("Healthcare", TransactionKind::Expense, "Heart", "#f43f5e"),
    ("Shopping", TransactionKind::Expense, "ShoppingBag", "#a855f7"),
];

/// Build the default category set
pub fn default_categories() -> Vec<Category> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|(name, kind, icon, color)| Category::with_style(*name, *kind, *icon, *color))
        .collect()
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidColor(String),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 50)", len)
            }
            Self::InvalidColor(c) => write!(f, "Invalid color '{}': expected #rgb or #rrggbb", c),
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category() {
        let category = Category::new("Groceries", TransactionKind::Expense);
        assert_eq!(category.name, "Groceries");
        assert!(category.icon.is_empty());
        assert!(category.validate().is_ok());
    }

    #[test]
    fn test_has_name_case_insensitive() {
        let category = Category::new("Food", TransactionKind::Expense);
        assert!(category.has_name("food"));
        assert!(category.has_name(" FOOD "));
        assert!(!category.has_name("Foods"));
    }

    #[test]
    fn test_validation() {
        let category = Category::new("", TransactionKind::Expense);
        assert_eq!(category.validate(), Err(CategoryValidationError::EmptyName));

        let category = Category::new("a".repeat(51), TransactionKind::Expense);
        assert_eq!(category.validate(), Err(CategoryValidationError::NameTooLong(51)));

        let category = Category::with_style("Pets", TransactionKind::Expense, "Dog", "orange");
        assert!(matches!(
            category.validate(),
            Err(CategoryValidationError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_default_categories() {
        let defaults = default_categories();
        assert_eq!(defaults.len(), 10);

        let income: Vec<&str> = defaults
            .iter()
            .filter(|c| c.kind == TransactionKind::Income)
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(income, vec!["Salary", "Freelance", "Investments"]);
        assert!(defaults.iter().all(|c| c.validate().is_ok()));
    }
}
