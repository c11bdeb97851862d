//! Budget repository for JSON storage
//!
//! Manages loading and saving budgets to budgets.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::FinanceError;
use crate::models::{Budget, BudgetId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable budget data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BudgetData {
    #[serde(default)]
    budgets: Vec<Budget>,
}

/// Repository for budget persistence
pub struct BudgetRepository {
    path: PathBuf,
    budgets: RwLock<HashMap<BudgetId, Budget>>,
}

impl BudgetRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            budgets: RwLock::new(HashMap::new()),
        }
    }

    /// Load budgets from disk
    pub fn load(&self) -> Result<(), FinanceError> {
        let file_data: BudgetData = read_json(&self.path)?;

        let mut budgets = self
            .budgets
            .write()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        budgets.clear();
        for budget in file_data.budgets {
            budgets.insert(budget.id, budget);
        }

        Ok(())
    }

    /// Save budgets to disk in creation order
    pub fn save(&self) -> Result<(), FinanceError> {
        let budgets = self.get_all()?;
        write_json_atomic(&self.path, &BudgetData { budgets })
    }

    pub fn get(&self, id: BudgetId) -> Result<Option<Budget>, FinanceError> {
        let budgets = self
            .budgets
            .read()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(budgets.get(&id).cloned())
    }

    /// Find a budget by ID (full or short form) or by category name
    pub fn find(&self, identifier: &str) -> Result<Option<Budget>, FinanceError> {
        let budgets = self
            .budgets
            .read()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        if let Some(budget) = budgets.values().find(|b| b.id.matches(identifier)) {
            return Ok(Some(budget.clone()));
        }

        let identifier = identifier.trim();
        Ok(budgets
            .values()
            .find(|b| b.category.eq_ignore_ascii_case(identifier))
            .cloned())
    }

    /// All budgets in creation order
    pub fn get_all(&self) -> Result<Vec<Budget>, FinanceError> {
        let budgets = self
            .budgets
            .read()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = budgets.values().cloned().collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.category.cmp(&b.category)));
        Ok(list)
    }

    /// Budgets covering a category (case-insensitive)
    pub fn get_by_category(&self, category: &str) -> Result<Vec<Budget>, FinanceError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|b| b.category.eq_ignore_ascii_case(category.trim()))
            .collect())
    }

    pub fn upsert(&self, budget: Budget) -> Result<(), FinanceError> {
        let mut budgets = self
            .budgets
            .write()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        budgets.insert(budget.id, budget);
        Ok(())
    }

    /// Delete a budget, returning whether it existed
    pub fn delete(&self, id: BudgetId) -> Result<bool, FinanceError> {
        let mut budgets = self
            .budgets
            .write()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(budgets.remove(&id).is_some())
    }

    pub fn count(&self) -> Result<usize, FinanceError> {
        let budgets = self
            .budgets
            .read()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(budgets.len())
    }
}
