//! Per-budget alert settings repository
//!
//! Stores only the budgets that override the global default thresholds.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::FinanceError;
use crate::models::{AlertSettings, BudgetId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct AlertSettingsData {
    #[serde(default)]
    overrides: HashMap<BudgetId, AlertSettings>,
}

/// Repository for alert threshold overrides keyed by budget
pub struct AlertSettingsRepository {
    path: PathBuf,
    overrides: RwLock<HashMap<BudgetId, AlertSettings>>,
}

impl AlertSettingsRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            overrides: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), FinanceError> {
        let file_data: AlertSettingsData = read_json(&self.path)?;

        let mut overrides = self
            .overrides
            .write()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        *overrides = file_data.overrides;
        Ok(())
    }

    pub fn save(&self) -> Result<(), FinanceError> {
        let file_data = AlertSettingsData {
            overrides: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    /// The override for a budget, if one is stored
    pub fn get(&self, budget_id: BudgetId) -> Result<Option<AlertSettings>, FinanceError> {
        let overrides = self
            .overrides
            .read()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(overrides.get(&budget_id).copied())
    }

    /// Snapshot of every stored override
    pub fn get_all(&self) -> Result<HashMap<BudgetId, AlertSettings>, FinanceError> {
        let overrides = self
            .overrides
            .read()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(overrides.clone())
    }

    pub fn set(&self, budget_id: BudgetId, settings: AlertSettings) -> Result<(), FinanceError> {
        let mut overrides = self
            .overrides
            .write()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        overrides.insert(budget_id, settings);
        Ok(())
    }

    /// Drop the override for a budget, returning whether one existed
    pub fn remove(&self, budget_id: BudgetId) -> Result<bool, FinanceError> {
        let mut overrides = self
            .overrides
            .write()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(overrides.remove(&budget_id).is_some())
    }
}
