//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::error::FinanceError;
use crate::models::{Transaction, TransactionId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable transaction data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

fn category_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Newest date first, newest creation first within a day
fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
}

/// Repository for transaction persistence with a category index
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
    /// Index: lowercased category name -> transaction ids
    by_category: RwLock<HashMap<String, Vec<TransactionId>>>,
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_category: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk and rebuild the index
    pub fn load(&self) -> Result<(), FinanceError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            FinanceError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_category = self.by_category.write().map_err(|e| {
            FinanceError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        by_category.clear();

        for txn in file_data.transactions {
            by_category
                .entry(category_key(&txn.category))
                .or_default()
                .push(txn.id);
            data.insert(txn.id, txn);
        }

        Ok(())
    }

    /// Save transactions to disk
    pub fn save(&self) -> Result<(), FinanceError> {
        let mut transactions = self.get_all()?;
        sort_newest_first(&mut transactions);
        write_json_atomic(&self.path, &TransactionData { transactions })
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, FinanceError> {
        let data = self.data.read().map_err(|e| {
            FinanceError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// Find a transaction by a user-supplied identifier (full or short ID)
    pub fn find(&self, identifier: &str) -> Result<Option<Transaction>, FinanceError> {
        let data = self.data.read().map_err(|e| {
            FinanceError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.values().find(|t| t.id.matches(identifier)).cloned())
    }

    /// Get all transactions, newest first
    pub fn get_all(&self) -> Result<Vec<Transaction>, FinanceError> {
        let data = self.data.read().map_err(|e| {
            FinanceError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        sort_newest_first(&mut transactions);
        Ok(transactions)
    }

    /// Get transactions filed under a category (case-insensitive)
    pub fn get_by_category(&self, category: &str) -> Result<Vec<Transaction>, FinanceError> {
        let data = self.data.read().map_err(|e| {
            FinanceError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        let by_category = self.by_category.read().map_err(|e| {
            FinanceError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let ids = by_category
            .get(&category_key(category))
            .map(|v| v.as_slice())
            .unwrap_or(&[]);
        let mut transactions: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        sort_newest_first(&mut transactions);
        Ok(transactions)
    }

    /// Get transactions dated within `start..=end`
    pub fn get_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>, FinanceError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|t| t.date >= start && t.date <= end)
            .collect())
    }

    /// Insert or update a transaction
    pub fn upsert(&self, txn: Transaction) -> Result<(), FinanceError> {
        let mut data = self.data.write().map_err(|e| {
            FinanceError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_category = self.by_category.write().map_err(|e| {
            FinanceError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        if let Some(old) = data.get(&txn.id) {
            if let Some(ids) = by_category.get_mut(&category_key(&old.category)) {
                ids.retain(|&id| id != txn.id);
            }
        }

        by_category
            .entry(category_key(&txn.category))
            .or_default()
            .push(txn.id);
        data.insert(txn.id, txn);
        Ok(())
    }

    /// Delete a transaction, returning whether it existed
    pub fn delete(&self, id: TransactionId) -> Result<bool, FinanceError> {
        let mut data = self.data.write().map_err(|e| {
            FinanceError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_category = self.by_category.write().map_err(|e| {
            FinanceError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        match data.remove(&id) {
            Some(txn) => {
                if let Some(ids) = by_category.get_mut(&category_key(&txn.category)) {
                    ids.retain(|&tid| tid != id);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Number of transactions referencing a category (case-insensitive)
    pub fn count_in_category(&self, category: &str) -> Result<usize, FinanceError> {
        let by_category = self.by_category.read().map_err(|e| {
            FinanceError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(by_category
            .get(&category_key(category))
            .map(|ids| ids.len())
            .unwrap_or(0))
    }

    pub fn count(&self) -> Result<usize, FinanceError> {
        let data = self.data.read().map_err(|e| {
            FinanceError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.len())
    }
}
