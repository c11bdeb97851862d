//! Category repository for JSON storage
//!
//! Manages loading and saving categories to categories.json. Names are
//! indexed case-insensitively so lookups by name never scan.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::FinanceError;
use crate::models::{Category, CategoryId, TransactionKind};

use super::file_io::{read_json, write_json_atomic};

/// Serializable category data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CategoryData {
    #[serde(default)]
    pub categories: Vec<Category>,
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Repository for category persistence
pub struct CategoryRepository {
    path: PathBuf,
    categories: RwLock<HashMap<CategoryId, Category>>,
    /// Index: lowercased name -> category id
    by_name: RwLock<HashMap<String, CategoryId>>,
}

impl CategoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            categories: RwLock::new(HashMap::new()),
            by_name: RwLock::new(HashMap::new()),
        }
    }

    /// Load categories from disk
    pub fn load(&self) -> Result<(), FinanceError> {
        let file_data: CategoryData = read_json(&self.path)?;

        let mut categories = self
            .categories
            .write()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_name = self
            .by_name
            .write()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        categories.clear();
        by_name.clear();

        for category in file_data.categories {
            by_name.insert(name_key(&category.name), category.id);
            categories.insert(category.id, category);
        }

        Ok(())
    }

    /// Save categories to disk, sorted by name
    pub fn save(&self) -> Result<(), FinanceError> {
        let categories = self.get_all()?;
        write_json_atomic(&self.path, &CategoryData { categories })
    }

    pub fn get(&self, id: CategoryId) -> Result<Option<Category>, FinanceError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(categories.get(&id).cloned())
    }

    /// Get a category by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Category>, FinanceError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_name = self
            .by_name
            .read()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(by_name
            .get(&name_key(name))
            .and_then(|id| categories.get(id))
            .cloned())
    }

    /// Find a category by name or by ID (full or short form)
    pub fn find(&self, identifier: &str) -> Result<Option<Category>, FinanceError> {
        if let Some(category) = self.get_by_name(identifier)? {
            return Ok(Some(category));
        }

        let categories = self
            .categories
            .read()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(categories.values().find(|c| c.id.matches(identifier)).cloned())
    }

    /// All categories sorted by name
    pub fn get_all(&self) -> Result<Vec<Category>, FinanceError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = categories.values().cloned().collect();
        list.sort_by_key(|c| c.name.to_lowercase());
        Ok(list)
    }

    /// Categories of one kind, sorted by name
    pub fn get_by_kind(&self, kind: TransactionKind) -> Result<Vec<Category>, FinanceError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|c| c.kind == kind)
            .collect())
    }

    /// Check whether a name is taken by a category other than `exclude`
    pub fn name_exists(&self, name: &str, exclude: Option<CategoryId>) -> Result<bool, FinanceError> {
        let by_name = self
            .by_name
            .read()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(match by_name.get(&name_key(name)) {
            Some(id) => Some(*id) != exclude,
            None => false,
        })
    }

    pub fn upsert(&self, category: Category) -> Result<(), FinanceError> {
        let mut categories = self
            .categories
            .write()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_name = self
            .by_name
            .write()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if let Some(old) = categories.get(&category.id) {
            by_name.remove(&name_key(&old.name));
        }

        by_name.insert(name_key(&category.name), category.id);
        categories.insert(category.id, category);
        Ok(())
    }

    pub fn delete(&self, id: CategoryId) -> Result<bool, FinanceError> {
        let mut categories = self
            .categories
            .write()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_name = self
            .by_name
            .write()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        match categories.remove(&id) {
            Some(category) => {
                by_name.remove(&name_key(&category.name));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn count(&self) -> Result<usize, FinanceError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(categories.len())
    }
}
