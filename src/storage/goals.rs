//! Goal repository for JSON storage

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::FinanceError;
use crate::models::{Goal, GoalId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct GoalData {
    #[serde(default)]
    goals: Vec<Goal>,
}

/// Repository for savings goal persistence
pub struct GoalRepository {
    path: PathBuf,
    data: RwLock<HashMap<GoalId, Goal>>,
}

impl GoalRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), FinanceError> {
        let file_data: GoalData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for goal in file_data.goals {
            data.insert(goal.id, goal);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), FinanceError> {
        let goals = self.get_all()?;
        write_json_atomic(&self.path, &GoalData { goals })
    }

    pub fn get(&self, id: GoalId) -> Result<Option<Goal>, FinanceError> {
        let data = self
            .data
            .read()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Find a goal by ID (full or short form) or by exact name
    pub fn find(&self, identifier: &str) -> Result<Option<Goal>, FinanceError> {
        let data = self
            .data
            .read()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let identifier = identifier.trim();
        Ok(data
            .values()
            .find(|g| g.id.matches(identifier))
            .or_else(|| data.values().find(|g| g.name.eq_ignore_ascii_case(identifier)))
            .cloned())
    }

    /// All goals, nearest deadline first
    pub fn get_all(&self) -> Result<Vec<Goal>, FinanceError> {
        let data = self
            .data
            .read()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut goals: Vec<_> = data.values().cloned().collect();
        goals.sort_by(|a, b| a.deadline.cmp(&b.deadline).then(a.name.cmp(&b.name)));
        Ok(goals)
    }

    pub fn upsert(&self, goal: Goal) -> Result<(), FinanceError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(goal.id, goal);
        Ok(())
    }

    pub fn delete(&self, id: GoalId) -> Result<bool, FinanceError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.remove(&id).is_some())
    }

    pub fn count(&self) -> Result<usize, FinanceError> {
        let data = self
            .data
            .read()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn goal(name: &str, month: u32) -> Goal {
        Goal::new(
            name,
            Money::from_cents(100_000),
            NaiveDate::from_ymd_opt(2026, month, 1).unwrap(),
        )
    }

    #[test]
    fn test_sorted_by_deadline() {
        let temp_dir = TempDir::new().unwrap();
        let repo = GoalRepository::new(temp_dir.path().join("goals.json"));
        repo.upsert(goal("Car", 9)).unwrap();
        repo.upsert(goal("Trip", 3)).unwrap();

        let names: Vec<String> = repo.get_all().unwrap().into_iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["Trip", "Car"]);
    }

    #[test]
    fn test_find_by_name_or_id() {
        let temp_dir = TempDir::new().unwrap();
        let repo = GoalRepository::new(temp_dir.path().join("goals.json"));
        let g = goal("Emergency Fund", 6);
        let id = g.id;
        repo.upsert(g).unwrap();

        assert_eq!(repo.find("emergency fund").unwrap().unwrap().id, id);
        assert_eq!(repo.find(&id.to_string()).unwrap().unwrap().id, id);
        assert!(repo.find("Boat").unwrap().is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("goals.json");
        let repo = GoalRepository::new(path.clone());
        repo.upsert(goal("Car", 9)).unwrap();
        repo.save().unwrap();

        let repo2 = GoalRepository::new(path);
        repo2.load().unwrap();
        assert_eq!(repo2.count().unwrap(), 1);
    }
}
