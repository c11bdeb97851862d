//! Hosted-table import service
//!
//! Reads documents shaped like the hosted table's fetch response and turns
//! their records into typed entities. Field names such as `amount_c` are
//! normalized here and nowhere else.
//!
//! An import is all-or-nothing: every record is normalized and validated
//! before anything is written.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::audit::{AuditEntry, EntityType};
use crate::error::{FinanceError, FinanceResult};
use crate::models::{Budget, Category, Goal, Money, MonthRange, Transaction, TransactionKind};
use crate::storage::Storage;

use super::category::CategoryService;

/// Which table a document holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportTable {
    Transactions,
    Budgets,
    Goals,
    Categories,
}

impl ImportTable {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transactions => "transactions",
            Self::Budgets => "budgets",
            Self::Goals => "goals",
            Self::Categories => "categories",
        }
    }
}

impl fmt::Display for ImportTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ImportTable {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "transactions" | "transaction" => Ok(Self::Transactions),
            "budgets" | "budget" => Ok(Self::Budgets),
            "goals" | "goal" => Ok(Self::Goals),
            "categories" | "category" => Ok(Self::Categories),
            other => Err(format!(
                "unknown table '{}': expected transactions, budgets, goals or categories",
                other
            )),
        }
    }
}

/// Fetch-response wrapper
#[derive(Debug, Deserialize)]
struct HostedResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Vec<Value>,
    #[serde(default)]
    results: Vec<HostedResult>,
}

#[derive(Debug, Deserialize)]
struct HostedResult {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

/// Amounts arrive either as JSON numbers or as strings
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HostedAmount {
    Number(f64),
    Text(String),
}

impl HostedAmount {
    fn to_money(&self) -> Result<Money, String> {
        match self {
            Self::Number(n) => Money::try_from_decimal(*n).map_err(|e| e.to_string()),
            Self::Text(s) => Money::parse(s).map_err(|e| e.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct HostedTransaction {
    #[serde(rename = "Name", default)]
    name: Option<String>,
    #[serde(rename = "type_c")]
    kind: Option<String>,
    #[serde(rename = "amount_c")]
    amount: Option<HostedAmount>,
    #[serde(rename = "category_c")]
    category: Option<String>,
    #[serde(rename = "description_c", default)]
    description: Option<String>,
    #[serde(rename = "date_c")]
    date: Option<String>,
    #[serde(rename = "createdAt_c", default)]
    created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HostedBudget {
    #[serde(rename = "Name", default)]
    name: Option<String>,
    #[serde(rename = "category_c", default)]
    category: Option<String>,
    #[serde(rename = "monthlyLimit_c")]
    monthly_limit: Option<HostedAmount>,
    #[serde(rename = "period_c", default)]
    period: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HostedGoal {
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "targetAmount_c")]
    target_amount: Option<HostedAmount>,
    #[serde(rename = "currentAmount_c", default)]
    current_amount: Option<HostedAmount>,
    #[serde(rename = "deadline_c")]
    deadline: Option<String>,
    #[serde(rename = "createdAt_c", default)]
    created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HostedCategory {
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "type_c")]
    kind: Option<String>,
    #[serde(rename = "icon_c", default)]
    icon: Option<String>,
    #[serde(rename = "color_c", default)]
    color: Option<String>,
}

/// Outcome of a successful import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResult {
    pub table: ImportTable,
    pub imported: usize,
}

/// Service for importing hosted-table documents
pub struct ImportService<'a> {
    storage: &'a Storage,
}

impl<'a> ImportService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Import a document read from disk
    pub fn import_file(
        &self,
        table: ImportTable,
        path: impl AsRef<std::path::Path>,
    ) -> FinanceResult<ImportResult> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            FinanceError::Import(format!("Failed to read {}: {}", path.display(), e))
        })?;
        self.import_str(table, &contents)
    }

    /// Import a document held in memory
    pub fn import_str(&self, table: ImportTable, contents: &str) -> FinanceResult<ImportResult> {
        let records = parse_response(contents).map_err(|e| {
            warn!(%table, error = %e, "import rejected");
            e
        })?;

        let imported = match table {
            ImportTable::Transactions => self.import_transactions(&records),
            ImportTable::Budgets => self.import_budgets(&records),
            ImportTable::Goals => self.import_goals(&records),
            ImportTable::Categories => self.import_categories(&records),
        }
        .map_err(|e| {
            warn!(%table, error = %e, "import aborted");
            e
        })?;

        info!(%table, imported, "import complete");
        Ok(ImportResult { table, imported })
    }

    fn import_transactions(&self, records: &[Value]) -> FinanceResult<usize> {
        let categories = CategoryService::new(self.storage);
        let mut transactions = Vec::with_capacity(records.len());

        for (index, value) in records.iter().enumerate() {
            let record: HostedTransaction = decode(index, value)?;
            let txn = normalize_transaction(record)
                .and_then(|mut txn| {
                    let category = categories
                        .resolve_for_kind(&txn.category, txn.kind)
                        .map_err(|e| e.to_string())?;
                    txn.category = category.name;
                    Ok(txn)
                })
                .map_err(|e| record_error(index, e))?;
            transactions.push(txn);
        }

        let entries: Vec<AuditEntry> = transactions
            .iter()
            .map(|t| {
                AuditEntry::create(
                    EntityType::Transaction,
                    t.id.to_string(),
                    Some(t.description.clone()),
                    t,
                )
            })
            .collect();

        for txn in transactions {
            self.storage.transactions.upsert(txn)?;
        }
        self.storage.transactions.save()?;
        self.storage.log_batch(&entries)?;

        Ok(entries.len())
    }

    fn import_budgets(&self, records: &[Value]) -> FinanceResult<usize> {
        let categories = CategoryService::new(self.storage);
        let mut budgets: Vec<Budget> = Vec::with_capacity(records.len());

        for (index, value) in records.iter().enumerate() {
            let record: HostedBudget = decode(index, value)?;
            let mut budget = normalize_budget(record).map_err(|e| record_error(index, e))?;

            let category = categories
                .resolve_for_kind(&budget.category, TransactionKind::Expense)
                .map_err(|e| record_error(index, e.to_string()))?;
            budget.category = category.name;

            let clashes_existing = self
                .storage
                .budgets
                .get_by_category(&budget.category)?
                .iter()
                .any(|b| b.period.eq_ignore_ascii_case(&budget.period));
            let clashes_batch = budgets.iter().any(|b| {
                b.category == budget.category && b.period.eq_ignore_ascii_case(&budget.period)
            });
            if clashes_existing || clashes_batch {
                return Err(record_error(
                    index,
                    format!(
                        "budget for {} ({}) already exists",
                        budget.category, budget.period
                    ),
                ));
            }

            budgets.push(budget);
        }

        let entries: Vec<AuditEntry> = budgets
            .iter()
            .map(|b| {
                AuditEntry::create(
                    EntityType::Budget,
                    b.id.to_string(),
                    Some(b.category.clone()),
                    b,
                )
            })
            .collect();

        for budget in budgets {
            self.storage.budgets.upsert(budget)?;
        }
        self.storage.budgets.save()?;
        self.storage.log_batch(&entries)?;

        Ok(entries.len())
    }

    fn import_goals(&self, records: &[Value]) -> FinanceResult<usize> {
        let mut goals = Vec::with_capacity(records.len());
        for (index, value) in records.iter().enumerate() {
            let record: HostedGoal = decode(index, value)?;
            goals.push(normalize_goal(record).map_err(|e| record_error(index, e))?);
        }

        let entries: Vec<AuditEntry> = goals
            .iter()
            .map(|g| AuditEntry::create(EntityType::Goal, g.id.to_string(), Some(g.name.clone()), g))
            .collect();

        for goal in goals {
            self.storage.goals.upsert(goal)?;
        }
        self.storage.goals.save()?;
        self.storage.log_batch(&entries)?;

        Ok(entries.len())
    }

    fn import_categories(&self, records: &[Value]) -> FinanceResult<usize> {
        let mut categories: Vec<Category> = Vec::with_capacity(records.len());

        for (index, value) in records.iter().enumerate() {
            let record: HostedCategory = decode(index, value)?;
            let category = normalize_category(record).map_err(|e| record_error(index, e))?;

            if self.storage.categories.name_exists(&category.name, None)?
                || categories.iter().any(|c| c.has_name(&category.name))
            {
                return Err(record_error(
                    index,
                    format!("category '{}' already exists", category.name),
                ));
            }

            categories.push(category);
        }

        let entries: Vec<AuditEntry> = categories
            .iter()
            .map(|c| {
                AuditEntry::create(
                    EntityType::Category,
                    c.id.to_string(),
                    Some(c.name.clone()),
                    c,
                )
            })
            .collect();

        for category in categories {
            self.storage.categories.upsert(category)?;
        }
        self.storage.categories.save()?;
        self.storage.log_batch(&entries)?;

        Ok(entries.len())
    }
}

/// Check the response and per-record results, returning the raw records
fn parse_response(contents: &str) -> FinanceResult<Vec<Value>> {
    let response: HostedResponse = serde_json::from_str(contents)
        .map_err(|e| FinanceError::Import(format!("Malformed response: {}", e)))?;

    if !response.success {
        return Err(FinanceError::Import(
            response
                .message
                .unwrap_or_else(|| "Response reported failure".into()),
        ));
    }

    if let Some((index, failed)) = response
        .results
        .iter()
        .enumerate()
        .find(|(_, r)| !r.success)
    {
        return Err(FinanceError::Import(format!(
            "Record {} failed: {}",
            index + 1,
            failed.message.as_deref().unwrap_or("no message")
        )));
    }

    Ok(response.data)
}

fn decode<T: for<'de> Deserialize<'de>>(index: usize, value: &Value) -> FinanceResult<T> {
    T::deserialize(value).map_err(|e| record_error(index, e.to_string()))
}

fn record_error(index: usize, message: impl fmt::Display) -> FinanceError {
    FinanceError::Import(format!("Record {}: {}", index + 1, message))
}

fn required<T>(field: &str, value: Option<T>) -> Result<T, String> {
    value.ok_or_else(|| format!("missing field {}", field))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Accept `YYYY-MM-DD` or an RFC 3339 timestamp
fn parse_date(field: &str, value: &str) -> Result<NaiveDate, String> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .map_err(|_| format!("invalid {} '{}'", field, value))
}

fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|v| DateTime::parse_from_rfc3339(v.trim()).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_kind(value: Option<String>) -> Result<TransactionKind, String> {
    required("type_c", value)?
        .parse::<TransactionKind>()
        .map_err(|e| e.to_string())
}

fn normalize_transaction(record: HostedTransaction) -> Result<Transaction, String> {
    let kind = parse_kind(record.kind)?;
    let amount = required("amount_c", record.amount)?.to_money()?.abs();
    let category = required("category_c", non_blank(record.category))?;
    let date = parse_date("date_c", &required("date_c", record.date)?)?;
    let description = non_blank(record.description)
        .or_else(|| non_blank(record.name))
        .unwrap_or_default();

    let mut txn = Transaction::new(kind, amount, category, description, date);
    if let Some(created_at) = parse_timestamp(record.created_at.as_deref()) {
        txn.created_at = created_at;
        txn.updated_at = created_at;
    }

    txn.validate().map_err(|e| e.to_string())?;
    Ok(txn)
}

fn normalize_budget(record: HostedBudget) -> Result<Budget, String> {
    let category = required(
        "category_c",
        non_blank(record.category).or_else(|| non_blank(record.name)),
    )?;
    let limit = required("monthlyLimit_c", record.monthly_limit)?.to_money()?;
    let period = non_blank(record.period).unwrap_or_else(|| MonthRange::current().long_label());

    let budget = Budget::new(category, limit, period);
    budget.validate().map_err(|e| e.to_string())?;
    Ok(budget)
}

fn normalize_goal(record: HostedGoal) -> Result<Goal, String> {
    let name = required("Name", non_blank(record.name))?;
    let target = required("targetAmount_c", record.target_amount)?.to_money()?;
    let deadline = parse_date("deadline_c", &required("deadline_c", record.deadline)?)?;

    let mut goal = Goal::new(name, target, deadline);
    if let Some(current) = record.current_amount {
        goal.current_amount = current.to_money()?;
    }
    if let Some(created_at) = parse_timestamp(record.created_at.as_deref()) {
        goal.created_at = created_at;
        goal.updated_at = created_at;
    }

    goal.validate().map_err(|e| e.to_string())?;
    Ok(goal)
}

fn normalize_category(record: HostedCategory) -> Result<Category, String> {
    let name = required("Name", non_blank(record.name))?;
    let kind = parse_kind(record.kind)?;

    let category = Category::with_style(
        name,
        kind,
        non_blank(record.icon).unwrap_or_default(),
        non_blank(record.color).unwrap_or_default(),
    );
    category.validate().map_err(|e| e.to_string())?;
    Ok(category)
}
