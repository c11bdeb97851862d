//! Budget alert models
//!
//! Alerts are derived values: they are produced by evaluating budgets against
//! transactions and are never stored. Alert settings, on the other hand, are
//! persisted per budget.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AlertId, BudgetId};
use super::money::Money;

/// How serious an alert is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    /// Spending crossed the warning threshold
    Warning,
    /// Spending crossed the error threshold
    Error,
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// A triggered budget alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub budget_id: BudgetId,
    pub category: String,
    pub severity: AlertSeverity,
    pub message: String,

    /// Spend as a percentage of the limit; `None` when the limit is zero
    pub percentage: Option<f64>,

    /// The threshold that was crossed
    pub threshold: f64,

    pub spent: Money,
    pub limit: Money,
}

impl Alert {
    pub fn is_error(&self) -> bool {
        self.severity == AlertSeverity::Error
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.percentage {
            Some(p) => write!(f, "[{}] {} ({:.1}% of {})", self.severity, self.message, p, self.limit),
            None => write!(f, "[{}] {} (no limit set)", self.severity, self.message),
        }
    }
}

/// Threshold configuration for one budget's alerts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertSettings {
    /// Percentage of the limit at which a warning is raised
    #[serde(default = "default_warning_threshold")]
    pub warning_threshold: f64,

    /// Percentage of the limit at which an error is raised
    #[serde(default = "default_error_threshold")]
    pub error_threshold: f64,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_warning_threshold() -> f64 {
    80.0
}

fn default_error_threshold() -> f64 {
    100.0
}

fn default_enabled() -> bool {
    true
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            warning_threshold: default_warning_threshold(),
            error_threshold: default_error_threshold(),
            enabled: default_enabled(),
        }
    }
}

impl AlertSettings {
    /// Check that `0 < warning <= error`
    pub fn validate(&self) -> Result<(), AlertSettingsError> {
        if !self.warning_threshold.is_finite() || self.warning_threshold <= 0.0 {
            return Err(AlertSettingsError::NonPositiveThreshold(self.warning_threshold));
        }

        if !self.error_threshold.is_finite() || self.error_threshold <= 0.0 {
            return Err(AlertSettingsError::NonPositiveThreshold(self.error_threshold));
        }

        if self.warning_threshold > self.error_threshold {
            return Err(AlertSettingsError::WarningAboveError {
                warning: self.warning_threshold,
                error: self.error_threshold,
            });
        }

        Ok(())
    }
}

impl fmt::Display for AlertSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "warning at {:.1}%, error at {:.1}%{}",
            self.warning_threshold,
            self.error_threshold,
            if self.enabled { "" } else { " (disabled)" }
        )
    }
}

/// A partial change to alert settings
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AlertSettingsUpdate {
    pub warning_threshold: Option<f64>,
    pub error_threshold: Option<f64>,
    pub enabled: Option<bool>,
}

impl AlertSettingsUpdate {
    /// Overlay the given fields onto `base`
    pub fn apply_to(&self, base: &AlertSettings) -> AlertSettings {
        AlertSettings {
            warning_threshold: self.warning_threshold.unwrap_or(base.warning_threshold),
            error_threshold: self.error_threshold.unwrap_or(base.error_threshold),
            enabled: self.enabled.unwrap_or(base.enabled),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.warning_threshold.is_none() && self.error_threshold.is_none() && self.enabled.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AlertSettingsError {
    NonPositiveThreshold(f64),
    WarningAboveError { warning: f64, error: f64 },
}

impl fmt::Display for AlertSettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveThreshold(t) => {
                write!(f, "Alert thresholds must be positive numbers (got {})", t)
            }
            Self::WarningAboveError { warning, error } => write!(
                f,
                "Warning threshold ({}) cannot exceed error threshold ({})",
                warning, error
            ),
        }
    }
}

impl std::error::Error for AlertSettingsError {}
