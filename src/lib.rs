//! fintrack - personal finance tracking from the terminal
//!
//! This library provides the core of the fintrack application: recording
//! income and expenses, monthly category budgets with threshold alerts,
//! savings goals, period reports and data import/export.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (transactions, budgets, goals, categories, alerts)
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `reports`: Dashboard, trend and analytics reports
//! - `export`: CSV, JSON and YAML export
//! - `display`: Terminal table formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use fintrack::config::{FintrackPaths, Settings};
//! use fintrack::storage::Storage;
//!
//! let paths = FintrackPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(paths)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{FinanceError, FinanceResult};
