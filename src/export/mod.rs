//! Export module for fintrack
//!
//! - CSV: the financial report and a flat transaction listing
//! - JSON: machine-readable full export
//! - YAML: human-readable full export

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{export_report_csv, export_transactions_csv, report_file_name};
pub use json::{export_full_json, AlertOverride, ExportMetadata, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_full_yaml;
