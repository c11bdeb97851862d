//! CLI commands for data export

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Subcommand, ValueEnum};

use crate::config::Settings;
use crate::error::{FinanceError, FinanceResult};
use crate::export::{csv, json, yaml};
use crate::reports::AnalyticsReport;
use crate::storage::Storage;

use super::today;

/// Full-export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format (human-readable)
    Yaml,
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Write the financial analytics report as CSV
    Report {
        /// Output file, defaults to financial-report-<date>.csv
        output: Option<PathBuf>,
    },

    /// Export transactions to CSV
    Transactions {
        /// Output file path
        output: PathBuf,
    },

    /// Export all data to a file
    All {
        /// Output file path
        output: PathBuf,

        /// Export format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

/// Handle export commands
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExportCommands,
) -> FinanceResult<()> {
    match cmd {
        ExportCommands::Report { output } => handle_export_report(storage, settings, output),
        ExportCommands::Transactions { output } => handle_export_transactions(storage, &output),
        ExportCommands::All {
            output,
            format,
            pretty,
        } => handle_export_all(storage, &output, format, pretty),
    }
}

fn create_file(output: &Path) -> FinanceResult<BufWriter<File>> {
    let file = File::create(output).map_err(|e| {
        FinanceError::Export(format!("Failed to create file {}: {}", output.display(), e))
    })?;
    Ok(BufWriter::new(file))
}

fn handle_export_report(
    storage: &Storage,
    settings: &Settings,
    output: Option<PathBuf>,
) -> FinanceResult<()> {
    let today = today();
    let report = AnalyticsReport::generate(storage, today)?;

    // Rendered in memory first so a refused report leaves no file behind
    let mut buffer = Vec::new();
    csv::export_report_csv(&report, &settings.currency_symbol, &mut buffer)?;

    let output = output.unwrap_or_else(|| PathBuf::from(csv::report_file_name(today)));
    let mut writer = create_file(&output)?;
    writer
        .write_all(&buffer)
        .and_then(|_| writer.flush())
        .map_err(|e| FinanceError::Export(e.to_string()))?;

    println!("Report exported to: {}", output.display());
    Ok(())
}

fn handle_export_transactions(storage: &Storage, output: &Path) -> FinanceResult<()> {
    let writer = create_file(output)?;
    let count = csv::export_transactions_csv(storage, writer)?;

    println!("Exported {} transactions to: {}", count, output.display());
    Ok(())
}

fn handle_export_all(
    storage: &Storage,
    output: &Path,
    format: ExportFormat,
    pretty: bool,
) -> FinanceResult<()> {
    let mut writer = create_file(output)?;

    match format {
        ExportFormat::Json => json::export_full_json(storage, &mut writer, pretty)?,
        ExportFormat::Yaml => yaml::export_full_yaml(storage, &mut writer)?,
    }
    writer
        .flush()
        .map_err(|e| FinanceError::Export(e.to_string()))?;

    println!("Full database exported to: {}", output.display());
    Ok(())
}
