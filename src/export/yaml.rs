//! YAML Export functionality
//!
//! Exports the complete database to YAML for a human-readable backup.

use std::io::Write;

use crate::error::{FinanceError, FinanceResult};
use crate::export::json::FullExport;
use crate::storage::Storage;

/// Export the full database to YAML format
pub fn export_full_yaml<W: Write>(storage: &Storage, writer: &mut W) -> FinanceResult<()> {
    let export = FullExport::from_storage(storage)?;

    let header = format!(
        "# fintrack full export\n# Generated: {}\n# App Version: {}\n\n",
        export.exported_at, export.app_version
    );
    writer
        .write_all(header.as_bytes())
        .map_err(|e| FinanceError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| FinanceError::Export(e.to_string()))?;

    Ok(())
}
