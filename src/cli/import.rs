//! CLI command for hosted-table imports

use std::path::Path;

use crate::error::FinanceResult;
use crate::services::{ImportService, ImportTable};
use crate::storage::Storage;

/// Import one table's records from a fetch-response JSON document
pub fn handle_import_command(storage: &Storage, table: ImportTable, file: &Path) -> FinanceResult<()> {
    let result = ImportService::new(storage).import_file(table, file)?;

    println!(
        "Imported {} {} from {}",
        result.imported,
        result.table,
        file.display()
    );
    Ok(())
}
