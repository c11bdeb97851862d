//! Storage initialization
//!
//! First-run setup: directories plus the default category set.

use tracing::info;

use crate::config::paths::FintrackPaths;
use crate::error::FinanceError;
use crate::models::default_categories;

use super::categories::CategoryData;
use super::file_io::write_json_atomic;

/// Prepare a data directory for first use
///
/// Seeds the default categories unless a categories file already exists.
/// Returns the number of categories created.
pub fn initialize_storage(paths: &FintrackPaths) -> Result<usize, FinanceError> {
    paths.ensure_directories()?;

    if paths.categories_file().exists() {
        return Ok(0);
    }

    let categories = default_categories();
    let count = categories.len();
    write_json_atomic(paths.categories_file(), &CategoryData { categories })?;
    info!(count, "seeded default categories");

    Ok(count)
}
