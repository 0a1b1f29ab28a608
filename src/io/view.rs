//! View JSON output.
//!
//! The JSON mirrors [`ViewModel`]: the effective range, the total, and the
//! daily/day-type/season tables, so a selection can be consumed by other tools.

use std::fs::File;
use std::path::Path;

use tracing::info;

use crate::error::AppError;
use crate::report::ViewModel;

/// Pretty JSON for stdout.
pub fn view_to_json(view: &ViewModel) -> Result<String, AppError> {
    serde_json::to_string_pretty(view)
        .map_err(|e| AppError::source(format!("Failed to serialize view: {e}")))
}

/// Write the view to `path` as pretty JSON.
pub fn write_view_json(path: &Path, view: &ViewModel) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::source(format!("Failed to create view JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, view)
        .map_err(|e| AppError::source(format!("Failed to write view JSON: {e}")))?;

    info!(path = %path.display(), "wrote view json");
    Ok(())
}
