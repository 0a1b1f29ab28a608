//! Export daily totals to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::path::Path;

use csv::WriterBuilder;
use tracing::info;

use crate::domain::DailyTotal;
use crate::error::AppError;

/// Write `date,total_rentals` rows to `path`, replacing any existing file.
pub fn write_daily_csv(path: &Path, daily: &[DailyTotal]) -> Result<(), AppError> {
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| AppError::source(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    // `serialize` only emits the header alongside the first row.
    if daily.is_empty() {
        writer
            .write_record(["date", "total_rentals"])
            .map_err(|e| AppError::source(format!("Failed to write export CSV header: {e}")))?;
    }

    for row in daily {
        writer
            .serialize(row)
            .map_err(|e| AppError::source(format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::source(format!("Failed to flush export CSV: {e}")))?;

    info!(path = %path.display(), rows = daily.len(), "wrote daily totals");
    Ok(())
}
