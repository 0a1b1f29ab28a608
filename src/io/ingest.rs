//! CSV ingest and normalization.
//!
//! This module turns a daily bike-rental CSV into a chronologically ordered
//! [`Dataset`]. Only three columns matter (`dteday`, `weekday`, `cnt`), plus an
//! optional `season` code; everything else in the file is ignored.
//!
//! Design goals:
//! - **Strict schema**: a missing column or a malformed value aborts the load
//!   with the offending line number (exit code 3)
//! - **Deterministic behavior**: stable sort by date, duplicates kept
//! - **Separation of concerns**: no aggregation logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use tracing::{debug, info};

use crate::domain::{Dataset, RentalRecord, Season};
use crate::error::AppError;

const COL_DATE: &str = "dteday";
const COL_WEEKDAY: &str = "weekday";
const COL_COUNT: &str = "cnt";
const COL_SEASON: &str = "season";

const REQUIRED_COLUMNS: [&str; 3] = [COL_DATE, COL_WEEKDAY, COL_COUNT];

/// Load the dataset at `path`.
pub fn load_dataset(path: &Path) -> Result<Dataset, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::source(format!("Failed to open CSV '{}': {e}", path.display()))
    })?;

    let dataset = read_dataset(file, path)?;
    info!(
        path = %path.display(),
        rows = dataset.len(),
        has_season = dataset.has_season,
        "loaded dataset"
    );
    if let Some(span) = dataset.span() {
        debug!(start = %span.start, end = %span.end, "dataset span");
    }
    Ok(dataset)
}

/// Parse a dataset from any reader. `source` is only used for labelling.
pub fn read_dataset<R: Read>(reader: R, source: &Path) -> Result<Dataset, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::parse(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;
    let has_season = header_map.contains_key(COL_SEASON);

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header, and lines are 1-based.
        let line = idx + 2;

        let record = result.map_err(|e| AppError::parse(format!("Line {line}: CSV parse error: {e}")))?;
        let row = parse_row(&record, &header_map, has_season)
            .map_err(|e| AppError::parse(format!("Line {line}: {e}")))?;
        records.push(row);
    }

    // `sort_by_key` is stable, so duplicate dates keep their file order.
    records.sort_by_key(|r| r.date);

    Ok(Dataset::new(source.to_path_buf(), records, has_season))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|name| !header_map.contains_key(*name))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    let list = missing
        .iter()
        .map(|name| format!("`{name}`"))
        .collect::<Vec<_>>()
        .join(", ");
    Err(AppError::parse(format!("Missing required column(s): {list}")))
}

fn parse_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    has_season: bool,
) -> Result<RentalRecord, String> {
    let date = parse_date(get_required(record, header_map, COL_DATE)?)?;
    let weekday_index = parse_weekday(get_required(record, header_map, COL_WEEKDAY)?)?;
    let count = parse_count(get_required(record, header_map, COL_COUNT)?)?;

    let season = if has_season {
        Some(parse_season(get_required(record, header_map, COL_SEASON)?)?)
    } else {
        None
    };

    Ok(RentalRecord {
        date,
        weekday_index,
        count,
        season,
    })
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // ISO dates are the norm for this dataset, but re-saved spreadsheets tend
    // to come back as `DD/MM/YYYY` or with a midnight timestamp attached.
    const DATE_FMTS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"];
    const DATETIME_FMTS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    Err(format!(
        "Invalid `{COL_DATE}` '{s}'. Expected one of: YYYY-MM-DD, YYYY/MM/DD, DD/MM/YYYY, DD-MM-YYYY."
    ))
}

fn parse_weekday(s: &str) -> Result<u8, String> {
    match s.parse::<u8>() {
        Ok(v) if v <= 6 => Ok(v),
        _ => Err(format!("Invalid `{COL_WEEKDAY}` '{s}' (expected an integer 0-6).")),
    }
}

/// Daily counts are capped at `u32` so totals over any realistic number of
/// rows fit in `u64`.
fn parse_count(s: &str) -> Result<u64, String> {
    s.parse::<u32>().map(u64::from).map_err(|_| {
        format!(
            "Invalid `{COL_COUNT}` '{s}' (expected a non-negative integer up to {}).",
            u32::MAX
        )
    })
}

fn parse_season(s: &str) -> Result<Season, String> {
    s.parse::<u8>()
        .ok()
        .and_then(Season::from_code)
        .ok_or_else(|| format!("Invalid `{COL_SEASON}` '{s}' (expected an integer 1-4)."))
}
