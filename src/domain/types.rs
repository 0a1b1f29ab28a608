//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during aggregation
//! - exported to JSON/CSV
//! - rendered by either the text report or the TUI

use std::path::PathBuf;

use chrono::{Days, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Default dataset location, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "All_Data.csv";

/// One row of the source dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalRecord {
    pub date: NaiveDate,
    /// 0-6, Monday = 0.
    pub weekday_index: u8,
    pub count: u64,
    /// Only present when the source has a `season` column.
    pub season: Option<Season>,
}

/// Total rentals for a single calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total_rentals: u64,
}

/// Two-valued classification of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayType {
    Weekday,
    Weekend,
}

impl DayType {
    /// Stable display order.
    pub const ALL: [DayType; 2] = [DayType::Weekday, DayType::Weekend];

    pub fn label(self) -> &'static str {
        match self {
            DayType::Weekday => "Weekday",
            DayType::Weekend => "Weekend",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTypeTotal {
    pub day_type: DayType,
    pub total_rentals: u64,
}

/// Calendar season, keyed by the dataset's 1-4 season code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Season::Spring),
            2 => Some(Season::Summer),
            3 => Some(Season::Fall),
            4 => Some(Season::Winter),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Season::Spring => 1,
            Season::Summer => 2,
            Season::Fall => 3,
            Season::Winter => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonTotal {
    pub season: Season,
    pub total_rentals: u64,
}

/// Where the season panel gets its numbers from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SeasonSource {
    /// Fixed illustrative counts, independent of the loaded file.
    Demo,
    /// Sum of `cnt` per `season` column over the selected range.
    Dataset,
}

impl SeasonSource {
    pub fn toggle(self) -> Self {
        match self {
            SeasonSource::Demo => SeasonSource::Dataset,
            SeasonSource::Dataset => SeasonSource::Demo,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            SeasonSource::Demo => "demo",
            SeasonSource::Dataset => "dataset",
        }
    }
}

/// Inclusive date range `start..=end`.
///
/// Construction does not validate ordering: an inverted range simply matches
/// nothing. The TUI keeps edits inside the dataset span with
/// [`DateRange::clamp_to`]; printed reports reject bad bounds instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn single(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    /// Build a range, rejecting `start > end`.
    pub fn checked(start: NaiveDate, end: NaiveDate) -> Result<Self, AppError> {
        if start > end {
            return Err(AppError::source(format!(
                "Start date {start} is after end date {end}."
            )));
        }
        Ok(Self::new(start, end))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Clamp both ends into `span`. An inverted result collapses onto `start`.
    pub fn clamp_to(&self, span: &DateRange) -> DateRange {
        let start = self.start.clamp(span.start, span.end);
        let end = self.end.clamp(span.start, span.end);
        if start > end {
            DateRange::single(start)
        } else {
            DateRange::new(start, end)
        }
    }

    /// Number of calendar days covered (inclusive). Zero for an inverted range.
    pub fn num_days(&self) -> u64 {
        if self.start > self.end {
            return 0;
        }
        (self.end - self.start).num_days() as u64 + 1
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

/// Step a date by a signed number of days, saturating at chrono's limits.
pub fn shift_date(date: NaiveDate, delta: i64) -> NaiveDate {
    let days = Days::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        date.checked_add_days(days)
    } else {
        date.checked_sub_days(days)
    };
    shifted.unwrap_or(date)
}

/// Parse a `YYYY-MM-DD` date from user input.
pub fn parse_user_date(s: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| AppError::source(format!("Invalid date '{}': {e} (expected YYYY-MM-DD).", s.trim())))
}

/// The loaded dataset: records sorted ascending by date.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub source: PathBuf,
    pub records: Vec<RentalRecord>,
    /// Whether the source had a `season` column.
    pub has_season: bool,
}

impl Dataset {
    pub fn new(source: PathBuf, records: Vec<RentalRecord>, has_season: bool) -> Self {
        Self {
            source,
            records,
            has_season,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `[min(date), max(date)]`, or `None` for an empty dataset.
    pub fn span(&self) -> Option<DateRange> {
        let first = self.records.first()?;
        let last = self.records.last()?;
        Some(DateRange::new(first.date, last.date))
    }

    pub fn total(&self) -> u64 {
        self.records.iter().map(|r| r.count).sum()
    }
}

/// Resolved settings for one run, built from CLI flags.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub data_path: PathBuf,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub season_source: SeasonSource,
    pub json: bool,
    pub chart_width: usize,
    pub export_daily: Option<PathBuf>,
    pub export_view: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            start: None,
            end: None,
            season_source: SeasonSource::Demo,
            json: false,
            chart_width: 50,
            export_daily: None,
            export_view: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn season_codes_round_trip_labels() {
        assert_eq!(Season::from_code(1), Some(Season::Spring));
        assert_eq!(Season::from_code(4).map(Season::label), Some("Winter"));
        assert_eq!(Season::from_code(0), None);
        assert_eq!(Season::from_code(5), None);
        for s in Season::ALL {
            assert_eq!(Season::from_code(s.code()), Some(s));
        }
    }

    #[test]
    fn clamp_keeps_range_inside_span() {
        let span = DateRange::new(d(2011, 1, 1), d(2012, 12, 31));
        let wide = DateRange::new(d(2010, 6, 1), d(2013, 1, 1));
        assert_eq!(wide.clamp_to(&span), span);

        let before = DateRange::new(d(2000, 1, 1), d(2000, 2, 1));
        assert_eq!(before.clamp_to(&span), DateRange::single(d(2011, 1, 1)));
    }

    #[test]
    fn checked_rejects_inverted_range() {
        let err = DateRange::checked(d(2011, 2, 1), d(2011, 1, 1)).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(DateRange::checked(d(2011, 1, 1), d(2011, 1, 1)).is_ok());
    }

    #[test]
    fn num_days_is_inclusive() {
        assert_eq!(DateRange::single(d(2011, 1, 1)).num_days(), 1);
        assert_eq!(DateRange::new(d(2011, 1, 1), d(2011, 1, 31)).num_days(), 31);
        assert_eq!(DateRange::new(d(2011, 1, 2), d(2011, 1, 1)).num_days(), 0);
    }

    #[test]
    fn shift_date_moves_both_ways() {
        assert_eq!(shift_date(d(2011, 1, 31), 1), d(2011, 2, 1));
        assert_eq!(shift_date(d(2011, 3, 1), -1), d(2011, 2, 28));
        assert_eq!(shift_date(d(2011, 3, 1), 0), d(2011, 3, 1));
    }

    #[test]
    fn parse_user_date_reports_bad_input() {
        assert_eq!(parse_user_date(" 2012-06-30 ").unwrap(), d(2012, 6, 30));
        assert!(parse_user_date("30/06/2012").is_err());
    }
}
