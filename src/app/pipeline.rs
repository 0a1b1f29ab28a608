//! Shared "load -> select -> render" logic used by both the printed report and
//! the TUI.
//!
//! The dataset is loaded once into a [`Session`] and never mutated; every
//! range selection goes through [`Session::view`], which recomputes the
//! aggregates from scratch.

use chrono::NaiveDate;
use tracing::info;

use crate::domain::{Dataset, DateRange, ReportConfig, SeasonSource};
use crate::error::AppError;
use crate::io::ingest::load_dataset;
use crate::report::{ViewModel, render};

/// Session-scoped context: created at startup, read-only afterwards.
#[derive(Debug, Clone)]
pub struct Session {
    dataset: Dataset,
    season_source: SeasonSource,
}

impl Session {
    pub fn new(dataset: Dataset, season_source: SeasonSource) -> Self {
        Self {
            dataset,
            season_source,
        }
    }

    /// Load the configured file and fail early if the chosen season source
    /// cannot be served by it.
    pub fn load(config: &ReportConfig) -> Result<Self, AppError> {
        let dataset = load_dataset(&config.data_path)?;
        if config.season_source == SeasonSource::Dataset && !dataset.has_season {
            return Err(AppError::parse(format!(
                "`--seasons dataset` needs a `season` column, but '{}' has none.",
                config.data_path.display()
            )));
        }
        Ok(Self::new(dataset, config.season_source))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn season_source(&self) -> SeasonSource {
        self.season_source
    }

    /// Full dataset span, `None` when the file had no rows.
    pub fn span(&self) -> Option<DateRange> {
        self.dataset.span()
    }

    /// Resolve user-supplied bounds against the dataset span.
    ///
    /// Missing bounds default to the span's ends. Bounds outside the span or
    /// `start > end` are rejected, mirroring a bounded date picker.
    pub fn resolve_range(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Option<DateRange>, AppError> {
        let Some(span) = self.span() else {
            return Ok(None);
        };

        let start = start.unwrap_or(span.start);
        let end = end.unwrap_or(span.end);
        for (name, date) in [("Start", start), ("End", end)] {
            if !span.contains(date) {
                return Err(AppError::source(format!(
                    "{name} date {date} is outside the dataset span {span}."
                )));
            }
        }
        DateRange::checked(start, end).map(Some)
    }

    /// Render with this session's season source.
    pub fn view(&self, range: Option<DateRange>) -> Result<ViewModel, AppError> {
        render(&self.dataset, range, self.season_source)
    }

    /// Render with an explicit season source (the TUI can toggle it).
    pub fn view_with(&self, range: Option<DateRange>, season_source: SeasonSource) -> Result<ViewModel, AppError> {
        render(&self.dataset, range, season_source)
    }
}

/// All computed outputs of a single `bikes report` run.
#[derive(Debug, Clone)]
pub struct ReportRun {
    pub session: Session,
    pub view: ViewModel,
}

/// Load, resolve the range, and render.
pub fn run_report(config: &ReportConfig) -> Result<ReportRun, AppError> {
    let session = Session::load(config)?;
    let range = session.resolve_range(config.start, config.end)?;
    let view = session.view(range)?;

    info!(
        range = ?view.range,
        records = view.records,
        total_rentals = view.total_rentals,
        "report ready"
    );

    Ok(ReportRun { session, view })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::domain::RentalRecord;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn session() -> Session {
        let records = (1..=10)
            .map(|day| RentalRecord {
                date: d(2011, 1, day),
                weekday_index: ((day + 4) % 7) as u8,
                count: u64::from(day) * 10,
                season: None,
            })
            .collect();
        Session::new(Dataset::new(PathBuf::from("mem.csv"), records, false), SeasonSource::Demo)
    }

    #[test]
    fn missing_bounds_default_to_span() {
        let s = session();
        let range = s.resolve_range(None, None).unwrap();
        assert_eq!(range, Some(DateRange::new(d(2011, 1, 1), d(2011, 1, 10))));

        let range = s.resolve_range(Some(d(2011, 1, 5)), None).unwrap();
        assert_eq!(range, Some(DateRange::new(d(2011, 1, 5), d(2011, 1, 10))));
    }

    #[test]
    fn out_of_span_and_inverted_bounds_are_rejected() {
        let s = session();
        assert!(s.resolve_range(Some(d(2010, 12, 31)), None).is_err());
        assert!(s.resolve_range(None, Some(d(2011, 1, 11))).is_err());
        assert!(s.resolve_range(Some(d(2011, 1, 6)), Some(d(2011, 1, 5))).is_err());
    }

    #[test]
    fn empty_dataset_resolves_to_no_range() {
        let s = Session::new(Dataset::new(PathBuf::from("e.csv"), Vec::new(), false), SeasonSource::Demo);
        assert_eq!(s.resolve_range(Some(d(2011, 1, 1)), None).unwrap(), None);
    }

    #[test]
    fn view_recomputes_per_range() {
        let s = session();
        let all = s.view(None).unwrap();
        assert_eq!(all.total_rentals, 550);

        let one = s.view(Some(DateRange::single(d(2011, 1, 3)))).unwrap();
        assert_eq!(one.total_rentals, 30);
        assert_eq!(one.daily.len(), 1);
    }

    #[test]
    fn load_rejects_dataset_seasons_without_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("day.csv");
        std::fs::write(&path, "dteday,weekday,cnt\n2011-01-01,5,985\n").unwrap();

        let config = ReportConfig {
            data_path: path,
            season_source: SeasonSource::Dataset,
            ..ReportConfig::default()
        };
        let err = Session::load(&config).unwrap_err();
        assert_eq!(err.exit_code(), AppError::PARSE);
    }
}
