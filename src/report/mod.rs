//! Reporting: range filtering, aggregation, and the view model shared by the
//! text report and the TUI.

use serde::Serialize;
use tracing::debug;

use crate::domain::{DailyTotal, Dataset, DateRange, DayTypeTotal, SeasonSource, SeasonTotal};
use crate::error::AppError;

pub mod aggregate;
pub mod format;

pub use aggregate::*;
pub use format::*;

/// Everything a front-end needs to draw one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    /// Effective range, `None` when the dataset is empty.
    pub range: Option<DateRange>,
    /// Number of raw records inside the range.
    pub records: usize,
    pub total_rentals: u64,
    pub daily: Vec<DailyTotal>,
    pub day_types: [DayTypeTotal; 2],
    pub season_source: SeasonSource,
    pub seasons: Vec<SeasonTotal>,
}

/// Compute the view for `range` (or the full dataset span when `None`).
///
/// This is recomputed from scratch for every selection; nothing is cached.
pub fn render(
    dataset: &Dataset,
    range: Option<DateRange>,
    season_source: SeasonSource,
) -> Result<ViewModel, AppError> {
    let range = range.or_else(|| dataset.span());

    let selected = match &range {
        Some(r) => filter_range(&dataset.records, r),
        None => Vec::new(),
    };

    let daily = daily_totals(&selected);
    let total_rentals: u64 = daily.iter().map(|t| t.total_rentals).sum();
    let day_types = day_type_totals(&selected);
    let seasons = match season_source {
        SeasonSource::Demo => demo_season_totals(),
        SeasonSource::Dataset => season_totals(&selected)?,
    };

    debug!(
        range = ?range,
        records = selected.len(),
        days = daily.len(),
        total_rentals,
        "rendered view"
    );

    Ok(ViewModel {
        range,
        records: selected.len(),
        total_rentals,
        daily,
        day_types,
        season_source,
        seasons,
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{DayType, RentalRecord, Season};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn dataset() -> Dataset {
        let rows = [
            (d(2011, 1, 1), 5, 985, Season::Spring),
            (d(2011, 1, 2), 6, 801, Season::Spring),
            (d(2011, 1, 3), 0, 1349, Season::Spring),
            (d(2011, 6, 1), 2, 4000, Season::Summer),
        ];
        let records = rows
            .iter()
            .map(|&(date, weekday_index, count, season)| RentalRecord {
                date,
                weekday_index,
                count,
                season: Some(season),
            })
            .collect();
        Dataset::new(PathBuf::from("mem.csv"), records, true)
    }

    #[test]
    fn default_range_is_full_span() {
        let ds = dataset();
        let view = render(&ds, None, SeasonSource::Demo).unwrap();
        assert_eq!(view.range, ds.span());
        assert_eq!(view.records, 4);
        assert_eq!(view.total_rentals, ds.total());
        assert_eq!(view.daily.len(), 4);
        assert_eq!(view.seasons, demo_season_totals());
    }

    #[test]
    fn narrowed_range_recomputes_everything() {
        let ds = dataset();
        let range = DateRange::new(d(2011, 1, 2), d(2011, 1, 3));
        let view = render(&ds, Some(range), SeasonSource::Dataset).unwrap();

        assert_eq!(view.total_rentals, 801 + 1349);
        assert_eq!(view.day_types[0].day_type, DayType::Weekday);
        assert_eq!(view.day_types[0].total_rentals, 1349);
        assert_eq!(view.day_types[1].total_rentals, 801);

        let spring = view.seasons.iter().find(|s| s.season == Season::Spring).unwrap();
        assert_eq!(spring.total_rentals, 2150);
        assert_eq!(view.seasons.last().map(|s| s.season), Some(Season::Spring));
    }

    #[test]
    fn empty_selection_is_not_an_error() {
        let ds = dataset();
        let range = DateRange::new(d(2010, 1, 1), d(2010, 1, 31));
        let view = render(&ds, Some(range), SeasonSource::Dataset).unwrap();
        assert_eq!(view.records, 0);
        assert_eq!(view.total_rentals, 0);
        assert!(view.daily.is_empty());
        assert!(view.seasons.iter().all(|s| s.total_rentals == 0));
    }

    #[test]
    fn empty_dataset_has_no_range() {
        let ds = Dataset::new(PathBuf::from("empty.csv"), Vec::new(), false);
        let view = render(&ds, None, SeasonSource::Demo).unwrap();
        assert_eq!(view.range, None);
        assert_eq!(view.total_rentals, 0);
    }

    #[test]
    fn dataset_seasons_need_season_column() {
        let mut ds = dataset();
        for r in &mut ds.records {
            r.season = None;
        }
        assert!(render(&ds, None, SeasonSource::Dataset).is_err());
        assert!(render(&ds, None, SeasonSource::Demo).is_ok());
    }
}
