//! Range filtering and the three aggregations behind the dashboard.
//!
//! All functions are pure single-pass transformations over a record slice.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{DailyTotal, DateRange, DayType, DayTypeTotal, RentalRecord, Season, SeasonTotal};
use crate::error::AppError;

/// Illustrative season counts shown when the dataset is not used.
const DEMO_SEASON_COUNTS: [(Season, u64); 4] = [
    (Season::Spring, 1200),
    (Season::Summer, 2500),
    (Season::Fall, 1800),
    (Season::Winter, 900),
];

/// Records whose date lies in `range` (inclusive), in input order.
///
/// No validation: an inverted range or one outside the data yields an empty
/// result.
pub fn filter_range(records: &[RentalRecord], range: &DateRange) -> Vec<RentalRecord> {
    records
        .iter()
        .filter(|r| range.contains(r.date))
        .copied()
        .collect()
}

/// One row per distinct date, ascending, with `count` summed.
pub fn daily_totals(records: &[RentalRecord]) -> Vec<DailyTotal> {
    let mut by_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for r in records {
        *by_day.entry(r.date).or_default() += r.count;
    }
    by_day
        .into_iter()
        .map(|(date, total_rentals)| DailyTotal { date, total_rentals })
        .collect()
}

/// Weekday indices 5 and 6 are the weekend; everything else is a weekday.
pub fn classify(weekday_index: u8) -> DayType {
    if matches!(weekday_index, 5 | 6) {
        DayType::Weekend
    } else {
        DayType::Weekday
    }
}

/// Weekday/Weekend totals, always both rows, in [`DayType::ALL`] order.
pub fn day_type_totals(records: &[RentalRecord]) -> [DayTypeTotal; 2] {
    let mut weekday = 0u64;
    let mut weekend = 0u64;
    for r in records {
        match classify(r.weekday_index) {
            DayType::Weekday => weekday += r.count,
            DayType::Weekend => weekend += r.count,
        }
    }
    [
        DayTypeTotal {
            day_type: DayType::Weekday,
            total_rentals: weekday,
        },
        DayTypeTotal {
            day_type: DayType::Weekend,
            total_rentals: weekend,
        },
    ]
}

/// The fixed demo season table, ascending by count.
pub fn demo_season_totals() -> Vec<SeasonTotal> {
    let mut out: Vec<SeasonTotal> = DEMO_SEASON_COUNTS
        .iter()
        .map(|&(season, total_rentals)| SeasonTotal { season, total_rentals })
        .collect();
    sort_seasons(&mut out);
    out
}

/// Season totals derived from the records' `season` codes, ascending by count.
///
/// All four seasons are present even when their total is zero. Fails if any
/// record has no season (the source file had no `season` column).
pub fn season_totals(records: &[RentalRecord]) -> Result<Vec<SeasonTotal>, AppError> {
    let mut totals: BTreeMap<Season, u64> = Season::ALL.iter().map(|&s| (s, 0)).collect();
    for r in records {
        let season = r.season.ok_or_else(|| {
            AppError::parse(format!(
                "Record for {} has no season; the dataset needs a `season` column for `--seasons dataset`.",
                r.date
            ))
        })?;
        *totals.entry(season).or_default() += r.count;
    }

    let mut out: Vec<SeasonTotal> = totals
        .into_iter()
        .map(|(season, total_rentals)| SeasonTotal { season, total_rentals })
        .collect();
    sort_seasons(&mut out);
    Ok(out)
}

fn sort_seasons(rows: &mut [SeasonTotal]) {
    rows.sort_by_key(|r| (r.total_rentals, r.season.code()));
}
