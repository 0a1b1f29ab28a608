//! Formatted terminal output for the `report` command.
//!
//! We keep formatting code in one place so:
//! - the aggregation code stays clean and testable
//! - output changes are localized (the golden tests live next to them)

use crate::domain::SeasonSource;
use crate::plot::{render_hbar_chart, render_vbar_chart};
use crate::report::ViewModel;

/// Height (rows) of the weekday/weekend column chart.
const DAY_TYPE_CHART_HEIGHT: usize = 8;

/// Format the full report for one view.
pub fn format_report(view: &ViewModel, source: &str, chart_width: usize) -> String {
    let mut out = String::new();

    out.push_str("=== bikes - Bike Sharing Dashboard ===\n");
    out.push_str(&format!("Source: {source}\n"));
    match &view.range {
        Some(r) => out.push_str(&format!("Range: {} .. {} ({} days)\n", r.start, r.end, r.num_days())),
        None => out.push_str("Range: - (dataset is empty)\n"),
    }
    out.push_str(&format!("Records: {}\n", view.records));
    out.push('\n');

    out.push_str(&format!("Total Orders: {}\n", fmt_count(view.total_rentals)));
    out.push_str(&format_daily_summary(view));
    out.push('\n');

    out.push_str("Rentals by day type (Weekday vs Weekend):\n");
    out.push_str(&format_day_types(view));
    let bars: Vec<(&str, u64)> = view
        .day_types
        .iter()
        .map(|t| (t.day_type.label(), t.total_rentals))
        .collect();
    out.push_str(&render_vbar_chart(&bars, DAY_TYPE_CHART_HEIGHT));
    out.push('\n');

    let note = match view.season_source {
        SeasonSource::Demo => " (demo data)",
        SeasonSource::Dataset => "",
    };
    out.push_str(&format!("Rentals by season{note}:\n"));
    let bars: Vec<(&str, u64)> = view
        .seasons
        .iter()
        .map(|s| (s.season.label(), s.total_rentals))
        .collect();
    out.push_str(&render_hbar_chart(&bars, chart_width));

    out
}

/// Days covered, daily average, and the busiest day.
pub fn format_daily_summary(view: &ViewModel) -> String {
    if view.daily.is_empty() {
        return "Days with data: 0\n".to_string();
    }

    let days = view.daily.len();
    let avg = view.total_rentals as f64 / days as f64;
    let mut out = format!("Days with data: {days} | daily avg: {avg:.1}\n");
    // `max_by_key` returns the last maximum; prefer the earliest busiest day.
    if let Some(peak) = view
        .daily
        .iter()
        .rev()
        .max_by_key(|t| t.total_rentals)
    {
        out.push_str(&format!(
            "Busiest day: {} ({})\n",
            peak.date,
            fmt_count(peak.total_rentals)
        ));
    }
    out
}

fn format_day_types(view: &ViewModel) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<10} {:>14} {:>7}\n", "day_type", "total_rentals", "share"));
    out.push_str(&format!("{:-<10} {:-<14} {:-<7}\n", "", "", ""));
    for t in &view.day_types {
        out.push_str(&format!(
            "{:<10} {:>14} {:>7}\n",
            t.day_type.label(),
            fmt_count(t.total_rentals),
            fmt_share(t.total_rentals, view.total_rentals),
        ));
    }
    out
}

/// Thousands-separated integer, e.g. `3292679` -> `3,292,679`.
pub fn fmt_count(v: u64) -> String {
    let digits = v.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn fmt_share(part: u64, total: u64) -> String {
    if total == 0 {
        return "-".to_string();
    }
    format!("{:.1}%", part as f64 * 100.0 / total as f64)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{DailyTotal, DateRange, DayType, DayTypeTotal};
    use crate::report::demo_season_totals;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn view() -> ViewModel {
        ViewModel {
            range: Some(DateRange::new(d(2021, 1, 1), d(2021, 1, 2))),
            records: 2,
            total_rentals: 150,
            daily: vec![
                DailyTotal { date: d(2021, 1, 1), total_rentals: 100 },
                DailyTotal { date: d(2021, 1, 2), total_rentals: 50 },
            ],
            day_types: [
                DayTypeTotal { day_type: DayType::Weekday, total_rentals: 100 },
                DayTypeTotal { day_type: DayType::Weekend, total_rentals: 50 },
            ],
            season_source: SeasonSource::Demo,
            seasons: demo_season_totals(),
        }
    }

    #[test]
    fn fmt_count_groups_thousands() {
        assert_eq!(fmt_count(0), "0");
        assert_eq!(fmt_count(999), "999");
        assert_eq!(fmt_count(1000), "1,000");
        assert_eq!(fmt_count(3_292_679), "3,292,679");
    }

    #[test]
    fn report_contains_metric_and_sections() {
        let txt = format_report(&view(), "All_Data.csv", 20);
        assert!(txt.contains("Range: 2021-01-01 .. 2021-01-02 (2 days)\n"));
        assert!(txt.contains("Total Orders: 150\n"));
        assert!(txt.contains("Busiest day: 2021-01-01 (100)\n"));
        assert!(txt.contains("Weekday               100   66.7%\n"), "{txt}");
        assert!(txt.contains("Rentals by season (demo data):\n"));
        assert!(txt.contains("Summer |"));
    }

    #[test]
    fn empty_view_shows_zero_totals() {
        let mut v = view();
        v.records = 0;
        v.total_rentals = 0;
        v.daily.clear();
        v.day_types = [
            DayTypeTotal { day_type: DayType::Weekday, total_rentals: 0 },
            DayTypeTotal { day_type: DayType::Weekend, total_rentals: 0 },
        ];
        let txt = format_report(&v, "x.csv", 20);
        assert!(txt.contains("Total Orders: 0\n"));
        assert!(txt.contains("Days with data: 0\n"));
        assert!(txt.contains("Weekend                 0       -\n"), "{txt}");
    }
}
