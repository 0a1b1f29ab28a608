//! Command-line parsing for the bike-rental dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the loading/aggregation code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::{DEFAULT_DATA_PATH, SeasonSource};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "bikes", version, about = "Bike Sharing Dashboard (daily rental reports)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the metric, day-type and season tables for a date range.
    Report(ReportArgs),
    /// Launch the interactive dashboard.
    ///
    /// Every change to the date range recomputes the totals from the loaded
    /// dataset and redraws the charts.
    Tui(TuiArgs),
    /// Choose a CSV under the current directory, then print its report.
    Pick(PickArgs),
}

/// Options shared by every command that loads a dataset.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// Daily rentals CSV (needs `dteday`, `weekday`, `cnt`).
    #[arg(short = 'f', long = "data", env = "BIKES_DATA", default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Season panel source: fixed demo counts or the dataset's `season` column.
    #[arg(long, value_enum, default_value_t = SeasonSource::Demo)]
    pub seasons: SeasonSource,
}

/// Options for the text report.
#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Range selection and output options for printed reports.
#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    /// First day to include (YYYY-MM-DD). Defaults to the first day in the data.
    #[arg(short = 's', long, value_parser = parse_date_arg)]
    pub start: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD). Defaults to the last day in the data.
    #[arg(short = 'e', long, value_parser = parse_date_arg)]
    pub end: Option<NaiveDate>,

    /// Print the view as JSON instead of tables.
    #[arg(long)]
    pub json: bool,

    /// Bar chart width (columns).
    #[arg(long, default_value_t = 50)]
    pub width: usize,

    /// Export the daily totals to CSV.
    #[arg(long = "export-daily", value_name = "CSV")]
    pub export_daily: Option<PathBuf>,

    /// Export the full view to JSON.
    #[arg(long = "export-view", value_name = "JSON")]
    pub export_view: Option<PathBuf>,
}

/// Options for the TUI.
#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub data: DataArgs,
}

/// Options for the interactive file picker.
#[derive(Debug, Args, Clone)]
pub struct PickArgs {
    /// Season panel source: fixed demo counts or the dataset's `season` column.
    #[arg(long, value_enum, default_value_t = SeasonSource::Demo)]
    pub seasons: SeasonSource,

    #[command(flatten)]
    pub output: OutputArgs,
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| format!("{e} (expected YYYY-MM-DD)"))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn report_flags_parse() {
        let cli = Cli::try_parse_from([
            "bikes",
            "report",
            "-f",
            "day.csv",
            "--start",
            "2011-01-01",
            "--end",
            "2011-03-31",
            "--seasons",
            "dataset",
            "--json",
        ])
        .unwrap();

        let Command::Report(args) = cli.command else {
            panic!("expected report");
        };
        assert_eq!(args.data.data, PathBuf::from("day.csv"));
        assert_eq!(args.data.seasons, SeasonSource::Dataset);
        assert_eq!(args.output.start, NaiveDate::from_ymd_opt(2011, 1, 1));
        assert_eq!(args.output.end, NaiveDate::from_ymd_opt(2011, 3, 31));
        assert!(args.output.json);
        assert_eq!(args.output.width, 50);
    }

    #[test]
    fn bad_date_is_rejected() {
        assert!(Cli::try_parse_from(["bikes", "report", "--start", "01/01/2011"]).is_err());
    }
}
