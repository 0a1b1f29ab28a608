//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - installs logging for the chosen front-end
//! - loads the dataset and renders the selected range
//! - prints reports or launches the TUI
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, DataArgs, OutputArgs, PickArgs, ReportArgs, TuiArgs};
use crate::domain::ReportConfig;
use crate::error::AppError;
use crate::logging::LogTarget;

pub mod pipeline;

/// Entry point for the `bikes` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // `bikes` and `bikes -f day.csv` behave like `bikes tui ...`. Clap requires
    // a subcommand name, so argv is rewritten before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Report(args) => with_logging(LogTarget::Stderr, || handle_report(args)),
        Command::Pick(args) => with_logging(LogTarget::Stderr, || handle_pick(args)),
        Command::Tui(args) => with_logging(LogTarget::File, || handle_tui(args)),
    }
}

/// Run `f` with logging installed, recording a failure before the file
/// writer is flushed.
fn with_logging(
    target: LogTarget,
    f: impl FnOnce() -> Result<(), AppError>,
) -> Result<(), AppError> {
    let _guard = crate::logging::init(target)?;
    let result = f();
    if let Err(err) = &result {
        tracing::error!(exit_code = err.exit_code(), "{err}");
    }
    result
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let config = report_config(&args.data, &args.output);
    print_report(&config)
}

fn handle_pick(args: PickArgs) -> Result<(), AppError> {
    let path = crate::cli::picker::prompt_for_csv_path()?;
    let data = DataArgs {
        data: path,
        seasons: args.seasons,
    };
    let config = report_config(&data, &args.output);
    print_report(&config)
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    let config = ReportConfig {
        data_path: args.data.data,
        season_source: args.data.seasons,
        ..ReportConfig::default()
    };
    crate::tui::run(&config)
}

fn print_report(config: &ReportConfig) -> Result<(), AppError> {
    let run = pipeline::run_report(config)?;

    if config.json {
        println!("{}", crate::io::view_to_json(&run.view)?);
    } else {
        let source = run.session.dataset().source.display().to_string();
        print!(
            "{}",
            crate::report::format_report(&run.view, &source, config.chart_width)
        );
    }

    // Optional exports.
    if let Some(path) = &config.export_daily {
        crate::io::export::write_daily_csv(path, &run.view.daily)?;
    }
    if let Some(path) = &config.export_view {
        crate::io::view::write_view_json(path, &run.view)?;
    }

    Ok(())
}

pub fn report_config(data: &DataArgs, output: &OutputArgs) -> ReportConfig {
    ReportConfig {
        data_path: data.data.clone(),
        start: output.start,
        end: output.end,
        season_source: data.seasons,
        json: output.json,
        chart_width: output.width,
        export_daily: output.export_daily.clone(),
        export_view: output.export_view.clone(),
    }
}

/// Rewrite argv so `bikes` defaults to `bikes tui`.
///
/// Rules:
/// - `bikes`                       -> `bikes tui`
/// - `bikes -f day.csv ...`        -> `bikes tui -f day.csv ...`
/// - `bikes --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
    }
    argv
}
