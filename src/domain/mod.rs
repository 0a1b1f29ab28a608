//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the loaded records and dataset (`RentalRecord`, `Dataset`)
//! - date selection (`DateRange`)
//! - aggregate rows (`DailyTotal`, `DayTypeTotal`, `SeasonTotal`)
//! - run configuration (`ReportConfig`, `SeasonSource`)

pub mod types;

pub use types::*;
