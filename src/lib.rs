//! `bike-rentals` library crate.
//!
//! The binary (`bikes`) is a thin wrapper around this library so that:
//!
//! - the loading and aggregation core is testable without spawning processes
//! - the text report and the TUI share one `load -> filter -> aggregate` path
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod tui;
