//! Ratatui-based dashboard.
//!
//! A settings panel picks the date range (bounded by the dataset span), and
//! every change re-renders the view: the "Total Orders" metric, the
//! weekday/weekend bar chart, the season bar chart, and the daily trend.

use std::io;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, List, ListItem, Paragraph},
};
use tracing::{debug, info};

use crate::app::pipeline::Session;
use crate::domain::{DateRange, ReportConfig, SeasonSource, shift_date};
use crate::error::AppError;
use crate::report::{ViewModel, fmt_count};

mod plotters_chart;

use plotters_chart::TrendChart;

const WEEKDAY_COLOR: Color = Color::Rgb(0x66, 0xb3, 0xff);
const WEEKEND_COLOR: Color = Color::Rgb(0xff, 0x99, 0x99);
const SEASON_COLOR: Color = Color::Rgb(0xa3, 0xc1, 0xad);
const SEASON_TOP_COLOR: Color = Color::Rgb(0x4e, 0x84, 0xc4);

/// Days moved by `[` / `]`.
const BIG_STEP_DAYS: i64 = 30;

/// Start the TUI.
///
/// The dataset is loaded before the terminal switches to raw mode so load
/// errors print normally.
pub fn run(config: &ReportConfig) -> Result<(), AppError> {
    let session = Session::load(config)?;
    let mut app = App::new(session)?;

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::terminal(format!("Failed to initialize terminal: {e}")))?;

    info!("tui started");
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::terminal(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::terminal(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Which range bound the settings cursor is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Start,
    End,
}

struct App {
    session: Session,
    range: Option<DateRange>,
    season_source: SeasonSource,
    field: Field,
    editing: bool,
    date_input: String,
    status: String,
    view: ViewModel,
}

impl App {
    fn new(session: Session) -> Result<Self, AppError> {
        let range = session.span();
        let season_source = session.season_source();
        let view = session.view_with(range, season_source)?;
        let status = match range {
            Some(span) => format!("Loaded {} records ({span}).", session.dataset().len()),
            None => "Dataset is empty.".to_string(),
        };
        Ok(Self {
            session,
            range,
            season_source,
            field: Field::Start,
            editing: false,
            date_input: String::new(),
            status,
            view,
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::terminal(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::terminal(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::terminal(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        if self.editing {
            return self.handle_date_edit(code);
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Up => self.field = Field::Start,
            KeyCode::Down => self.field = Field::End,
            KeyCode::Left => self.step(-1)?,
            KeyCode::Right => self.step(1)?,
            KeyCode::Char('[') => self.step(-BIG_STEP_DAYS)?,
            KeyCode::Char(']') => self.step(BIG_STEP_DAYS)?,
            KeyCode::Enter => {
                if let Some(date) = self.current_bound() {
                    self.editing = true;
                    self.date_input = date.to_string();
                    self.status = "Editing date (YYYY-MM-DD). Enter to apply, Esc to cancel.".to_string();
                }
            }
            KeyCode::Char('a') => {
                self.range = self.session.span();
                self.refresh()?;
                self.status = "Range reset to the full dataset.".to_string();
            }
            KeyCode::Char('s') => self.toggle_seasons()?,
            _ => {}
        }

        Ok(false)
    }

    fn handle_date_edit(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Esc => {
                self.editing = false;
                self.status = "Date edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing = false;
                self.apply_date_input()?;
            }
            KeyCode::Backspace => {
                self.date_input.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => {
                self.date_input.push(c);
            }
            _ => {}
        }
        Ok(false)
    }

    fn current_bound(&self) -> Option<NaiveDate> {
        let range = self.range?;
        Some(match self.field {
            Field::Start => range.start,
            Field::End => range.end,
        })
    }

    fn step(&mut self, days: i64) -> Result<(), AppError> {
        let Some(date) = self.current_bound() else {
            return Ok(());
        };
        self.set_bound(shift_date(date, days))
    }

    fn apply_date_input(&mut self) -> Result<(), AppError> {
        match crate::domain::parse_user_date(&self.date_input) {
            Ok(date) => self.set_bound(date),
            Err(err) => {
                self.status = err.to_string();
                Ok(())
            }
        }
    }

    /// Move the selected bound to `date`, clamped to the dataset span. The
    /// other bound is dragged along so `start <= end` always holds.
    fn set_bound(&mut self, date: NaiveDate) -> Result<(), AppError> {
        let (Some(span), Some(range)) = (self.session.span(), self.range) else {
            return Ok(());
        };
        let next = match self.field {
            Field::Start => DateRange::new(date, range.end.max(date)),
            Field::End => DateRange::new(range.start.min(date), date),
        }
        .clamp_to(&span);
        self.range = Some(next);
        self.refresh()?;
        self.status = format!("range: {next}");
        Ok(())
    }

    fn toggle_seasons(&mut self) -> Result<(), AppError> {
        let next = self.season_source.toggle();
        if next == SeasonSource::Dataset && !self.session.dataset().has_season {
            self.status = "This file has no `season` column; showing demo seasons.".to_string();
            return Ok(());
        }
        self.season_source = next;
        self.refresh()?;
        self.status = format!("seasons: {}", next.display_name());
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), AppError> {
        self.view = self.session.view_with(self.range, self.season_source)?;
        debug!(range = ?self.range, total = self.view.total_rentals, "view refreshed");
        Ok(())
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let span = self
            .session
            .span()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        let lines = vec![
            Line::from(vec![
                Span::styled("bikes", Style::default().fg(Color::Cyan)),
                Span::raw(" - Bike Sharing Dashboard"),
            ]),
            Line::from(Span::styled(
                format!(
                    "source: {} | span: {span} | records: {} | all-time rentals: {}",
                    self.session.dataset().source.display(),
                    self.session.dataset().len(),
                    crate::report::fmt_count(self.session.dataset().total())
                ),
                Style::default().fg(Color::Gray),
            )),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(32), Constraint::Min(0)])
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Min(0)])
            .split(columns[0]);
        self.draw_settings(frame, left[0]);
        self.draw_metric(frame, left[1]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[1]);
        let charts = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(right[0]);

        self.draw_day_types(frame, charts[0]);
        self.draw_seasons(frame, charts[1]);
        self.draw_trend(frame, right[1]);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let (start, end) = match self.range {
            Some(r) => (r.start.to_string(), r.end.to_string()),
            None => ("-".to_string(), "-".to_string()),
        };
        let items = vec![
            ListItem::new(format!("Start:   {start}")),
            ListItem::new(format!("End:     {end}")),
            ListItem::new(format!("Seasons: {}", self.season_source.display_name())),
        ];

        let list = List::new(items)
            .block(Block::default().title("Date range").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(match self.field {
            Field::Start => 0,
            Field::End => 1,
        }));
        frame.render_stateful_widget(list, area, &mut state);

        if self.editing {
            let hint = Paragraph::new(format!("> {}_", self.date_input))
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
            let rect = Rect {
                x: area.x + 2,
                y: area.y + area.height.saturating_sub(2),
                width: area.width.saturating_sub(4),
                height: 1,
            };
            frame.render_widget(hint, rect);
        }
    }

    fn draw_metric(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let days = self.view.range.map(|r| r.num_days()).unwrap_or(0);
        let lines = vec![
            Line::from(Span::styled("Total Orders", Style::default().fg(Color::Gray))),
            Line::from(Span::styled(
                fmt_count(self.view.total_rentals),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("days: {days} | with data: {}", self.view.daily.len()),
                Style::default().fg(Color::Gray),
            )),
            Line::from(Span::styled(
                format!("records: {}", self.view.records),
                Style::default().fg(Color::Gray),
            )),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().title("Metric").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_day_types(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Weekday vs Weekend").borders(Borders::ALL);
        let inner = block.inner(area);

        let bars: Vec<Bar> = self
            .view
            .day_types
            .iter()
            .zip([WEEKDAY_COLOR, WEEKEND_COLOR])
            .map(|(t, color)| {
                Bar::default()
                    .value(t.total_rentals)
                    .label(Line::from(t.day_type.label()))
                    .text_value(fmt_count(t.total_rentals))
                    .style(Style::default().fg(color))
                    .value_style(Style::default().fg(Color::Black).bg(color))
            })
            .collect();

        let gap = 2u16;
        let bar_width = (inner.width.saturating_sub(gap + 2) / 2).clamp(3, 20);
        let chart = BarChart::default()
            .block(block)
            .data(BarGroup::default().bars(&bars))
            .bar_width(bar_width)
            .bar_gap(gap);
        frame.render_widget(chart, area);
    }

    fn draw_seasons(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = match self.season_source {
            SeasonSource::Demo => "Rentals by season (demo)",
            SeasonSource::Dataset => "Rentals by season",
        };
        let last = self.view.seasons.len().saturating_sub(1);
        let bars: Vec<Bar> = self
            .view
            .seasons
            .iter()
            .enumerate()
            .map(|(idx, s)| {
                // Rows are ascending, so the last one is the largest.
                let color = if idx == last { SEASON_TOP_COLOR } else { SEASON_COLOR };
                Bar::default()
                    .value(s.total_rentals)
                    .label(Line::from(s.season.label()))
                    .text_value(fmt_count(s.total_rentals))
                    .style(Style::default().fg(color))
                    .value_style(Style::default().fg(Color::Black).bg(color))
            })
            .collect();

        let chart = BarChart::default()
            .block(Block::default().title(title).borders(Borders::ALL))
            .direction(Direction::Horizontal)
            .data(BarGroup::default().bars(&bars))
            .bar_width(1)
            .bar_gap(1);
        frame.render_widget(chart, area);
    }

    fn draw_trend(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Daily rentals").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some((series, x_bounds, y_bounds)) = trend_series(&self.view) else {
            let msg = Paragraph::new("No rentals in the selected range.")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        let widget = TrendChart {
            series: &series,
            x_bounds,
            y_bounds,
            x_label: "date",
            y_label: "rentals",
            fmt_x: fmt_axis_date,
            fmt_y: fmt_axis_count,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ start/end  ←/→ ±1 day  [/] ±30 days  Enter type date  a all  s seasons  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Daily totals as `(day number, rentals)` plus chart bounds, or `None` when
/// there is nothing to plot.
fn trend_series(view: &ViewModel) -> Option<(Vec<(f64, f64)>, [f64; 2], [f64; 2])> {
    if view.daily.is_empty() {
        return None;
    }

    let series: Vec<(f64, f64)> = view
        .daily
        .iter()
        .map(|t| (f64::from(t.date.num_days_from_ce()), t.total_rentals as f64))
        .collect();

    let x0 = series.first()?.0;
    let x1 = series.last()?.0;
    // A single day still needs a non-empty x range.
    let x_bounds = if x1 > x0 { [x0, x1] } else { [x0 - 1.0, x1 + 1.0] };

    let y_max = series.iter().map(|&(_, y)| y).fold(0.0, f64::max);
    let y_bounds = if y_max > 0.0 { [0.0, y_max * 1.05] } else { [0.0, 1.0] };

    Some((series, x_bounds, y_bounds))
}

fn fmt_axis_date(v: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(v.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn fmt_axis_count(v: f64) -> String {
    format!("{v:.0}")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use ratatui::backend::TestBackend;

    use super::*;
    use crate::domain::{Dataset, RentalRecord, Season};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn app(has_season: bool) -> App {
        let records = (1..=31)
            .map(|day| RentalRecord {
                date: d(2011, 1, day),
                weekday_index: ((day + 4) % 7) as u8,
                count: 100,
                season: has_season.then_some(Season::Winter),
            })
            .collect();
        let ds = Dataset::new(PathBuf::from("mem.csv"), records, has_season);
        App::new(Session::new(ds, SeasonSource::Demo)).unwrap()
    }

    fn screen(buf: &ratatui::buffer::Buffer) -> String {
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn starts_on_full_span() {
        let app = app(false);
        assert_eq!(app.range, Some(DateRange::new(d(2011, 1, 1), d(2011, 1, 31))));
        assert_eq!(app.view.total_rentals, 3100);
    }

    #[test]
    fn arrows_move_selected_bound_and_rerender() {
        let mut app = app(false);
        app.handle_key(KeyCode::Right).unwrap();
        assert_eq!(app.range.unwrap().start, d(2011, 1, 2));
        assert_eq!(app.view.total_rentals, 3000);

        app.handle_key(KeyCode::Down).unwrap();
        app.handle_key(KeyCode::Left).unwrap();
        assert_eq!(app.range.unwrap().end, d(2011, 1, 30));
        assert_eq!(app.view.total_rentals, 2900);
    }

    #[test]
    fn bounds_stay_inside_span_and_ordered() {
        let mut app = app(false);
        app.handle_key(KeyCode::Left).unwrap();
        assert_eq!(app.range.unwrap().start, d(2011, 1, 1));

        // Pushing start past end drags end along.
        app.handle_key(KeyCode::Char(']')).unwrap();
        app.handle_key(KeyCode::Char(']')).unwrap();
        let r = app.range.unwrap();
        assert_eq!(r, DateRange::single(d(2011, 1, 31)));
        assert_eq!(app.view.total_rentals, 100);

        app.handle_key(KeyCode::Char('a')).unwrap();
        assert_eq!(app.view.total_rentals, 3100);
    }

    #[test]
    fn typed_date_applies_on_enter() {
        let mut app = app(false);
        app.handle_key(KeyCode::Down).unwrap();
        app.handle_key(KeyCode::Enter).unwrap();
        assert!(app.editing);
        for _ in 0..2 {
            app.handle_key(KeyCode::Backspace).unwrap();
        }
        app.handle_key(KeyCode::Char('1')).unwrap();
        app.handle_key(KeyCode::Char('0')).unwrap();
        app.handle_key(KeyCode::Enter).unwrap();

        assert!(!app.editing);
        assert_eq!(app.range.unwrap().end, d(2011, 1, 10));
        assert_eq!(app.view.total_rentals, 1000);
    }

    #[test]
    fn typed_date_outside_span_is_clamped() {
        let mut app = app(false);
        app.handle_key(KeyCode::Down).unwrap();
        app.handle_key(KeyCode::Enter).unwrap();
        for _ in 0..10 {
            app.handle_key(KeyCode::Backspace).unwrap();
        }
        for c in "2012-05-01".chars() {
            app.handle_key(KeyCode::Char(c)).unwrap();
        }
        app.handle_key(KeyCode::Enter).unwrap();
        assert_eq!(app.range, Some(DateRange::new(d(2011, 1, 1), d(2011, 1, 31))));

        // An end before the span collapses onto the first day.
        app.set_bound(d(2010, 6, 1)).unwrap();
        assert_eq!(app.range, Some(DateRange::single(d(2011, 1, 1))));
        assert_eq!(app.view.total_rentals, 100);
    }

    #[test]
    fn bad_typed_date_only_sets_status() {
        let mut app = app(false);
        app.handle_key(KeyCode::Enter).unwrap();
        app.handle_key(KeyCode::Backspace).unwrap();
        app.handle_key(KeyCode::Enter).unwrap();
        assert!(app.status.starts_with("Invalid date"), "{}", app.status);
        assert_eq!(app.view.total_rentals, 3100);
    }

    #[test]
    fn season_toggle_needs_season_column() {
        let mut without = app(false);
        without.handle_key(KeyCode::Char('s')).unwrap();
        assert_eq!(without.season_source, SeasonSource::Demo);

        let mut with = app(true);
        with.handle_key(KeyCode::Char('s')).unwrap();
        assert_eq!(with.season_source, SeasonSource::Dataset);
        let winter = with.view.seasons.iter().find(|s| s.season == Season::Winter).unwrap();
        assert_eq!(winter.total_rentals, 3100);
    }

    #[test]
    fn quit_keys() {
        let mut app = app(false);
        assert!(!app.handle_key(KeyCode::Char('x')).unwrap());
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }

    #[test]
    fn trend_series_bounds() {
        let mut app = app(false);
        let (series, x, y) = trend_series(&app.view).unwrap();
        assert_eq!(series.len(), 31);
        assert_eq!(x[1] - x[0], 30.0);
        assert!((y[1] - 105.0).abs() < 1e-9);
        assert_eq!(fmt_axis_date(x[0]), "2011-01-01");

        app.range = Some(DateRange::new(d(2012, 1, 1), d(2012, 1, 2)));
        app.refresh().unwrap();
        assert!(trend_series(&app.view).is_none());
    }

    #[test]
    fn header_shows_all_time_total() {
        let app = app(false);
        let mut terminal = Terminal::new(TestBackend::new(110, 4)).unwrap();
        terminal
            .draw(|f| app.draw_header(f, f.area()))
            .unwrap();
        let text = screen(terminal.backend().buffer());
        assert!(text.contains("records: 31"), "{text}");
        assert!(text.contains("all-time rentals: 3,100"), "{text}");
    }

    #[test]
    fn metric_and_day_type_panels_render() {
        let app = app(false);
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                let halves = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Length(30), Constraint::Min(0)])
                    .split(area);
                app.draw_metric(f, halves[0]);
                app.draw_day_types(f, halves[1]);
            })
            .unwrap();

        let text = screen(terminal.backend().buffer());
        assert!(text.contains("Total Orders"));
        assert!(text.contains("3,100"));
        assert!(text.contains("Weekday"));
        assert!(text.contains("Weekend"));
    }
}
