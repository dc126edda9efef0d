//! Ratatui-based terminal dashboard.
//!
//! The TUI provides a settings panel for choosing a country, start date, and
//! horizon, then renders the forecast chart, the summary statistics, and the
//! monthly detail list.
//!
//! All state mutation happens on this thread. Worker threads only deliver
//! `AppEvent`s through the channel; the orchestrator's generation check runs
//! here, so a fetch that was superseded by a newer parameter change can never
//! overwrite the display.

use std::io;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, channel};
use std::thread;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::analytics::{
    Analytics, AnalyticsState, AppEvent, FetchOrchestrator, ParameterStore, Resolution,
};
use crate::cli::ForecastArgs;
use crate::data::api::ForecastClient;
use crate::domain::{CountrySelection, MonthlyPoint};
use crate::error::AppError;
use crate::report::{fmt_growth, month_name, thousands};

mod plotters_chart;

use plotters_chart::ForecastChart;

const EXPORT_PATH: &str = "tourcast_forecast.csv";

/// Start the TUI.
pub fn run(args: ForecastArgs) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(args);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
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

struct App {
    store: ParameterStore,
    orchestrator: FetchOrchestrator,
    analytics: Analytics,
    /// Origin-country catalog from the service (the aggregate is index 0 of
    /// the cycling order, not part of this list).
    countries: Vec<String>,
    country_index: usize,
    selected_field: usize,
    editing_year: bool,
    year_input: String,
    status: String,
    events_rx: Receiver<AppEvent>,
}

impl App {
    fn new(args: ForecastArgs) -> Self {
        let client = ForecastClient::from_env(args.api.api_url.as_deref());
        let params = crate::app::forecast_params_from_args(&args);

        let (events_tx, events_rx) = channel();
        let store = ParameterStore::new(params.clone(), events_tx.clone());
        let mut orchestrator =
            FetchOrchestrator::new(Arc::new(client.clone()), events_tx.clone());
        let mut analytics = Analytics::new();

        // The catalog loads once, in the background; until it arrives (or if
        // it never does) only the aggregate can be cycled to.
        thread::spawn(move || {
            let outcome = client.fetch_countries();
            let _ = events_tx.send(AppEvent::CountriesLoaded(outcome));
        });

        orchestrator.dispatch(&params, &mut analytics);

        Self {
            store,
            orchestrator,
            analytics,
            countries: Vec::new(),
            country_index: 0,
            selected_field: 0,
            editing_year: false,
            year_input: String::new(),
            status: "Fetching forecast...".to_string(),
            events_rx,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            while let Ok(event) = self.events_rx.try_recv() {
                self.handle_app_event(event);
                needs_redraw = true;
            }

            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
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

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ParamsChanged(params) => {
                self.orchestrator.dispatch(&params, &mut self.analytics);
                self.status = format!(
                    "Fetching forecast for {}...",
                    params.country.display_name()
                );
            }
            AppEvent::FetchFinished {
                generation,
                outcome,
            } => {
                let resolution =
                    self.orchestrator
                        .resolve(generation, outcome, &mut self.analytics);
                // Stale completions belong to superseded parameters; the
                // display stays exactly as it is.
                if resolution == Resolution::Applied {
                    self.status = self.result_status();
                }
            }
            AppEvent::CountriesLoaded(Ok(list)) => {
                self.countries = list;
                self.sync_country_index();
                self.status = format!("{} countries available.", self.countries.len());
            }
            AppEvent::CountriesLoaded(Err(err)) => {
                self.status = format!("Country list unavailable: {err}");
            }
        }
    }

    fn result_status(&self) -> String {
        match self.analytics.state() {
            AnalyticsState::Ready { series, .. } if series.is_empty() => {
                "Forecast returned no data.".to_string()
            }
            AnalyticsState::Ready { series, .. } => {
                format!("Loaded {} months.", series.len())
            }
            AnalyticsState::Failed { message } => format!("{message} (press r to retry)"),
            _ => String::new(),
        }
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        if self.editing_year {
            return self.handle_year_edit(code);
        }

        match code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field < 3 {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Enter => {
                if self.selected_field == 1 {
                    self.editing_year = true;
                    self.year_input.clear();
                    self.status =
                        "Editing start year. Enter to apply, Esc to cancel.".to_string();
                }
            }
            KeyCode::Char('r') => {
                let params = self.store.current().clone();
                self.orchestrator.dispatch(&params, &mut self.analytics);
                self.status = "Refreshing forecast...".to_string();
            }
            KeyCode::Char('e') => {
                let series = self.analytics.series();
                if series.is_empty() {
                    self.status = "No forecast data to export.".to_string();
                } else {
                    match crate::io::write_forecast_csv(
                        std::path::Path::new(EXPORT_PATH),
                        series,
                        self.store.current(),
                    ) {
                        Ok(()) => self.status = format!("Wrote {EXPORT_PATH}"),
                        Err(err) => self.status = format!("Export failed: {err}"),
                    }
                }
            }
            KeyCode::Char('d') => {
                match crate::debug::write_debug_bundle(self.store.current(), &self.analytics) {
                    Ok(path) => {
                        self.status = format!("Wrote debug bundle: {}", path.display());
                    }
                    Err(err) => {
                        self.status = format!("Debug write failed: {err}");
                    }
                }
            }
            _ => {}
        }

        Ok(false)
    }

    fn handle_year_edit(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Esc => {
                self.editing_year = false;
                self.status = "Year edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing_year = false;
                self.apply_year_input();
            }
            KeyCode::Backspace => {
                self.year_input.pop();
            }
            KeyCode::Char(c) => {
                if c.is_ascii_digit() || c == '-' {
                    self.year_input.push(c);
                }
            }
            _ => {}
        }
        Ok(false)
    }

    fn apply_year_input(&mut self) {
        let trimmed = self.year_input.trim();
        if trimmed.is_empty() {
            self.status = "Year unchanged.".to_string();
            return;
        }
        // Any integer flows through to the service unclamped; the service's
        // rejection comes back as a normal failure state.
        match trimmed.parse::<i32>() {
            Ok(year) => {
                self.store.set_start_year(year);
                self.status = format!("start year: {year}");
            }
            Err(e) => {
                self.status = format!("Invalid year '{trimmed}': {e}");
            }
        }
    }

    fn adjust_field(&mut self, delta: i32) {
        match self.selected_field {
            0 => {
                let len = (self.countries.len() + 1) as i32;
                if len > 1 {
                    self.country_index =
                        (self.country_index as i32 + delta).rem_euclid(len) as usize;
                    let selection = self.selection_at(self.country_index);
                    self.store.set_country(selection);
                }
            }
            1 => {
                let year = self.store.current().start_year;
                self.store.set_start_year(year + delta.signum());
            }
            2 => {
                let month = self.store.current().start_month as i32;
                let next = (month - 1 + delta.signum()).rem_euclid(12) + 1;
                self.store.set_start_month(next as u32);
            }
            3 => {
                let horizon = self.store.current().horizon;
                let next = if delta >= 0 {
                    horizon.next()
                } else {
                    horizon.prev()
                };
                self.store.set_horizon(next);
            }
            _ => {}
        }
    }

    fn selection_at(&self, index: usize) -> CountrySelection {
        if index == 0 {
            CountrySelection::Total
        } else {
            CountrySelection::Named(self.countries[index - 1].clone())
        }
    }

    /// Point the cycling cursor at the store's current country once the
    /// catalog arrives (it may have been set from the CLI before the list
    /// existed).
    fn sync_country_index(&mut self) {
        self.country_index = match &self.store.current().country {
            CountrySelection::Total => 0,
            CountrySelection::Named(name) => self
                .countries
                .iter()
                .position(|c| c.eq_ignore_ascii_case(name))
                .map(|i| i + 1)
                .unwrap_or(0),
        };
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let params = self.store.current();
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("tourcast", Style::default().fg(Color::Cyan)),
            Span::raw(" - tourism arrival forecasts"),
        ]));

        let state_tag = match self.analytics.state() {
            AnalyticsState::Idle => "idle",
            AnalyticsState::Loading => "loading",
            AnalyticsState::Ready { .. } => "ready",
            AnalyticsState::Failed { .. } => "failed",
        };

        lines.push(Line::from(Span::styled(
            format!(
                "country: {} | start: {} {} | horizon: {}m | {state_tag}",
                params.country.display_name(),
                month_name(params.start_month),
                params.start_year,
                params.horizon.months(),
            ),
            Style::default().fg(Color::Gray),
        )));

        let stats = self.analytics.stats();
        lines.push(Line::from(Span::styled(
            format!(
                "total: {} | avg monthly: {} | peak: {} | growth: {}",
                thousands(stats.total_arrivals),
                thousands(stats.avg_monthly),
                stats.peak_label,
                fmt_growth(stats.growth_percent),
            ),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(9)])
            .split(area);

        self.draw_chart(frame, chunks[0]);

        let panels = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(36), Constraint::Min(0)])
            .split(chunks[1]);

        self.draw_settings(frame, panels[0]);
        self.draw_detail(frame, panels[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title("Forecast arrivals")
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let message = match self.analytics.state() {
            AnalyticsState::Idle => Some(("Waiting for data...", Color::Yellow)),
            AnalyticsState::Loading => Some(("Fetching forecast...", Color::Yellow)),
            AnalyticsState::Failed { message } => Some((message.as_str(), Color::Red)),
            AnalyticsState::Ready { series, .. } if series.is_empty() => {
                Some(("No forecast data returned.", Color::Yellow))
            }
            AnalyticsState::Ready { .. } => None,
        };

        if let Some((text, color)) = message {
            let msg = Paragraph::new(text)
                .style(Style::default().fg(color))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        }

        let series = self.analytics.series();
        let (points, peak, labels, x_bounds, y_bounds) = chart_series(series);

        let widget = ForecastChart {
            points: &points,
            peak,
            labels: &labels,
            x_bounds,
            y_bounds,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let params = self.store.current();
        let year_label = if self.editing_year {
            format!("{}_", self.year_input)
        } else {
            params.start_year.to_string()
        };

        let items = vec![
            ListItem::new(format!("Country: {}", params.country.display_name())),
            ListItem::new(format!("Start year: {year_label}")),
            ListItem::new(format!(
                "Start month: {} ({})",
                params.start_month,
                month_name(params.start_month)
            )),
            ListItem::new(format!("Horizon: {} months", params.horizon.months())),
        ];

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);

        if self.editing_year {
            let hint = Paragraph::new("Editing year…").style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
            let rect = Rect {
                x: area.x + 2,
                y: area.y + area.height.saturating_sub(2),
                width: area.width.saturating_sub(4),
                height: 1,
            };
            frame.render_widget(hint, rect);
        }
    }

    fn draw_detail(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let series = self.analytics.series();
        let items: Vec<ListItem> = if series.is_empty() {
            vec![ListItem::new(Span::styled(
                "-",
                Style::default().fg(Color::Gray),
            ))]
        } else {
            series
                .iter()
                .map(|p| {
                    ListItem::new(format!(
                        "{}  {:>14}",
                        p.label,
                        thousands(p.arrivals.round() as u64)
                    ))
                })
                .collect()
        };

        let list = List::new(items)
            .block(Block::default().title("Monthly detail").borders(Borders::ALL));
        frame.render_widget(list, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  Enter edit year  r refresh  e export  d debug  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Build chart series for Plotters.
fn chart_series(
    series: &[MonthlyPoint],
) -> (
    Vec<(f64, f64)>,
    Option<(f64, f64)>,
    Vec<String>,
    [f64; 2],
    [f64; 2],
) {
    let points: Vec<(f64, f64)> = series
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.arrivals))
        .collect();

    let labels: Vec<String> = series.iter().map(|p| p.label.clone()).collect();

    // Strictly-greater scan so the highlighted peak matches the statistics
    // engine's first-occurrence tie-break.
    let mut peak: Option<(f64, f64)> = None;
    for &(x, y) in &points {
        if peak.is_none_or(|(_, best)| y > best) {
            peak = Some((x, y));
        }
    }

    let x_max = (series.len().saturating_sub(1)).max(1) as f64;
    let x_bounds = [0.0, x_max];

    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(_, y) in &points {
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
        y_max = y_min.max(0.0) + 1.0;
        y_min = (y_max - 2.0).max(0.0);
    }

    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    let y_bounds = [(y_min - pad).max(0.0), y_max + pad];

    (points, peak, labels, x_bounds, y_bounds)
}
