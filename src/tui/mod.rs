//! Ratatui-based terminal UI.
//!
//! The TUI is a live form over `ValuationInputs`: edits are debounced and fed
//! to the same engine as `dcf value`, and the results panel (key figures,
//! FCF chart, sensitivity grid) follows along. Side panels cover the WACC
//! helper, saved scenarios, CSV import and the AI collaborators.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
    Terminal,
};

use crate::data::{AssumptionAdvisor, GrowthAssumptions, GrowthScenario, ServiceConfig, Summarizer, ValuationSummary};
use crate::domain::{InputMode, SavedScenario, ValuationInputs, ValuationResult};
use crate::engine::{compute_valuation, discounted_series, WaccInputs};
use crate::error::AppError;
use crate::io::{apply_fcf_values, discover_csv_files, encode_share_link, load_fcf_csv, ScenarioStore, DEFAULT_SHARE_BASE_URL};
use crate::report::{format_currency, format_percent};

pub mod debounce;
mod form;
mod plotters_chart;

use debounce::Debouncer;
use form::{visible_fields, Field, WaccField};
use plotters_chart::FcfPlottersChart;

/// How deep the CSV import picker searches below the working directory.
const CSV_SEARCH_DEPTH: usize = 3;

/// Start the TUI with `inputs` preloaded.
pub fn run(inputs: ValuationInputs, store: ScenarioStore, services: ServiceConfig) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(inputs, store, services);
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

/// Modal panel drawn over the results area.
enum Panel {
    None,
    Wacc { selected: usize },
    Scenarios { items: Vec<SavedScenario>, selected: usize },
    CsvPicker { files: Vec<PathBuf>, selected: usize },
    Assumptions(GrowthAssumptions),
    Summary(ValuationSummary),
}

/// Blocking network work, run after the "fetching" status has been drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Job {
    Assumptions,
    Summary,
}

struct App {
    inputs: ValuationInputs,
    /// Result for the inputs as of the last debounce firing.
    result: ValuationResult,
    debouncer: Debouncer,
    selected: usize,
    /// Text being typed into the selected field, if editing.
    edit: Option<String>,
    panel: Panel,
    wacc: WaccInputs,
    status: String,
    store: ScenarioStore,
    services: ServiceConfig,
    queued: Option<Job>,
}

impl App {
    fn new(inputs: ValuationInputs, store: ScenarioStore, services: ServiceConfig) -> Self {
        let result = compute_valuation(&inputs);
        Self {
            inputs,
            result,
            debouncer: Debouncer::default(),
            selected: 0,
            edit: None,
            panel: Panel::None,
            wacc: WaccInputs::default(),
            status: "Ready.".to_string(),
            store,
            services,
            queued: None,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            // The "fetching" status is on screen now, so the blocking call can run.
            if let Some(job) = self.queued.take() {
                self.run_job(job);
                needs_redraw = true;
                continue;
            }

            if self.debouncer.fire(Instant::now()) {
                self.recompute();
                needs_redraw = true;
                continue;
            }

            let timeout = self
                .debouncer
                .remaining(Instant::now())
                .unwrap_or(Duration::from_millis(100))
                .min(Duration::from_millis(100));
            if !event::poll(timeout).map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
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

    fn recompute(&mut self) {
        self.result = compute_valuation(&self.inputs);
        tracing::debug!(warnings = self.result.warnings.len(), "recomputed valuation");
    }

    /// Record that inputs changed; the result refreshes once typing pauses.
    fn touch(&mut self) {
        self.debouncer.touch(Instant::now());
    }

    /// Returns true when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.edit.is_some() {
            self.handle_edit(code);
            return false;
        }

        match self.panel {
            Panel::None => self.handle_form_key(code),
            _ => {
                self.handle_panel_key(code);
                false
            }
        }
    }

    fn handle_form_key(&mut self, code: KeyCode) -> bool {
        let fields = visible_fields(&self.inputs);
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < fields.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Left | KeyCode::Right => {
                if let Some(field) = fields.get(self.selected).copied() {
                    field.step(&mut self.inputs, if code == KeyCode::Right { 1 } else { -1 });
                    self.after_form_change();
                }
            }
            KeyCode::Enter => match fields.get(self.selected).copied() {
                Some(Field::Mode) => {
                    let mode = self.inputs.input_mode.toggle();
                    form::set_mode(&mut self.inputs, mode);
                    self.after_form_change();
                }
                Some(field) => {
                    self.edit = Some(field.display(&self.inputs));
                    self.status = format!("Editing {}. Enter to apply, Esc to cancel.", field.label().trim());
                }
                None => {}
            },
            KeyCode::Char('m') => {
                let mode = self.inputs.input_mode.toggle();
                form::set_mode(&mut self.inputs, mode);
                self.status = format!("mode: {}", self.inputs.input_mode.display_name());
                self.after_form_change();
            }
            KeyCode::Char('w') => {
                self.panel = Panel::Wacc { selected: 0 };
                self.status = "WACC helper: Enter edit, a apply, Esc close.".to_string();
            }
            KeyCode::Char('s') => self.save_scenario(),
            KeyCode::Char('l') => {
                let items = self.store.load();
                if items.is_empty() {
                    self.status = format!("No saved scenarios in {}.", self.store.path().display());
                } else {
                    self.panel = Panel::Scenarios { items, selected: 0 };
                    self.status = "Select a scenario: Enter load, Esc close.".to_string();
                }
            }
            KeyCode::Char('c') => {
                let files = discover_csv_files(Path::new("."), CSV_SEARCH_DEPTH);
                if files.is_empty() {
                    self.status = "No .csv files found under the current directory.".to_string();
                } else {
                    self.panel = Panel::CsvPicker { files, selected: 0 };
                    self.status = "Select a CSV: Enter import, Esc close.".to_string();
                }
            }
            KeyCode::Char('p') => {
                self.status = match encode_share_link(&self.inputs, DEFAULT_SHARE_BASE_URL) {
                    Ok(link) => link,
                    Err(err) => err.to_string(),
                };
            }
            KeyCode::Char('a') => {
                self.status = format!("Fetching AI assumptions for {}...", self.inputs.ticker);
                self.queued = Some(Job::Assumptions);
            }
            KeyCode::Char('v') => {
                self.status = format!("Fetching market price for {}...", self.inputs.ticker);
                self.queued = Some(Job::Summary);
            }
            _ => {}
        }
        false
    }

    fn after_form_change(&mut self) {
        let count = visible_fields(&self.inputs).len();
        self.selected = self.selected.min(count.saturating_sub(1));
        self.touch();
    }

    fn handle_edit(&mut self, code: KeyCode) {
        let Some(buffer) = self.edit.as_mut() else {
            return;
        };
        match code {
            KeyCode::Esc => {
                self.edit = None;
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(c) if !c.is_control() => buffer.push(c),
            KeyCode::Enter => {
                let text = self.edit.take().unwrap_or_default();
                let outcome = match self.panel {
                    Panel::Wacc { selected } => WaccField::ALL
                        .get(selected)
                        .map_or(Ok(()), |field| field.set(&mut self.wacc, &text)),
                    _ => visible_fields(&self.inputs)
                        .get(self.selected)
                        .map_or(Ok(()), |field| field.set(&mut self.inputs, &text)),
                };
                match outcome {
                    Ok(()) => {
                        self.status = "Updated.".to_string();
                        if matches!(self.panel, Panel::None) {
                            self.after_form_change();
                        }
                    }
                    Err(msg) => self.status = msg,
                }
            }
            _ => {}
        }
    }

    fn handle_panel_key(&mut self, code: KeyCode) {
        if code == KeyCode::Esc || code == KeyCode::Char('q') {
            self.panel = Panel::None;
            self.status = "Closed.".to_string();
            return;
        }

        let mut next_panel = None;
        match &mut self.panel {
            Panel::None => {}
            Panel::Wacc { selected } => match code {
                KeyCode::Up => *selected = selected.saturating_sub(1),
                KeyCode::Down => *selected = (*selected + 1).min(WaccField::ALL.len() - 1),
                KeyCode::Left | KeyCode::Right => {
                    if let Some(field) = WaccField::ALL.get(*selected) {
                        field.step(&mut self.wacc, if code == KeyCode::Right { 1 } else { -1 });
                    }
                }
                KeyCode::Enter => {
                    if let Some(field) = WaccField::ALL.get(*selected) {
                        self.edit = Some(field.get(&self.wacc).to_string());
                    }
                }
                KeyCode::Char('a') => {
                    let applied = self.wacc.apply_to(&mut self.inputs);
                    self.status = format!("Applied WACC {}.", format_percent(applied));
                    self.debouncer.touch(Instant::now());
                    next_panel = Some(Panel::None);
                }
                _ => {}
            },
            Panel::Scenarios { items, selected } => match code {
                KeyCode::Up => *selected = selected.saturating_sub(1),
                KeyCode::Down => *selected = (*selected + 1).min(items.len().saturating_sub(1)),
                KeyCode::Enter => {
                    if let Some(scenario) = items.get(*selected) {
                        match ValuationInputs::check_forecast_years(scenario.inputs.forecast_years) {
                            Ok(_) => {
                                self.inputs = scenario.inputs.clone();
                                self.status = format!("Scenario \"{}\" loaded.", scenario.name);
                                tracing::info!(id = %scenario.id, "loaded scenario in tui");
                                self.debouncer.touch(Instant::now());
                            }
                            Err(msg) => self.status = format!("Scenario \"{}\" not loaded: {msg}", scenario.name),
                        }
                    }
                    next_panel = Some(Panel::None);
                }
                _ => {}
            },
            Panel::CsvPicker { files, selected } => match code {
                KeyCode::Up => *selected = selected.saturating_sub(1),
                KeyCode::Down => *selected = (*selected + 1).min(files.len().saturating_sub(1)),
                KeyCode::Enter => {
                    if let Some(path) = files.get(*selected).cloned() {
                        self.status = match import_csv(&mut self.inputs, &path) {
                            Ok(()) => "FCF data loaded from CSV.".to_string(),
                            Err(err) => format!("Error: {err}"),
                        };
                        self.debouncer.touch(Instant::now());
                    }
                    next_panel = Some(Panel::None);
                }
                _ => {}
            },
            Panel::Assumptions(assumptions) => {
                let scenario = match code {
                    KeyCode::Char('1') => Some(GrowthScenario::Bull),
                    KeyCode::Char('2') => Some(GrowthScenario::Base),
                    KeyCode::Char('3') => Some(GrowthScenario::Bear),
                    _ => None,
                };
                if let Some(scenario) = scenario {
                    let rate = assumptions.case(scenario).rate;
                    form::set_mode(&mut self.inputs, InputMode::BaseGrowth);
                    self.inputs.fcf_growth_rate = rate;
                    self.status = format!("Applied {} growth {}.", scenario.display_name(), format_percent(rate));
                    self.debouncer.touch(Instant::now());
                    next_panel = Some(Panel::None);
                }
            }
            Panel::Summary(_) => {}
        }

        if let Some(panel) = next_panel {
            self.panel = panel;
            self.after_form_change();
        }
    }

    fn save_scenario(&mut self) {
        let name = if self.inputs.ticker.trim().is_empty() {
            "Untitled".to_string()
        } else {
            self.inputs.ticker.trim().to_string()
        };
        self.status = match self.store.save(&name, &self.inputs) {
            Ok(saved) => format!("Scenario \"{}\" saved.", saved.name),
            Err(err) => format!("Save failed: {err}"),
        };
    }

    fn run_job(&mut self, job: Job) {
        match job {
            Job::Assumptions => {
                let outcome = AssumptionAdvisor::new(&self.services).and_then(|a| a.generate(&self.inputs.ticker));
                match outcome {
                    Ok(assumptions) => {
                        self.panel = Panel::Assumptions(assumptions);
                        self.status = "1 bull, 2 base, 3 bear to apply; Esc close.".to_string();
                    }
                    Err(err) => self.status = format!("Error: {err}"),
                }
            }
            Job::Summary => {
                // Summarize what is on screen, not pending edits.
                self.recompute();
                let Some(per_share) = self.result.per_share() else {
                    self.status = "Fix the input warnings before requesting a summary.".to_string();
                    return;
                };
                let outcome =
                    Summarizer::new(&self.services).and_then(|s| s.summarize(&self.inputs.ticker, per_share));
                match outcome {
                    Ok(summary) => {
                        self.panel = Panel::Summary(summary);
                        self.status = "Esc to close.".to_string();
                    }
                    Err(err) => self.status = format!("Error: {err}"),
                }
            }
        }
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
        let mut lines: Vec<Line> = Vec::new();
        let pending = if self.debouncer.is_pending() { " (updating...)" } else { "" };
        lines.push(Line::from(vec![
            Span::styled("dcf", Style::default().fg(Color::Cyan)),
            Span::raw(format!(" | {} | {}", self.inputs.ticker, self.inputs.input_mode.display_name())),
            Span::styled(pending, Style::default().fg(Color::DarkGray)),
        ]));

        let per_share = self
            .result
            .per_share()
            .map(format_currency)
            .unwrap_or_else(|| "N/A".to_string());
        lines.push(Line::from(vec![
            Span::styled(
                format!(
                    "EV {} | Equity {} | ",
                    format_currency(self.result.enterprise_value * 1_000_000.0),
                    format_currency(self.result.equity_value * 1_000_000.0),
                ),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(
                format!("Value/share {per_share}"),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(44), Constraint::Min(0)])
            .split(area);

        self.draw_form(frame, columns[0]);

        let warnings = self.result.warnings.len() as u16;
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(9),
                Constraint::Length(if warnings > 0 { warnings + 2 } else { 0 }),
            ])
            .split(columns[1]);

        self.draw_chart(frame, right[0]);
        self.draw_sensitivity(frame, right[1]);
        if warnings > 0 {
            self.draw_warnings(frame, right[2]);
        }

        match &self.panel {
            Panel::None => {}
            Panel::Wacc { selected } => self.draw_wacc_panel(frame, columns[1], *selected),
            Panel::Scenarios { items, selected } => {
                let rows = items
                    .iter()
                    .map(|s| format!("{}  ({}, {})", s.name, s.inputs.ticker, s.id))
                    .collect();
                draw_picker(frame, columns[1], "Load Scenario", rows, *selected);
            }
            Panel::CsvPicker { files, selected } => {
                let rows = files
                    .iter()
                    .map(|p| p.strip_prefix(".").unwrap_or(p.as_path()).display().to_string())
                    .collect();
                draw_picker(frame, columns[1], "Import FCF CSV", rows, *selected);
            }
            Panel::Assumptions(a) => draw_assumptions(frame, columns[1], &self.inputs.ticker, a),
            Panel::Summary(s) => draw_summary(frame, columns[1], s),
        }
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let fields = visible_fields(&self.inputs);
        let editing_form = self.edit.is_some() && matches!(self.panel, Panel::None);

        let items: Vec<ListItem> = fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let value = match &self.edit {
                    Some(buffer) if editing_form && i == self.selected => format!("{buffer}_"),
                    _ => field.display(&self.inputs),
                };
                ListItem::new(format!("{:<20} {value}", field.label()))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Inputs").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title(Line::from(vec![
                Span::raw("FCF ($M): "),
                Span::styled("projected", Style::default().fg(Color::Cyan)),
                Span::raw(" vs "),
                Span::styled("discounted", Style::default().fg(Color::Green)),
            ]))
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(series) = chart_series(&self.result, self.inputs.discount_rate) else {
            let msg = Paragraph::new("No forecast years to chart.").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        frame.render_widget(
            FcfPlottersChart {
                projected: &series.projected,
                discounted: &series.discounted,
                x_bounds: series.x_bounds,
                y_bounds: series.y_bounds,
            },
            inner,
        );
    }

    fn draw_sensitivity(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let table = self.result.sensitivity_table();
        let base = self.result.intrinsic_value_per_share;

        let mut header = vec![Cell::from("WACC \\ g")];
        header.extend(table.growth_axis.iter().map(|g| Cell::from(format_percent(*g))));

        let rows = table.wacc_axis.iter().zip(&table.rows).map(|(wacc, row)| {
            let mut cells = vec![Cell::from(format_percent(*wacc)).style(Style::default().fg(Color::Gray))];
            cells.extend(row.iter().map(|cell| match cell.defined_value() {
                Some(v) => {
                    let color = if v > base { Color::Green } else { Color::Red };
                    Cell::from(format_currency(v)).style(Style::default().fg(color))
                }
                None => Cell::from("N/A").style(Style::default().fg(Color::DarkGray)),
            }));
            Row::new(cells)
        });

        let widths = [Constraint::Length(9); 6];
        let widget = Table::new(rows, widths)
            .header(Row::new(header).style(Style::default().add_modifier(Modifier::BOLD)))
            .column_spacing(2)
            .block(Block::default().title("Sensitivity: value per share").borders(Borders::ALL));
        frame.render_widget(widget, area);
    }

    fn draw_warnings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let lines: Vec<Line> = self
            .result
            .warnings
            .iter()
            .map(|w| Line::from(Span::styled(format!("! {w}"), Style::default().fg(Color::Yellow))))
            .collect();
        let p = Paragraph::new(lines)
            .block(Block::default().title("Input Warning").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        frame.render_widget(p, area);
    }

    fn draw_wacc_panel(&self, frame: &mut ratatui::Frame<'_>, area: Rect, selected: usize) {
        let rect = centered(area, 52, 14);
        frame.render_widget(Clear, rect);

        let editing = self.edit.as_ref();
        let mut items: Vec<ListItem> = WaccField::ALL
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let value = match editing {
                    Some(buffer) if i == selected => format!("{buffer}_"),
                    _ => field.get(&self.wacc).to_string(),
                };
                ListItem::new(format!("{:<26} {value}", field.label()))
            })
            .collect();

        let b = self.wacc.breakdown();
        items.push(ListItem::new(""));
        items.push(ListItem::new(format!(
            "Ke {}  Kd(after tax) {}",
            format_percent(b.cost_of_equity),
            format_percent(b.after_tax_cost_of_debt)
        )));
        items.push(ListItem::new(Span::styled(
            format!("Calculated WACC {}", format_percent(b.wacc)),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));

        let list = List::new(items)
            .block(Block::default().title("WACC Helper").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");
        let mut state = ListState::default();
        state.select(Some(selected));
        frame.render_stateful_widget(list, rect, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  Enter edit  m mode  w wacc  s save  l load  c csv  p link  a ai  v summary  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn import_csv(inputs: &mut ValuationInputs, path: &Path) -> Result<(), AppError> {
    let values = load_fcf_csv(path)?;
    apply_fcf_values(inputs, values)
}

fn draw_picker(frame: &mut ratatui::Frame<'_>, area: Rect, title: &str, rows: Vec<String>, selected: usize) {
    let height = (rows.len() as u16 + 2).min(area.height);
    let rect = centered(area, area.width.saturating_sub(4).min(70), height);
    frame.render_widget(Clear, rect);

    let list = List::new(rows.into_iter().map(ListItem::new).collect::<Vec<_>>())
        .block(Block::default().title(title.to_string()).borders(Borders::ALL))
        .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
        .highlight_symbol("» ");
    let mut state = ListState::default();
    state.select(Some(selected));
    frame.render_stateful_widget(list, rect, &mut state);
}

fn draw_assumptions(frame: &mut ratatui::Frame<'_>, area: Rect, ticker: &str, assumptions: &GrowthAssumptions) {
    let rect = centered(area, area.width.saturating_sub(4).min(80), area.height.saturating_sub(2).min(16));
    frame.render_widget(Clear, rect);

    let mut lines = Vec::new();
    for (key, scenario) in ["1", "2", "3"].into_iter().zip(GrowthScenario::ALL) {
        let case = assumptions.case(scenario);
        lines.push(Line::from(Span::styled(
            format!("[{key}] {}: {}", scenario.display_name(), format_percent(case.rate)),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(case.justification.clone()));
        lines.push(Line::from(""));
    }

    let p = Paragraph::new(lines)
        .block(Block::default().title(format!("AI Growth Assumptions: {ticker}")).borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    frame.render_widget(p, rect);
}

fn draw_summary(frame: &mut ratatui::Frame<'_>, area: Rect, summary: &ValuationSummary) {
    let rect = centered(area, area.width.saturating_sub(4).min(80), area.height.saturating_sub(2).min(14));
    frame.render_widget(Clear, rect);

    let lines = vec![
        Line::from(format!(
            "Intrinsic {} | Price {} | Upside {} ({})",
            format_currency(summary.intrinsic_value),
            format_currency(summary.market_price),
            format_percent(summary.upside * 100.0),
            summary.verdict.display_name(),
        )),
        Line::from(""),
        Line::from(summary.narrative.clone()),
    ];
    let p = Paragraph::new(lines)
        .block(Block::default().title(format!("Valuation Summary: {}", summary.ticker)).borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    frame.render_widget(p, rect);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Chart-ready series and bounds.
#[derive(Debug, Clone, PartialEq)]
struct ChartSeries {
    projected: Vec<(f64, f64)>,
    discounted: Vec<(f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

/// Build chart series for Plotters, or `None` when there is nothing to draw.
fn chart_series(result: &ValuationResult, discount_rate: f64) -> Option<ChartSeries> {
    if result.projected_fcf.is_empty() {
        return None;
    }

    let year = |i: usize| (i + 1) as f64;
    let projected: Vec<(f64, f64)> = result
        .projected_fcf
        .iter()
        .enumerate()
        .map(|(i, v)| (year(i), *v))
        .collect();
    let discounted: Vec<(f64, f64)> = discounted_series(&result.projected_fcf, discount_rate)
        .into_iter()
        .enumerate()
        .map(|(i, v)| (year(i), v))
        .collect();

    let n = projected.len() as f64;
    let x_bounds = if n > 1.0 { [1.0, n] } else { [0.5, 1.5] };

    let (mut y_min, mut y_max) = (0.0_f64, 0.0_f64);
    for &(_, y) in projected.iter().chain(&discounted) {
        if y.is_finite() {
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
    }
    if y_max <= y_min {
        y_max = y_min + 1.0;
    }
    let pad = (y_max - y_min) * 0.05;

    Some(ChartSeries {
        projected,
        discounted,
        x_bounds,
        y_bounds: [y_min - pad, y_max + pad],
    })
}
