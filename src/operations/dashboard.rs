use crate::db::kv_store::KeyValueStore;
use crate::error::Error;
use crate::logging;
use crate::models::category::{color_for_name, resolve_category};
use crate::models::transaction::{Transaction, TransactionType};
use crate::operations::analytics::{
    self, BalanceState, CategoryTotal, MonthlyTotals, Totals, TransactionFilter,
};
use crate::operations::export::write_export;
use crate::operations::report::{format_currency, signed_amount};
use crate::stores::transaction_store::TransactionStore;
use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::widgets::canvas::{Canvas, Points};
use ratatui::{
    prelude::{Alignment, Color, Constraint, Direction, Layout, Modifier, Rect, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, TableState},
};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
enum DashboardAction {
    Continue,
    Quit,
    Delete(String),
    Export,
}

struct DashboardState {
    filter: TransactionFilter,
    table_state: TableState,
    status: Option<String>,
}

impl DashboardState {
    fn new() -> Self {
        Self {
            filter: TransactionFilter::All,
            table_state: TableState::default(),
            status: None,
        }
    }

    fn set_filter(&mut self, filter: TransactionFilter) {
        if self.filter != filter {
            self.filter = filter;
            self.table_state.select(None);
        }
    }

    /// Keeps the selection inside a view of `len` rows.
    fn sync_selection(&mut self, len: usize) {
        if len == 0 {
            self.table_state.select(None);
        } else {
            let selected = self.table_state.selected().unwrap_or(0).min(len - 1);
            self.table_state.select(Some(selected));
        }
    }

    fn move_selection(&mut self, delta: i32, len: usize) {
        if len == 0 {
            self.table_state.select(None);
            return;
        }

        let current = self.table_state.selected().unwrap_or(0) as i32;
        let max_index = len.saturating_sub(1) as i32;
        let next = (current + delta).clamp(0, max_index) as usize;
        self.table_state.select(Some(next));
    }

    fn selected_id(&self, view: &[&Transaction]) -> Option<String> {
        let selected = self.table_state.selected()?;
        view.get(selected).map(|t| t.id.clone())
    }

    fn handle_key(&mut self, key: KeyEvent, view: &[&Transaction]) -> DashboardAction {
        if key.kind == KeyEventKind::Release {
            return DashboardAction::Continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return DashboardAction::Quit,
            KeyCode::Char('t') => self.set_filter(self.filter.next()),
            KeyCode::Char('a') => self.set_filter(TransactionFilter::All),
            KeyCode::Char('i') => self.set_filter(TransactionFilter::Income),
            KeyCode::Char('e') => self.set_filter(TransactionFilter::Expense),
            KeyCode::Up => self.move_selection(-1, view.len()),
            KeyCode::Down => self.move_selection(1, view.len()),
            KeyCode::Char('x') | KeyCode::Delete => {
                if let Some(id) = self.selected_id(view) {
                    return DashboardAction::Delete(id);
                }
            }
            KeyCode::Char('s') => return DashboardAction::Export,
            _ => {}
        }
        DashboardAction::Continue
    }
}

struct DashboardData<'a> {
    totals: Totals,
    breakdown: Vec<CategoryTotal>,
    monthly: Vec<MonthlyTotals>,
    view: Vec<&'a Transaction>,
}

impl<'a> DashboardData<'a> {
    fn build(transactions: &'a [Transaction], filter: TransactionFilter, today: NaiveDate) -> Self {
        tracing::debug!("Recomputing dashboard for {} transactions", transactions.len());
        Self {
            totals: analytics::totals(transactions),
            breakdown: analytics::category_breakdown(transactions),
            monthly: analytics::monthly_series(transactions, today),
            view: analytics::filtered_view(transactions, filter),
        }
    }
}

/// Opens the full-screen dashboard until the user quits.
///
/// Deletions go through `store`, so they are persisted like any other
/// mutation. Exports are written to `export_dir`. Logging to stderr is
/// paused while the screen is open.
pub fn run_dashboard<S: KeyValueStore>(
    store: &mut TransactionStore<S>,
    export_dir: &Path,
    today: NaiveDate,
) -> Result<(), Error> {
    let _quiet_stderr = logging::pause_stderr();

    enter_screen(
        enable_raw_mode,
        || {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen)
        },
        disable_raw_mode,
    )?;
    let stdout = io::stdout();

    let result = (|| {
        let backend = ratatui::backend::CrosstermBackend::new(stdout);
        let mut terminal = ratatui::Terminal::new(backend)
            .map_err(|e| Error::Terminal(format!("Failed to initialize terminal: {}", e)))?;

        let mut state = DashboardState::new();

        loop {
            let data = DashboardData::build(store.list(), state.filter, today);
            let unsaved = store.has_unsaved_changes();
            state.sync_selection(data.view.len());

            terminal
                .draw(|frame| render(frame, &data, &mut state, unsaved))
                .map_err(|e| Error::Terminal(format!("Failed to draw terminal UI: {}", e)))?;

            if !event::poll(std::time::Duration::from_millis(250))
                .map_err(|e| Error::Terminal(format!("Failed to poll input: {}", e)))?
            {
                continue;
            }

            let action = match event::read()
                .map_err(|e| Error::Terminal(format!("Failed to read input: {}", e)))?
            {
                Event::Key(key) => state.handle_key(key, &data.view),
                _ => DashboardAction::Continue,
            };

            match action {
                DashboardAction::Continue => {}
                DashboardAction::Quit => break,
                DashboardAction::Delete(id) => {
                    store.remove(&id);
                    state.status = Some("Transaction deleted".to_string());
                }
                DashboardAction::Export => {
                    state.status = Some(match write_export(export_dir, store.list(), today) {
                        Ok(path) => format!("Exported to {}", path.display()),
                        Err(e) => {
                            tracing::error!("Export failed: {e}");
                            format!("Export failed: {}", e)
                        }
                    });
                }
            }
        }

        Ok(())
    })();

    disable_raw_mode().map_err(|e| Error::Terminal(format!("Failed to disable raw mode: {}", e)))?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen)
        .map_err(|e| Error::Terminal(format!("Failed to leave alternate screen: {}", e)))?;

    result
}

/// Switches the terminal to raw mode and the alternate screen. Raw mode is
/// undone again when the alternate screen cannot be entered.
fn enter_screen(
    enable_raw: impl FnOnce() -> io::Result<()>,
    enter_alternate: impl FnOnce() -> io::Result<()>,
    disable_raw: impl FnOnce() -> io::Result<()>,
) -> Result<(), Error> {
    enable_raw().map_err(|e| Error::Terminal(format!("Failed to enable raw mode: {}", e)))?;
    if let Err(e) = enter_alternate() {
        if let Err(restore) = disable_raw() {
            tracing::error!("Failed to disable raw mode: {restore}");
        }
        return Err(Error::Terminal(format!(
            "Failed to enter alternate screen: {}",
            e
        )));
    }
    Ok(())
}

fn render(
    frame: &mut ratatui::Frame,
    data: &DashboardData,
    state: &mut DashboardState,
    unsaved: bool,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Percentage(45),
            Constraint::Min(5),
            Constraint::Length(2),
        ])
        .split(frame.area());

    render_totals(frame, layout[0], &data.totals);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(layout[1]);
    render_pie_chart(frame, charts[0], &data.breakdown);
    render_monthly_chart(frame, charts[1], &data.monthly);

    render_table(frame, layout[2], data, state);
    render_footer(frame, layout[3], state, unsaved);
}

fn balance_color(totals: &Totals) -> Color {
    match totals.balance_state() {
        BalanceState::Positive => Color::Green,
        BalanceState::Negative => Color::Red,
    }
}

fn category_color(transaction_type: TransactionType, name: &str) -> Color {
    color_for_name(transaction_type, name)
        .parse::<Color>()
        .unwrap_or(Color::White)
}

fn render_totals(frame: &mut ratatui::Frame, area: Rect, totals: &Totals) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let line = Line::from(vec![
        Span::raw("Income "),
        Span::styled(format_currency(totals.income), bold.fg(Color::Green)),
        Span::raw("   Expenses "),
        Span::styled(format_currency(totals.expenses), bold.fg(Color::Red)),
        Span::raw("   Balance "),
        Span::styled(format_currency(totals.balance), bold.fg(balance_color(totals))),
    ]);
    let paragraph = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().title("Budget").borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_pie_chart(frame: &mut ratatui::Frame, area: Rect, breakdown: &[CategoryTotal]) {
    let block = Block::default().title("Expenses by Category").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let total: Decimal = breakdown.iter().map(|c| c.value).sum();
    if total <= Decimal::ZERO {
        let empty = Paragraph::new("No expense data yet").alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let total = total.to_f64().unwrap_or(1.0).max(f64::EPSILON);
    let mut slices = Vec::with_capacity(breakdown.len());
    let mut start_angle = 0.0_f64;
    for entry in breakdown {
        let sweep = entry.value.to_f64().unwrap_or(0.0) / total * std::f64::consts::TAU;
        slices.push((
            start_angle,
            start_angle + sweep,
            category_color(TransactionType::Expense, &entry.name),
        ));
        start_angle += sweep;
    }

    let canvas = Canvas::default()
        .x_bounds([-1.0, 1.0])
        .y_bounds([-1.0, 1.0])
        .paint(|ctx| {
            for (start, end, color) in &slices {
                let mut points = Vec::new();
                let mut r = 0.0;
                while r <= 1.0 {
                    let mut angle = *start;
                    while angle <= *end {
                        points.push((r * angle.cos(), r * angle.sin()));
                        angle += 0.05;
                    }
                    r += 0.04;
                }
                if !points.is_empty() {
                    ctx.draw(&Points {
                        coords: &points,
                        color: *color,
                    });
                }
            }
        });
    frame.render_widget(canvas, halves[0]);

    let legend: Vec<Line> = breakdown
        .iter()
        .map(|entry| {
            let color = category_color(TransactionType::Expense, &entry.name);
            let share = (entry.value.to_f64().unwrap_or(0.0) / total * 100.0).round();
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(color)),
                Span::raw(format!("{:10}", entry.name)),
                Span::styled(format!("{:>4}%", share), Style::default().fg(color)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(legend), halves[1]);
}

fn render_monthly_chart(frame: &mut ratatui::Frame, area: Rect, monthly: &[MonthlyTotals]) {
    let mut chart = BarChart::default()
        .block(
            Block::default()
                .title("Monthly Overview (income / expenses)")
                .borders(Borders::ALL),
        )
        .bar_width(4)
        .bar_gap(1)
        .group_gap(3);

    for month in monthly {
        let bars = [
            month_bar(month.income, Color::Green),
            month_bar(month.expenses, Color::Red),
        ];
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(month.label.clone()))
                .bars(&bars),
        );
    }

    frame.render_widget(chart, area);
}

fn month_bar(amount: Decimal, color: Color) -> Bar<'static> {
    Bar::default()
        .value(amount.round().to_u64().unwrap_or(0))
        .text_value(String::new())
        .style(Style::default().fg(color))
}

fn render_table(
    frame: &mut ratatui::Frame,
    area: Rect,
    data: &DashboardData,
    state: &mut DashboardState,
) {
    let title = format!("Transactions ({}, {} shown)", state.filter, data.view.len());
    let block = Block::default().title(title).borders(Borders::ALL);

    if data.view.is_empty() {
        let empty = Paragraph::new("No transactions found")
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec!["Date", "Category", "Description", "Amount"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = data
        .view
        .iter()
        .map(|transaction| {
            let category = resolve_category(transaction.transaction_type, &transaction.category);
            let amount_color = if transaction.is_income() {
                Color::Green
            } else {
                Color::Red
            };
            Row::new(vec![
                Cell::from(transaction.date.format("%b %-d, %Y").to_string()),
                Cell::from(Span::styled(
                    category.name,
                    Style::default()
                        .fg(category_color(transaction.transaction_type, category.name)),
                )),
                Cell::from(transaction.description.clone()),
                Cell::from(Span::styled(
                    signed_amount(transaction),
                    Style::default().fg(amount_color),
                )),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(13),
            Constraint::Length(14),
            Constraint::Min(20),
            Constraint::Length(14),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(Style::default().bg(Color::DarkGray))
    .highlight_symbol("> ");

    frame.render_stateful_widget(table, area, &mut state.table_state);
}

fn render_footer(frame: &mut ratatui::Frame, area: Rect, state: &DashboardState, unsaved: bool) {
    let mut spans = vec![Span::styled(
        "t filter  a/i/e all/income/expense  ↑/↓ move  x delete  s export  q quit",
        Style::default().fg(Color::Gray),
    )];
    if unsaved {
        spans.push(Span::styled(
            "  [unsaved changes]",
            Style::default().fg(Color::Yellow),
        ));
    }
    let mut lines = vec![Line::from(spans)];
    if let Some(status) = &state.status {
        lines.push(Line::from(Span::raw(status.clone())));
    }
    frame.render_widget(Paragraph::new(lines), area);
}
