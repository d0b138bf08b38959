use std::sync::mpsc::{Receiver, TryRecvError};

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::client::{spawn_fetch, ApiClient};
use crate::error::Result;
use crate::filters::customer_transactions;
use crate::fmt::{format_k, money, y_axis_ticks};
use crate::models::Dataset;
use crate::settings::Settings;
use crate::state::{DashboardState, LoadState};
use crate::tui::{
    money_span, run_view, View, ViewAction, ERROR_STYLE, FOCUSED_INPUT_STYLE, FOOTER_STYLE,
    HEADER_STYLE, SELECTED_STYLE,
};

/// Bar colors, cycled per day.
const BAR_COLORS: &[Color] = &[
    Color::Rgb(0x00, 0x88, 0xFE),
    Color::Rgb(0x00, 0xC4, 0x9F),
    Color::Rgb(0xFF, 0xBB, 0x28),
    Color::Rgb(0xFF, 0x80, 0x42),
    Color::Red,
    Color::Rgb(0xFF, 0xC0, 0xCB),
];

const PAGE_STEP: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Focus {
    Name,
    Amount,
}

pub struct Dashboard {
    state: DashboardState,
    focus: Focus,
    selected: usize,
    table_state: TableState,
    pending: Option<Receiver<Result<Dataset>>>,
    source: String,
    loaded_at: Option<String>,
}

impl Dashboard {
    pub fn new(source: &str, pending: Option<Receiver<Result<Dataset>>>) -> Self {
        Self {
            state: DashboardState::new(),
            focus: Focus::Name,
            selected: 0,
            table_state: TableState::default(),
            pending,
            source: source.to_string(),
            loaded_at: None,
        }
    }

    /// Apply a finished fetch to the view state.
    pub fn finish_fetch(&mut self, result: Result<Dataset>) {
        match result {
            Ok(data) => {
                self.state.load(data);
                self.loaded_at = Some(Local::now().format("%H:%M:%S").to_string());
            }
            Err(e) => self.state.fail(e.to_string()),
        }
        self.clamp_selection();
    }

    fn poll_fetch(&mut self) {
        let Some(rx) = &self.pending else {
            return;
        };
        match rx.try_recv() {
            Ok(result) => {
                self.pending = None;
                self.finish_fetch(result);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                self.state.fail("fetch worker exited without a result");
            }
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.state.filtered.len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    fn focused_input(&self) -> &str {
        match self.focus {
            Focus::Name => &self.state.name_input,
            Focus::Amount => &self.state.amount_input,
        }
    }

    fn edit_push(&mut self, c: char) {
        match self.focus {
            Focus::Name => self.state.push_name_char(c),
            Focus::Amount => self.state.push_amount_char(c),
        }
        self.clamp_selection();
    }

    fn edit_pop(&mut self) {
        match self.focus {
            Focus::Name => self.state.pop_name_char(),
            Focus::Amount => self.state.pop_amount_char(),
        }
        self.clamp_selection();
    }

    fn edit_clear(&mut self) {
        match self.focus {
            Focus::Name => self.state.set_name_input(""),
            Focus::Amount => self.state.set_amount_input(""),
        }
        self.clamp_selection();
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.state.filtered.len();
        if len == 0 {
            return;
        }
        let next = self.selected as isize + delta;
        self.selected = next.clamp(0, len as isize - 1) as usize;
    }

    // -----------------------------------------------------------------------
    // Drawing
    // -----------------------------------------------------------------------

    fn draw_error(&self, frame: &mut Frame, message: &str) {
        let [body, keys] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!("Error fetching data: {message}"),
                ERROR_STYLE,
            )),
            body,
        );
        frame.render_widget(Paragraph::new("q/Esc:quit").style(FOOTER_STYLE), keys);
    }

    fn draw_inputs(&self, frame: &mut Frame, area: Rect) {
        let [name_area, amount_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(area);

        let input = |label: &str, value: &str, focused: bool| {
            let style = if focused {
                FOCUSED_INPUT_STYLE
            } else {
                Style::default()
            };
            let cursor = if focused { "\u{2588}" } else { "" };
            Paragraph::new(format!("{value}{cursor}")).block(
                Block::default()
                    .title(label.to_string())
                    .borders(Borders::ALL)
                    .border_style(style),
            )
        };

        frame.render_widget(
            input(
                "Search by customer name",
                &self.state.name_input,
                self.focus == Focus::Name,
            ),
            name_area,
        );
        frame.render_widget(
            input(
                "Filter by transaction amount",
                &self.state.amount_input,
                self.focus == Focus::Amount,
            ),
            amount_area,
        );
    }

    fn draw_table(&mut self, frame: &mut Frame, area: Rect) {
        let name_width = 24u16;
        let rows: Vec<Row> = self
            .state
            .filtered
            .iter()
            .map(|customer| {
                let txns = customer_transactions(&self.state.data, &customer.id);
                let (name, name_lines) = crate::tui::wrap_text(&customer.name, name_width as usize);
                let dates: Vec<Line> = txns.iter().map(|t| Line::from(t.date.clone())).collect();
                let amounts: Vec<Line> = txns.iter().map(|t| Line::from(money_span(t.amount))).collect();
                let height = name_lines.max(txns.len() as u16).max(1);
                Row::new(vec![
                    Cell::from(customer.id.to_string()),
                    Cell::from(name),
                    Cell::from(Text::from(dates)),
                    Cell::from(Text::from(amounts)),
                ])
                .height(height)
            })
            .collect();

        let widths = [
            Constraint::Length(12),
            Constraint::Length(name_width),
            Constraint::Length(12),
            Constraint::Fill(1),
        ];

        let table = Table::new(rows, widths)
            .header(
                Row::new(vec!["Customer ID", "Customer Name", "Date", "Amount"])
                    .style(HEADER_STYLE)
                    .bottom_margin(1),
            )
            .column_spacing(1)
            .row_highlight_style(SELECTED_STYLE)
            .block(Block::default().borders(Borders::RIGHT));

        if self.state.filtered.is_empty() {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(self.selected));
        }
        frame.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn draw_chart(&self, frame: &mut Frame, area: Rect) {
        let [title_area, chart_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(area);
        frame.render_widget(
            Paragraph::new(Span::styled(
                " Transactions Graph",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            title_area,
        );

        let totals = self.state.daily_totals();
        if totals.is_empty() {
            frame.render_widget(
                Paragraph::new(" No transactions to chart.").style(FOOTER_STYLE),
                chart_area,
            );
            return;
        }

        let max_val = totals.iter().map(|d| d.amount).fold(0.0_f64, f64::max).max(1.0);
        let (top_tick, mid_tick) = y_axis_ticks(max_val);
        let top_label = format_k(top_tick);
        let mid_label = format_k(mid_tick);
        let y_label_width = top_label.len().max(mid_label.len()) as u16 + 1;

        let [y_axis_area, bar_area] = Layout::horizontal([
            Constraint::Length(y_label_width),
            Constraint::Fill(1),
        ])
        .areas(chart_area);

        // Top tick on the first row, mid tick halfway down the bar region.
        let inner_height = bar_area.height.saturating_sub(1);
        let mid_row = inner_height / 2;
        let y_lines: Vec<Line> = (0..inner_height)
            .map(|row| {
                let label = if row == 0 {
                    top_label.as_str()
                } else if row == mid_row {
                    mid_label.as_str()
                } else {
                    ""
                };
                Line::from(Span::styled(
                    format!("{:>width$}", label, width = y_label_width as usize),
                    FOOTER_STYLE,
                ))
            })
            .collect();
        frame.render_widget(Paragraph::new(y_lines), y_axis_area);

        let n = totals.len() as u16;
        let bar_width = (bar_area.width.saturating_sub(n) / n.max(1)).clamp(3, 10);

        let bars: Vec<Bar> = totals
            .iter()
            .enumerate()
            .map(|(i, day)| {
                let color = BAR_COLORS[i % BAR_COLORS.len()];
                Bar::default()
                    .value(day.amount.max(0.0).round() as u64)
                    .text_value(format_k(day.amount))
                    .label(Line::from(day.date.clone()))
                    .style(Style::default().fg(color))
                    .value_style(Style::default().fg(Color::Black).bg(color))
            })
            .collect();

        let chart = BarChart::default()
            .data(BarGroup::default().bars(&bars))
            .bar_width(bar_width)
            .bar_gap(1)
            .max(top_tick.round() as u64);
        frame.render_widget(chart, bar_area);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let summary = self.state.summary();
        let mut status = format!(
            "{} of {} customers | {} transactions | Total: {}",
            summary.customers,
            self.state.data.customers.len(),
            summary.transactions,
            money(summary.total),
        );
        if let Some(at) = &self.loaded_at {
            status.push_str(&format!(" | Loaded {at} from {}", self.source));
        }
        frame.render_widget(Paragraph::new(status).style(FOOTER_STYLE), area);
    }
}

impl View for Dashboard {
    fn tick(&mut self) {
        self.poll_fetch();
    }

    fn draw(&mut self, frame: &mut Frame) {
        if let LoadState::Failed(message) = &self.state.load {
            let message = message.clone();
            self.draw_error(frame, &message);
            return;
        }

        let [title_area, inputs_area, body_area, status_area, keys_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(
            Paragraph::new("Customer Transactions").style(HEADER_STYLE),
            title_area,
        );
        self.draw_inputs(frame, inputs_area);

        if self.state.load == LoadState::Loading {
            frame.render_widget(
                Paragraph::new(format!(
                    " Loading customers and transactions from {}\u{2026}",
                    self.source
                ))
                .style(FOOTER_STYLE),
                body_area,
            );
        } else {
            let [table_area, chart_area] =
                Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                    .areas(body_area);
            self.draw_table(frame, table_area);
            self.draw_chart(frame, chart_area);
            self.draw_status(frame, status_area);
        }

        frame.render_widget(
            Paragraph::new(
                "Tab:switch filter  type:filter  Ctrl-U:clear field  \u{2191}/\u{2193}:select  Esc:clear/quit",
            )
            .style(FOOTER_STYLE),
            keys_area,
        );
    }

    fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
        if self.state.error().is_some() {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('q') => ViewAction::Close,
                _ => ViewAction::Continue,
            };
        }

        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Name => Focus::Amount,
                    Focus::Amount => Focus::Name,
                };
            }
            KeyCode::Esc => {
                if self.state.name_input.is_empty() && self.state.amount_input.is_empty() {
                    return ViewAction::Close;
                }
                self.state.clear_filters();
                self.clamp_selection();
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.edit_clear();
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.edit_push(c)
            }
            KeyCode::Backspace => {
                if !self.focused_input().is_empty() {
                    self.edit_pop();
                }
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-(PAGE_STEP as isize)),
            KeyCode::PageDown => self.move_selection(PAGE_STEP as isize),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => {
                self.selected = self.state.filtered.len().saturating_sub(1);
            }
            _ => {}
        }
        ViewAction::Continue
    }
}

/// Open the interactive dashboard, fetching data in the background.
pub fn run(settings: &Settings) -> Result<()> {
    let client = ApiClient::from_settings(settings)?;
    let source = client.base_url().to_string();
    let rx = spawn_fetch(client);
    let mut dashboard = Dashboard::new(&source, Some(rx));
    run_view(&mut dashboard)
}
