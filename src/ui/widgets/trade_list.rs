//! Trades view: queued and executed tables.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
};

use super::format::{format_age, format_currency, truncate};
use crate::state::{FeedPost, Store, Trade};
use chrono::{DateTime, Utc};

/// Queued and executed trade tables.
pub struct TradeList;

impl TradeList {
    /// Render both tables. The selection runs over queued rows first.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let now = Utc::now();
        let queued: Vec<_> = store.feed.queued_trades().collect();
        let executed: Vec<_> = store.feed.executed_trades().collect();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let selected = store.app.trades_selected;
        let (queued_sel, executed_sel) = if selected < queued.len() {
            (Some(selected), None)
        } else {
            (None, Some(selected - queued.len()))
        };

        let queued_rows = queued.iter().map(|(fp, trade)| {
            Row::new(vec![
                ticker_cell(trade),
                Cell::from(format_currency(trade.dollar_amount)),
                Cell::from(format!("{}d", trade.days_to_hold)),
                Cell::from(when(trade, now)),
                Cell::from(post_label(fp)),
            ])
        });
        let queued_table = table(
            queued_rows,
            ["Ticker", "Amount", "Hold", "Queued", "Post"],
            format!(" Queued ({}) ", queued.len()),
            Color::Yellow,
        );
        let mut state = TableState::default();
        state.select(queued_sel);
        frame.render_stateful_widget(queued_table, chunks[0], &mut state);

        let executed_rows = executed.iter().map(|(fp, trade)| {
            let price = trade
                .execution_price
                .map(|p| format!("{p:.2}"))
                .unwrap_or_else(|| "-".to_string());
            Row::new(vec![
                ticker_cell(trade),
                Cell::from(format_currency(trade.dollar_amount)),
                Cell::from(price),
                Cell::from(when(trade, now)),
                Cell::from(post_label(fp)),
            ])
        });
        let executed_table = table(
            executed_rows,
            ["Ticker", "Amount", "Price", "Executed", "Post"],
            format!(" Executed ({}) ", executed.len()),
            Color::Green,
        );
        let mut state = TableState::default();
        state.select(executed_sel.filter(|i| *i < executed.len()));
        frame.render_stateful_widget(executed_table, chunks[1], &mut state);
    }
}

fn table<'a>(
    rows: impl IntoIterator<Item = Row<'a>>,
    headers: [&'a str; 5],
    title: String,
    color: Color,
) -> Table<'a> {
    let header = Row::new(headers.map(|h| {
        Cell::from(h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    }))
    .height(1)
    .bottom_margin(1);

    Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Min(20),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    )
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .highlight_symbol("▶ ")
}

fn ticker_cell(trade: &Trade) -> Cell<'static> {
    Cell::from(trade.ticker.clone()).style(Style::default().add_modifier(Modifier::BOLD))
}

fn when(trade: &Trade, now: DateTime<Utc>) -> String {
    trade
        .stage_time()
        .map(|at| format_age(at, now))
        .unwrap_or_else(|| "-".to_string())
}

fn post_label(fp: &FeedPost) -> String {
    truncate(&fp.post.content, 40)
}
