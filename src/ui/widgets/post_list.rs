//! Feed view: one card per post.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::format::{format_age, format_currency, truncate};
use crate::state::{FeedPost, PostStatus, Store};
use chrono::{DateTime, Utc};

const CONTENT_CHARS: usize = 140;
const STRIP_TRADES: usize = 4;

/// Post card list.
pub struct PostList;

impl PostList {
    /// Render the feed.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let feed = &store.feed;
        let title = match feed.total {
            Some(total) => format!(" Feed ({}/{}) ", feed.posts.len(), total),
            None => format!(" Feed ({}) ", feed.posts.len()),
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        if feed.posts.is_empty() {
            let message = if feed.is_loading() {
                "Loading posts..."
            } else {
                "No posts yet"
            };
            let paragraph = Paragraph::new(Line::from(Span::styled(
                message,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            )))
            .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let now = Utc::now();
        let mut items: Vec<ListItem> = feed
            .posts
            .iter()
            .map(|fp| ListItem::new(card_lines(fp, now)))
            .collect();
        items.push(ListItem::new(footer_line(
            feed.has_more,
            feed.loading_more,
        )));

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("▶ ");

        let mut state = ListState::default();
        state.select(Some(store.app.feed_selected));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

/// The lines of one post card.
pub fn card_lines(fp: &FeedPost, now: DateTime<Utc>) -> Vec<Line<'static>> {
    let author = &fp.author;
    let author_style = if author.is_placeholder() {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC)
    } else {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    };

    let mut header = vec![
        Span::styled(
            format!("[{}] ", author.initials()),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(author.name.clone(), author_style),
    ];
    if author.platform_id.is_some() {
        header.push(Span::styled(
            format!(" {}", author.handle()),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if let Some(at) = fp.post.submitted_at {
        header.push(Span::styled(
            format!(" · {}", format_age(at, now)),
            Style::default().fg(Color::DarkGray),
        ));
    }
    header.push(Span::styled(
        format!(" · {}", fp.post.status),
        status_style(fp.post.status),
    ));
    if fp.post.market_effect {
        header.push(Span::styled(" · market effect", Style::default().fg(Color::Green)));
    }
    if fp.diagnostics.is_critical() {
        header.push(Span::styled(
            " ⚠ no trades recorded",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    } else if !fp.diagnostics.anomalies.is_empty() {
        header.push(Span::styled(" ⚠", Style::default().fg(Color::Yellow)));
    }

    vec![
        Line::from(header),
        Line::from(Span::raw(format!("  {}", fp.post.preview(CONTENT_CHARS)))),
        trade_strip(fp),
        Line::from(""),
    ]
}

fn trade_strip(fp: &FeedPost) -> Line<'static> {
    if !fp.diagnostics.has_trades() {
        return Line::from(Span::styled(
            "  no trades",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let mut spans = vec![Span::raw("  ")];
    for trade in fp.trades().take(STRIP_TRADES) {
        let (marker, color) = if trade.is_executed() {
            ("✓", Color::Green)
        } else {
            ("◷", Color::Yellow)
        };
        spans.push(Span::styled(
            format!("{marker} {} ", trade.ticker),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(
            "{} {}d  ",
            format_currency(trade.dollar_amount),
            trade.days_to_hold
        )));
    }
    let hidden = fp.diagnostics.trade_count().saturating_sub(STRIP_TRADES);
    if hidden > 0 {
        spans.push(Span::styled(
            format!("+{hidden} more"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

fn footer_line(has_more: bool, loading_more: bool) -> Line<'static> {
    let text = if loading_more {
        "── loading more... ──".to_string()
    } else if has_more {
        "── press m to load more ──".to_string()
    } else {
        "── end of feed ──".to_string()
    };
    Line::from(Span::styled(
        truncate(&text, 60),
        Style::default().fg(Color::DarkGray),
    ))
}

fn status_style(status: PostStatus) -> Style {
    match status {
        PostStatus::Completed => Style::default().fg(Color::Green),
        PostStatus::Pending => Style::default().fg(Color::Yellow),
        PostStatus::Error => Style::default().fg(Color::Red),
        PostStatus::Unknown => Style::default().fg(Color::DarkGray),
    }
}
