//! Trading summary banner.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::format::format_currency;
use crate::state::FeedState;

/// One-line totals across loaded posts.
pub struct SummaryBanner;

impl SummaryBanner {
    pub fn render(frame: &mut Frame, area: Rect, feed: &FeedState) {
        let paragraph = Paragraph::new(summary_line(feed)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(paragraph, area);
    }
}

pub fn summary_line(feed: &FeedState) -> Line<'static> {
    let totals = feed.totals();
    // The backend's total when it reports one; loaded posts otherwise.
    let posts = feed.total.unwrap_or(feed.posts.len() as u64);
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);

    let mut spans = vec![
        Span::styled(" Posts ", label),
        Span::styled(posts.to_string(), value),
        Span::styled("  Trades ", label),
        Span::styled(totals.count().to_string(), value),
        Span::styled("  Volume ", label),
        Span::styled(format_currency(totals.volume), value),
        Span::styled("  Executed ", label),
        Span::styled(
            format!("{}/{}", totals.executed, totals.count()),
            Style::default().fg(Color::Green),
        ),
        Span::styled(
            format!(" ({} pending)", totals.queued),
            Style::default().fg(Color::Yellow),
        ),
    ];

    let anomalies = feed.anomaly_count();
    if anomalies > 0 {
        spans.push(Span::styled(
            format!("  ⚠ {anomalies} flagged"),
            Style::default().fg(Color::Red),
        ));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{TradeBook, join_posts};
    use crate::state::{Post, Trade};
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_summary_text() {
        let posts: Vec<Post> = serde_json::from_value(json!([
            { "tweet_process_id": "p1", "tweet_content": "a", "market_effect": true },
            { "tweet_process_id": "p2", "tweet_content": "b", "market_effect": true }
        ]))
        .unwrap();
        let queued: Vec<Trade> = serde_json::from_value(json!([
            { "id": "q1", "tweet_id": "p1", "ticker": "TSLA", "dollar_amount": 5000, "days_to_hold": 7 }
        ]))
        .unwrap();
        let executed: Vec<Trade> = serde_json::from_value(json!([
            { "id": "e1", "tweet_id": "p1", "ticker": "ENPH", "dollar_amount": 4200,
              "days_to_hold": 5, "executed_at": "2024-01-15T10:00:00Z" }
        ]))
        .unwrap();

        let book = TradeBook::new(queued, executed);
        let mut feed = FeedState {
            posts: join_posts(posts, &book, &HashMap::new()),
            ..Default::default()
        };

        let text = |feed: &FeedState| -> String {
            summary_line(feed)
                .spans
                .iter()
                .map(|s| s.content.to_string())
                .collect()
        };
        assert_eq!(
            text(&feed),
            " Posts 2  Trades 2  Volume $9.2K  Executed 1/2 (1 pending)  ⚠ 2 flagged"
        );

        // The backend's pagination total wins over the loaded count.
        feed.total = Some(41);
        assert!(text(&feed).starts_with(" Posts 41  Trades 2"));
    }
}
