//! Status bar widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::state::{FeedPhase, Store};

/// Status bar widget.
pub struct StatusBar;

impl StatusBar {
    /// Render the status bar.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let feed = &store.feed;
        let phase_color = match feed.phase {
            FeedPhase::Idle => Color::Gray,
            FeedPhase::Loading => Color::Yellow,
            FeedPhase::Ready => Color::Green,
            FeedPhase::Error => Color::Red,
        };

        let updated = match feed.last_updated {
            Some(at) => format!(" Updated {} ", at.with_timezone(&chrono::Local).format("%H:%M:%S")),
            None => " Never updated ".to_string(),
        };

        let mut spans = vec![
            Span::styled(
                " signaldesk ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | "),
            Span::styled(format!("● {}", feed.phase), Style::default().fg(phase_color)),
            Span::raw(" | "),
            Span::raw(updated),
        ];
        if feed.loading_more {
            spans.push(Span::styled(
                " Loading more... ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            ));
        }

        let help_hint = Span::styled(" Press ? for help ", Style::default().fg(Color::Gray));

        let left_len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let right_len = help_hint.content.chars().count();
        let padding = area
            .width
            .saturating_sub(left_len as u16 + right_len as u16);

        spans.push(Span::raw(" ".repeat(padding as usize)));
        spans.push(help_hint);

        let paragraph =
            Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));

        frame.render_widget(paragraph, area);
    }
}
