//! UI rendering using ratatui.

mod layout;
mod widgets;

pub use layout::Layout;
pub use widgets::{
    HelpPanel, PostList, StatusBar, SummaryBanner, TabBar, TradeList, format_age,
    format_currency,
};

use crate::config::KeyBindings;
use crate::state::{Store, View};
use ratatui::{
    Frame,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Main UI renderer.
pub struct Ui {
    keys: KeyBindings,
    show_hint_bar: bool,
}

impl Ui {
    pub fn new(keys: KeyBindings, show_hint_bar: bool) -> Self {
        Self {
            keys,
            show_hint_bar,
        }
    }

    /// Render the entire UI.
    pub fn render(&self, frame: &mut Frame, store: &Store) {
        let layout = Layout::new(frame.area(), self.show_hint_bar);

        StatusBar::render(frame, layout.status_area, store);
        TabBar::render(frame, layout.tab_area, store, &self.keys);
        SummaryBanner::render(frame, layout.summary_area, &store.feed);

        if store.feed.show_error_banner() {
            let error = store.feed.error.as_deref().unwrap_or("Unknown error");
            widgets::render_error_banner(frame, layout.main_area, error, &self.keys.refresh);
        } else {
            match store.app.current_view {
                View::Feed => PostList::render(frame, layout.main_area, store),
                View::Trades => TradeList::render(frame, layout.main_area, store),
            }
        }

        if self.show_hint_bar {
            frame.render_widget(self.hint_line(), layout.hint_area);
        }

        if store.app.show_help {
            HelpPanel::render(frame, frame.area(), &self.keys);
        }

        if let Some(notification) = store.app.current_notification() {
            widgets::render_notification(frame, layout.notification_area, notification);
        }

        if let Some(error) = &store.app.error {
            widgets::render_error(frame, layout.notification_area, error);
        }
    }

    fn hint_line(&self) -> Paragraph<'static> {
        let keys = &self.keys;
        let hints = [
            (keys.refresh.as_str(), "refresh"),
            (keys.load_more.as_str(), "more"),
            (keys.feed.as_str(), "feed"),
            (keys.trades.as_str(), "trades"),
            (keys.help.as_str(), "help"),
            (keys.quit.as_str(), "quit"),
        ];
        let spans: Vec<Span<'static>> = hints
            .iter()
            .flat_map(|(key, label)| {
                [
                    Span::styled(format!(" {key}"), Style::default().fg(Color::Cyan)),
                    Span::styled(format!(" {label} "), Style::default().fg(Color::DarkGray)),
                ]
            })
            .collect();
        Paragraph::new(Line::from(spans))
    }
}
