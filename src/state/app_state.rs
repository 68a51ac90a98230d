//! Application-level state.

use super::Notification;
use std::time::Instant;

/// The current view/screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Post cards with their trades.
    #[default]
    Feed,
    /// Queued and executed trade tables.
    Trades,
}

impl View {
    /// All views, in tab order.
    pub const ALL: [View; 2] = [View::Feed, View::Trades];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Feed => "Feed",
            Self::Trades => "Trades",
        }
    }
}

/// Global application state.
#[derive(Debug, Default)]
pub struct AppState {
    /// Current view.
    pub current_view: View,
    /// Whether to show help overlay.
    pub show_help: bool,
    /// Current notification and when it appeared.
    pub notification: Option<(Notification, Instant)>,
    /// Current error message.
    pub error: Option<String>,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Selected post in the feed view.
    pub feed_selected: usize,
    /// Selected row in the trades view (queued rows first, then executed).
    pub trades_selected: usize,
}

impl AppState {
    /// Create a new application state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a notification, replacing any current one.
    pub fn notify(&mut self, notification: Notification) {
        self.notification = Some((notification, Instant::now()));
    }

    /// Drop the notification once its display time has passed.
    pub fn expire_notification(&mut self, now: Instant) {
        if let Some((notification, shown_at)) = &self.notification
            && now.duration_since(*shown_at).as_secs() >= notification.duration_secs
        {
            self.notification = None;
        }
    }

    /// Current notification, if any.
    pub fn current_notification(&self) -> Option<&Notification> {
        self.notification.as_ref().map(|(n, _)| n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_notification_expires() {
        let mut state = AppState::new();
        state.notify(Notification::info("Feed refreshed"));
        let shown_at = state.notification.as_ref().unwrap().1;

        state.expire_notification(shown_at + Duration::from_secs(1));
        assert!(state.current_notification().is_some());

        state.expire_notification(shown_at + Duration::from_secs(3));
        assert!(state.current_notification().is_none());
    }
}
