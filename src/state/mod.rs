//! State management for signaldesk.
//!
//! This module provides centralized state management with a unidirectional
//! data flow pattern inspired by Redux/Elm architecture. The feed worker
//! publishes [`FeedState`] snapshots as actions; the UI only ever reads the
//! [`Store`].

mod app_state;
mod author_state;
mod de;
mod feed_state;
mod post_state;
pub(crate) mod timestamp;
mod trade_state;

pub use app_state::{AppState, View};
pub use author_state::{Author, PLACEHOLDER_NAME};
pub use feed_state::{Anomaly, FeedPhase, FeedPost, FeedState, TradeDiagnostics};
pub use post_state::{Post, PostStatus};
pub use trade_state::{Trade, TradeStage, TradeTotals};

use crate::error::Result;
use std::time::Instant;
use tokio::sync::mpsc;

/// Actions that can be dispatched to modify state.
#[derive(Debug, Clone)]
pub enum Action {
    // Navigation
    SetView(View),
    NextView,

    // Feed commands, forwarded to the feed worker
    LoadFeed,
    LoadMore,
    RefreshFeed,

    // Feed snapshots published by the worker
    FeedUpdated(Box<FeedState>),

    // UI actions
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,
    ToggleHelp,
    ShowNotification(Notification),
    DismissNotification,
    Tick,

    // Error handling
    SetError(String),
    ClearError,

    // Quit
    Quit,
}

/// A notification to display to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub duration_secs: u64,
}

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Info,
            duration_secs: 3,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Success,
            duration_secs: 3,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Warning,
            duration_secs: 5,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Error,
            duration_secs: 10,
        }
    }
}

/// The global state store.
#[derive(Debug)]
pub struct Store {
    /// Application state.
    pub app: AppState,
    /// Latest feed snapshot.
    pub feed: FeedState,
    /// Action sender for dispatching actions.
    action_tx: mpsc::UnboundedSender<Action>,
}

impl Store {
    /// Create a new store with the given action sender.
    pub fn new(action_tx: mpsc::UnboundedSender<Action>) -> Self {
        Self {
            app: AppState::new(),
            feed: FeedState::default(),
            action_tx,
        }
    }

    /// Dispatch an action to the store.
    pub fn dispatch(&self, action: Action) -> Result<()> {
        self.action_tx
            .send(action)
            .map_err(|e| crate::Error::channel(e.to_string()))
    }

    /// Apply an action to update state.
    pub fn reduce(&mut self, action: Action) {
        match action {
            // Navigation
            Action::SetView(view) => self.app.current_view = view,
            Action::NextView => {
                self.app.current_view = match self.app.current_view {
                    View::Feed => View::Trades,
                    View::Trades => View::Feed,
                }
            }

            // The worker owns loading; snapshots carry the outcome.
            Action::LoadFeed | Action::LoadMore | Action::RefreshFeed => {}

            Action::FeedUpdated(next) => self.apply_feed(*next),

            // UI actions
            Action::ScrollUp => self.scroll(-1),
            Action::ScrollDown => self.scroll(1),
            Action::PageUp => self.scroll(-10),
            Action::PageDown => self.scroll(10),
            Action::GoToTop => self.go_to_top(),
            Action::GoToBottom => self.go_to_bottom(),
            Action::ToggleHelp => self.app.show_help = !self.app.show_help,
            Action::ShowNotification(notification) => self.app.notify(notification),
            Action::DismissNotification => self.app.notification = None,
            Action::Tick => self.app.expire_notification(Instant::now()),

            // Error handling
            Action::SetError(error) => self.app.error = Some(error),
            Action::ClearError => self.app.error = None,

            // Quit
            Action::Quit => self.app.should_quit = true,
        }
    }

    fn apply_feed(&mut self, next: FeedState) {
        let previous = std::mem::replace(&mut self.feed, next);

        // Errors are a toast once something is on screen; the empty case gets
        // the full-screen banner instead.
        if let Some(error) = &self.feed.error
            && previous.error.as_ref() != Some(error)
            && !self.feed.posts.is_empty()
        {
            self.app.notify(Notification::error(error.clone()));
        }

        if previous.loading_more && !self.feed.loading_more && self.feed.error.is_none() {
            let added = self.feed.posts.len().saturating_sub(previous.posts.len());
            self.app
                .notify(Notification::success(format!("Loaded {added} more posts")));
        }

        let flagged = self.feed.anomaly_count();
        if previous.is_loading() && self.feed.phase == FeedPhase::Ready && flagged > 0 {
            self.app
                .notify(Notification::warning(format!("{flagged} posts flagged")));
        }

        self.clamp_selection();
    }

    fn trade_rows(&self) -> usize {
        self.feed.queued_trades().count() + self.feed.executed_trades().count()
    }

    fn rows(&self) -> usize {
        match self.app.current_view {
            View::Feed => self.feed.posts.len(),
            View::Trades => self.trade_rows(),
        }
    }

    fn selected_mut(&mut self) -> &mut usize {
        match self.app.current_view {
            View::Feed => &mut self.app.feed_selected,
            View::Trades => &mut self.app.trades_selected,
        }
    }

    fn scroll(&mut self, delta: i32) {
        let max_index = self.rows().saturating_sub(1);
        let selected = self.selected_mut();
        let current = *selected as i64;
        let new_index = (current + delta as i64).max(0) as usize;
        *selected = new_index.min(max_index);
    }

    fn go_to_top(&mut self) {
        *self.selected_mut() = 0;
    }

    fn go_to_bottom(&mut self) {
        let max = self.rows().saturating_sub(1);
        *self.selected_mut() = max;
    }

    fn clamp_selection(&mut self) {
        let posts = self.feed.posts.len().saturating_sub(1);
        let trades = self.trade_rows().saturating_sub(1);
        self.app.feed_selected = self.app.feed_selected.min(posts);
        self.app.trades_selected = self.app.trades_selected.min(trades);
    }

    /// The post under the cursor in the feed view.
    pub fn selected_post(&self) -> Option<&FeedPost> {
        self.feed.posts.get(self.app.feed_selected)
    }
}
