//! Joined feed state.

use super::{Author, Post, Trade, TradeTotals};
use chrono::{DateTime, Utc};

/// Where the loader stands on the current page-0 load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

impl std::fmt::Display for FeedPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Loading => write!(f, "Loading"),
            Self::Ready => write!(f, "Ready"),
            Self::Error => write!(f, "Error"),
        }
    }
}

/// Data inconsistency detected while joining a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anomaly {
    /// `market_effect = true` but no trades reference the post.
    MarketEffectWithoutTrades,
    /// The post carries no author foreign key.
    MissingAuthorId,
    /// The author lookup failed or returned nothing.
    AuthorUnavailable,
}

impl std::fmt::Display for Anomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MarketEffectWithoutTrades => write!(
                f,
                "Post marked as market_effect=true but no trades found in database"
            ),
            Self::MissingAuthorId => write!(f, "Post has no author_id"),
            Self::AuthorUnavailable => write!(f, "Author could not be resolved"),
        }
    }
}

impl Anomaly {
    /// Whether the anomaly points at missing trading data.
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::MarketEffectWithoutTrades)
    }
}

/// Per-post trade counts and anomalies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradeDiagnostics {
    pub queued: usize,
    pub executed: usize,
    pub anomalies: Vec<Anomaly>,
}

impl TradeDiagnostics {
    /// Total trades attached to the post.
    pub fn trade_count(&self) -> usize {
        self.queued + self.executed
    }

    pub fn has_trades(&self) -> bool {
        self.trade_count() > 0
    }

    pub fn has(&self, anomaly: Anomaly) -> bool {
        self.anomalies.contains(&anomaly)
    }

    pub fn is_critical(&self) -> bool {
        self.anomalies.iter().any(Anomaly::is_critical)
    }
}

/// A post with its author and trades attached.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedPost {
    pub post: Post,
    pub author: Author,
    pub queued: Vec<Trade>,
    pub executed: Vec<Trade>,
    pub diagnostics: TradeDiagnostics,
}

impl FeedPost {
    /// All trades, queued first.
    pub fn trades(&self) -> impl Iterator<Item = &Trade> {
        self.queued.iter().chain(self.executed.iter())
    }
}

/// Snapshot of everything the dashboard renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedState {
    pub phase: FeedPhase,
    /// A next-page fetch is in flight. Independent of `phase`.
    pub loading_more: bool,
    pub posts: Vec<FeedPost>,
    pub has_more: bool,
    /// Total posts reported by the backend, when it reports one.
    pub total: Option<u64>,
    /// Last page loaded (0-based).
    pub page: usize,
    /// Most recent load error.
    pub error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl FeedState {
    pub fn is_loading(&self) -> bool {
        self.phase == FeedPhase::Loading
    }

    /// Full-screen error only while nothing has ever been shown.
    pub fn show_error_banner(&self) -> bool {
        self.phase == FeedPhase::Error && self.posts.is_empty()
    }

    /// Queued trades across loaded posts.
    pub fn queued_trades(&self) -> impl Iterator<Item = (&FeedPost, &Trade)> {
        self.posts
            .iter()
            .flat_map(|fp| fp.queued.iter().map(move |trade| (fp, trade)))
    }

    /// Executed trades across loaded posts.
    pub fn executed_trades(&self) -> impl Iterator<Item = (&FeedPost, &Trade)> {
        self.posts
            .iter()
            .flat_map(|fp| fp.executed.iter().map(move |trade| (fp, trade)))
    }

    /// Counts and volume across loaded posts.
    pub fn totals(&self) -> TradeTotals {
        TradeTotals::from_trades(self.posts.iter().flat_map(FeedPost::trades))
    }

    /// Number of posts carrying at least one anomaly.
    pub fn anomaly_count(&self) -> usize {
        self.posts
            .iter()
            .filter(|fp| !fp.diagnostics.anomalies.is_empty())
            .count()
    }

    pub fn contains(&self, post_id: &str) -> bool {
        self.posts.iter().any(|fp| fp.post.id == post_id)
    }
}
