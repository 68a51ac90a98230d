//! The backend resources the proxy exposes.

use super::mock;
use crate::config::{ResourcePolicy, ResourcesConfig};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// One proxied backend resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Posts,
    QueuedTrades,
    ExecutedTrades,
    QueuedTradesByPost(String),
    ExecutedTradesByPost(String),
    Author(String),
}

impl Resource {
    /// Stable name used in logs and configuration.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Posts => "posts",
            Self::QueuedTrades => "queued_trades",
            Self::ExecutedTrades => "executed_trades",
            Self::QueuedTradesByPost(_) => "queued_trades_by_post",
            Self::ExecutedTradesByPost(_) => "executed_trades_by_post",
            Self::Author(_) => "author",
        }
    }

    /// Path segments below the backend base URL.
    pub fn backend_segments(&self) -> Vec<&str> {
        match self {
            Self::Posts => vec!["tweets", "processes"],
            Self::QueuedTrades => vec!["trading", "trades", "queued"],
            Self::ExecutedTrades => vec!["trading", "trades", "executed"],
            Self::QueuedTradesByPost(id) => vec!["trading", "trades", "queued", id.as_str()],
            Self::ExecutedTradesByPost(id) => vec!["trading", "trades", "executed", id.as_str()],
            Self::Author(id) => vec!["authors", id.as_str()],
        }
    }

    /// The configured policy for this resource.
    pub fn policy(&self, resources: &ResourcesConfig) -> ResourcePolicy {
        match self {
            Self::Posts => resources.posts,
            Self::QueuedTrades => resources.queued_trades,
            Self::ExecutedTrades => resources.executed_trades,
            Self::QueuedTradesByPost(_) => resources.queued_trades_by_post,
            Self::ExecutedTradesByPost(_) => resources.executed_trades_by_post,
            Self::Author(_) => resources.author,
        }
    }

    /// Error text for a non-OK backend status.
    pub fn failure_message(&self, status: u16) -> String {
        match self {
            Self::Author(_) => "Failed to fetch author".to_string(),
            _ => format!("HTTP {status}"),
        }
    }

    /// Payload served in place of an error when the resource degrades.
    pub fn mock_payload(&self, now: DateTime<Utc>) -> Value {
        match self {
            Self::Posts => mock::posts(now),
            Self::QueuedTrades => mock::queued_trades(now),
            Self::ExecutedTrades => mock::executed_trades(now),
            Self::QueuedTradesByPost(id) => mock::queued_trades_for(id, now),
            Self::ExecutedTradesByPost(id) => mock::executed_trades_for(id, now),
            Self::Author(id) => mock::author(id),
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}", self.backend_segments().join("/"))
    }
}
