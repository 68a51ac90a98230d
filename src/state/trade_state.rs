//! Trade-related state.

use super::de::null_as_default;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where a trade sits in its lifecycle.
///
/// A trade is executed exactly when the backend reports an execution
/// timestamp; every other trade is queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeStage {
    Queued { queued_at: Option<DateTime<Utc>> },
    Executed { executed_at: DateTime<Utc> },
}

impl std::fmt::Display for TradeStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Queued { .. } => write!(f, "Queued"),
            Self::Executed { .. } => write!(f, "Executed"),
        }
    }
}

/// A buy action derived from a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TradeRecord", into = "TradeRecord")]
pub struct Trade {
    /// Trade ID.
    pub id: String,
    /// Owning post ID.
    pub post_id: String,
    /// Ticker symbol.
    pub ticker: String,
    /// Signed dollar amount.
    pub dollar_amount: Decimal,
    /// Model reasoning behind the trade.
    pub reasoning: String,
    /// Intended holding period in days.
    pub days_to_hold: u32,
    /// Lifecycle stage.
    pub stage: TradeStage,
    /// Fill price, when executed and reported.
    pub execution_price: Option<Decimal>,
}

impl Trade {
    /// Whether the trade has been filled.
    pub fn is_executed(&self) -> bool {
        matches!(self.stage, TradeStage::Executed { .. })
    }

    /// Whether the trade is still waiting for execution.
    pub fn is_queued(&self) -> bool {
        !self.is_executed()
    }

    /// The lifecycle timestamp, queued or executed.
    pub fn stage_time(&self) -> Option<DateTime<Utc>> {
        match self.stage {
            TradeStage::Queued { queued_at } => queued_at,
            TradeStage::Executed { executed_at } => Some(executed_at),
        }
    }

    /// Absolute dollar volume.
    pub fn volume(&self) -> Decimal {
        self.dollar_amount.abs()
    }
}

/// Trade IDs arrive as strings or integers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Number(i64),
}

impl From<IdRepr> for String {
    fn from(id: IdRepr) -> Self {
        match id {
            IdRepr::Text(text) => text,
            IdRepr::Number(n) => n.to_string(),
        }
    }
}

/// Wire shape of a trade record.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TradeRecord {
    id: IdRepr,
    #[serde(rename = "tweet_process_id", alias = "tweet_id")]
    post_id: String,
    #[serde(alias = "symbol")]
    ticker: String,
    #[serde(default, deserialize_with = "null_as_default")]
    dollar_amount: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    reasoning: String,
    #[serde(default, alias = "timeline", deserialize_with = "null_as_default")]
    days_to_hold: u32,
    #[serde(
        default,
        with = "super::timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    queued_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        with = "super::timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    executed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    execution_price: Option<Decimal>,
}

impl From<TradeRecord> for Trade {
    fn from(record: TradeRecord) -> Self {
        let stage = match record.executed_at {
            Some(executed_at) => TradeStage::Executed { executed_at },
            None => TradeStage::Queued {
                queued_at: record.queued_at,
            },
        };

        Self {
            id: record.id.into(),
            post_id: record.post_id,
            ticker: record.ticker.trim_start_matches('$').to_uppercase(),
            dollar_amount: record.dollar_amount,
            reasoning: record.reasoning,
            days_to_hold: record.days_to_hold,
            stage,
            execution_price: record.execution_price,
        }
    }
}

impl From<Trade> for TradeRecord {
    fn from(trade: Trade) -> Self {
        let (queued_at, executed_at) = match trade.stage {
            TradeStage::Queued { queued_at } => (queued_at, None),
            TradeStage::Executed { executed_at } => (None, Some(executed_at)),
        };

        Self {
            id: IdRepr::Text(trade.id),
            post_id: trade.post_id,
            ticker: trade.ticker,
            dollar_amount: trade.dollar_amount,
            reasoning: trade.reasoning,
            days_to_hold: trade.days_to_hold,
            queued_at,
            executed_at,
            execution_price: trade.execution_price,
        }
    }
}

/// Aggregate counts and volume over a set of trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TradeTotals {
    pub queued: usize,
    pub executed: usize,
    pub volume: Decimal,
}

impl TradeTotals {
    /// Sum over the given trades.
    pub fn from_trades<'a>(trades: impl IntoIterator<Item = &'a Trade>) -> Self {
        trades.into_iter().fold(Self::default(), |mut acc, trade| {
            if trade.is_executed() {
                acc.executed += 1;
            } else {
                acc.queued += 1;
            }
            acc.volume += trade.volume();
            acc
        })
    }

    /// Total number of trades.
    pub fn count(&self) -> usize {
        self.queued + self.executed
    }
}
