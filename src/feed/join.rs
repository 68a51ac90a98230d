//! Joining trades and authors onto posts.

use crate::state::{Anomaly, Author, FeedPost, Post, Trade, TradeDiagnostics};
use std::collections::HashMap;
use tracing::{debug, error, warn};

/// Every queued and executed trade known to the loader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeBook {
    trades: Vec<Trade>,
}

impl TradeBook {
    /// Build a book from the two backend listings. Listing membership is
    /// ignored; each trade's stage decides where it lands.
    pub fn new(queued: Vec<Trade>, executed: Vec<Trade>) -> Self {
        let mut trades = queued;
        trades.extend(executed);
        Self { trades }
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    fn by_post(&self) -> HashMap<&str, Vec<&Trade>> {
        let mut index: HashMap<&str, Vec<&Trade>> = HashMap::new();
        for trade in &self.trades {
            index.entry(trade.post_id.as_str()).or_default().push(trade);
        }
        index
    }
}

/// Attach trades and authors to each post, in post order.
///
/// `authors` maps author ids to lookup results; a missing entry or `None`
/// yields the placeholder author.
pub fn join_posts(
    posts: Vec<Post>,
    book: &TradeBook,
    authors: &HashMap<String, Option<Author>>,
) -> Vec<FeedPost> {
    let index = book.by_post();

    let joined: Vec<FeedPost> = posts
        .into_iter()
        .map(|post| join_one(post, &index, authors))
        .collect();

    let matched: usize = joined.iter().map(|fp| fp.diagnostics.trade_count()).sum();
    debug!(
        posts = joined.len(),
        trades = book.len(),
        matched,
        "joined page"
    );

    let flagged = joined
        .iter()
        .filter(|fp| fp.diagnostics.has(Anomaly::MarketEffectWithoutTrades))
        .count();
    if flagged > 0 {
        error!(
            flagged,
            posts = joined.len(),
            "posts marked market_effect=true have no trades"
        );
    }

    joined
}

fn join_one(
    post: Post,
    index: &HashMap<&str, Vec<&Trade>>,
    authors: &HashMap<String, Option<Author>>,
) -> FeedPost {
    let mut anomalies = Vec::new();

    let (queued, executed): (Vec<Trade>, Vec<Trade>) = index
        .get(post.id.as_str())
        .into_iter()
        .flatten()
        .map(|trade| (*trade).clone())
        .partition(Trade::is_queued);

    if post.market_effect && queued.is_empty() && executed.is_empty() {
        error!(
            post_id = %post.id,
            preview = %post.preview(50),
            "{}",
            Anomaly::MarketEffectWithoutTrades
        );
        anomalies.push(Anomaly::MarketEffectWithoutTrades);
    }

    let author = match post.author_key() {
        None => {
            warn!(post_id = %post.id, "post has no author_id");
            anomalies.push(Anomaly::MissingAuthorId);
            Author::placeholder("")
        }
        Some(author_id) => match authors.get(author_id).cloned().flatten() {
            Some(author) => author,
            None => {
                anomalies.push(Anomaly::AuthorUnavailable);
                Author::placeholder(author_id)
            }
        },
    };

    let diagnostics = TradeDiagnostics {
        queued: queued.len(),
        executed: executed.len(),
        anomalies,
    };

    FeedPost {
        post,
        author,
        queued,
        executed,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TradeStage;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn post(id: &str, author_id: Option<&str>, market_effect: bool) -> Post {
        serde_json::from_value(serde_json::json!({
            "tweet_process_id": id,
            "tweet_content": format!("post {id}"),
            "author_id": author_id,
            "market_effect": market_effect
        }))
        .unwrap()
    }

    fn trade(id: &str, post_id: &str, executed: bool) -> Trade {
        Trade {
            id: id.to_string(),
            post_id: post_id.to_string(),
            ticker: "TSLA".to_string(),
            dollar_amount: dec!(5000),
            reasoning: String::new(),
            days_to_hold: 7,
            stage: if executed {
                TradeStage::Executed {
                    executed_at: Utc::now(),
                }
            } else {
                TradeStage::Queued { queued_at: None }
            },
            execution_price: None,
        }
    }

    fn authors(pairs: &[(&str, Option<&str>)]) -> HashMap<String, Option<Author>> {
        pairs
            .iter()
            .map(|(id, name)| {
                let author = name.map(|name| Author {
                    name: name.to_string(),
                    ..Author::placeholder(*id)
                });
                (id.to_string(), author)
            })
            .collect()
    }

    #[test]
    fn test_trades_land_under_their_post() {
        let book = TradeBook::new(
            vec![trade("q1", "p1", false), trade("q2", "p2", false)],
            vec![trade("e1", "p1", true), trade("orphan", "p9", true)],
        );
        let joined = join_posts(
            vec![post("p1", Some("a1"), true), post("p2", Some("a1"), true)],
            &book,
            &authors(&[("a1", Some("Jane Doe"))]),
        );

        assert_eq!(joined.len(), 2);
        for fp in &joined {
            assert!(fp.trades().all(|t| t.post_id == fp.post.id));
        }
        assert_eq!(joined[0].queued.len(), 1);
        assert_eq!(joined[0].executed.len(), 1);
        assert_eq!(joined[1].diagnostics.trade_count(), 1);
        // The orphan trade for p9 is dropped.
        let total: usize = joined.iter().map(|fp| fp.diagnostics.trade_count()).sum();
        assert_eq!(total, 3);
        assert_eq!(joined[0].author.name, "Jane Doe");
        assert!(joined[0].diagnostics.anomalies.is_empty());
    }

    #[test]
    fn test_stage_decides_partition_not_listing() {
        // An executed trade that came back in the queued listing.
        let book = TradeBook::new(vec![trade("x", "p1", true)], vec![]);
        let joined = join_posts(vec![post("p1", Some("a1"), true)], &book, &HashMap::new());
        assert!(joined[0].queued.is_empty());
        assert_eq!(joined[0].executed.len(), 1);
    }

    #[test]
    fn test_post_without_trades_is_flagged_not_hidden() {
        let joined = join_posts(
            vec![post("p1", Some("a1"), true), post("p2", Some("a1"), false)],
            &TradeBook::default(),
            &authors(&[("a1", Some("Jane Doe"))]),
        );

        assert_eq!(joined.len(), 2);
        assert_eq!(
            joined[0].diagnostics.anomalies,
            vec![Anomaly::MarketEffectWithoutTrades]
        );
        assert!(joined[1].diagnostics.anomalies.is_empty());
    }

    #[test]
    fn test_author_fallbacks() {
        let joined = join_posts(
            vec![
                post("p1", None, false),
                post("p2", Some("ghost"), false),
                post("p3", Some("failed"), false),
            ],
            &TradeBook::default(),
            &authors(&[("failed", None)]),
        );

        assert!(joined.iter().all(|fp| fp.author.is_placeholder()));
        assert_eq!(joined[0].diagnostics.anomalies, vec![Anomaly::MissingAuthorId]);
        assert_eq!(joined[1].author.id, "ghost");
        assert_eq!(joined[1].diagnostics.anomalies, vec![Anomaly::AuthorUnavailable]);
        assert_eq!(joined[2].diagnostics.anomalies, vec![Anomaly::AuthorUnavailable]);
    }

    #[test]
    fn test_join_is_deterministic() {
        let book = TradeBook::new(
            vec![trade("q1", "p1", false)],
            vec![trade("e1", "p1", true)],
        );
        let posts = vec![post("p1", Some("a1"), true), post("p2", None, true)];
        let names = authors(&[("a1", Some("Jane Doe"))]);

        let first = join_posts(posts.clone(), &book, &names);
        let second = join_posts(posts, &book, &names);
        assert_eq!(first, second);
    }
}
