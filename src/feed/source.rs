//! Where the loader gets its data from.

use crate::api::{BackendRequest, RetryingClient, endpoint_url};
use crate::error::{Error, Result};
use crate::state::{Author, Post, Trade};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Filters for a page of posts, serialized in a fixed order:
/// `market_effect`, `limit`, `status`, `offset`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub market_effect: Option<bool>,
    pub limit: Option<usize>,
    pub status: Option<String>,
    pub offset: Option<usize>,
}

impl PostQuery {
    /// Query for one page of market-moving posts.
    pub fn page(page: usize, page_size: usize, status: Option<&str>) -> Self {
        Self {
            market_effect: Some(true),
            limit: Some(page_size),
            status: status.filter(|s| !s.is_empty()).map(str::to_string),
            offset: Some(page * page_size),
        }
    }

    /// Present filters as query pairs, in wire order.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(4);
        if let Some(market_effect) = self.market_effect {
            pairs.push(("market_effect", market_effect.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(status) = &self.status {
            pairs.push(("status", status.clone()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        pairs
    }
}

/// Pagination metadata attached to a posts listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Pagination {
    pub total: Option<u64>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub has_more: Option<bool>,
}

/// One page of items plus whatever pagination the backend reported.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Option<Pagination>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            pagination: None,
        }
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

/// The `{success, data | trades, pagination, error}` envelope.
#[derive(Debug, Deserialize)]
#[serde(bound = "T: DeserializeOwned")]
struct Envelope<T> {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    trades: Option<T>,
    #[serde(default)]
    pagination: Option<Pagination>,
    #[serde(default)]
    error: Option<String>,
}

fn default_success() -> bool {
    true
}

impl<T> Envelope<T> {
    fn into_payload(self) -> Result<(Option<T>, Option<Pagination>)> {
        if !self.success {
            return Err(Error::application(
                self.error.unwrap_or_else(|| "Request failed".to_string()),
            ));
        }
        Ok((self.data.or(self.trades), self.pagination))
    }
}

/// Read access to posts, trades and authors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch one page of posts.
    async fn fetch_posts(&self, query: &PostQuery) -> Result<Page<Post>>;

    /// Fetch every queued trade.
    async fn fetch_queued_trades(&self) -> Result<Vec<Trade>>;

    /// Fetch every executed trade.
    async fn fetch_executed_trades(&self) -> Result<Vec<Trade>>;

    /// Fetch one author. `Ok(None)` when the author does not exist.
    async fn fetch_author(&self, author_id: &str) -> Result<Option<Author>>;
}

/// [`FeedSource`] reading from the proxy API over HTTP.
#[derive(Clone)]
pub struct HttpFeedSource {
    client: RetryingClient,
    api_url: String,
}

impl HttpFeedSource {
    /// Create a source against the proxy API base URL (e.g. `http://127.0.0.1:3000/api`).
    pub fn new(client: RetryingClient, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
        }
    }

    async fn get_envelope<T: DeserializeOwned>(
        &self,
        request: BackendRequest,
    ) -> Result<(Option<T>, Option<Pagination>)> {
        let response = self.client.fetch(&request).await?;
        if !response.is_success() {
            // Prefer the proxy's own error text over the raw body.
            let message = response
                .json::<Envelope<serde_json::Value>>()
                .ok()
                .and_then(|env| env.error)
                .unwrap_or_else(|| format!("HTTP {}", response.status));
            return Err(response.status_error(message));
        }
        response.json::<Envelope<T>>()?.into_payload()
    }

    async fn fetch_trades(&self, path: &str) -> Result<Vec<Trade>> {
        let url = endpoint_url(&self.api_url, path)?;
        let (trades, _) = self
            .get_envelope::<Vec<serde_json::Value>>(BackendRequest::get(url))
            .await?;
        Ok(decode_items(trades.unwrap_or_default(), "trade"))
    }
}

/// Decode each record on its own. Records that do not decode are logged
/// and skipped.
fn decode_items<T: DeserializeOwned>(values: Vec<serde_json::Value>, kind: &str) -> Vec<T> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(kind, index, error = %e, "skipping malformed record");
                None
            }
        })
        .collect()
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch_posts(&self, query: &PostQuery) -> Result<Page<Post>> {
        let mut url = endpoint_url(&self.api_url, "tweets")?;
        {
            let pairs = query.pairs();
            if !pairs.is_empty() {
                let mut serializer = url.query_pairs_mut();
                for (key, value) in &pairs {
                    serializer.append_pair(key, value);
                }
            }
        }
        debug!(%url, "fetching posts");

        let (posts, pagination) = self
            .get_envelope::<Vec<serde_json::Value>>(BackendRequest::get(url))
            .await?;
        Ok(Page {
            items: decode_items::<Post>(posts.unwrap_or_default(), "post"),
            pagination,
        })
    }

    async fn fetch_queued_trades(&self) -> Result<Vec<Trade>> {
        self.fetch_trades("trades/queued").await
    }

    async fn fetch_executed_trades(&self) -> Result<Vec<Trade>> {
        self.fetch_trades("trades/executed").await
    }

    async fn fetch_author(&self, author_id: &str) -> Result<Option<Author>> {
        let mut url = endpoint_url(&self.api_url, "authors")?;
        url.path_segments_mut()
            .map_err(|_| Error::invalid_input(format!("{} cannot be a base", self.api_url)))?
            .push(author_id);

        match self.get_envelope::<Author>(BackendRequest::get(url)).await {
            Ok((author, _)) => Ok(author),
            Err(Error::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MockTransport, RetryPolicy, TransportResponse};
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn source(mock: MockTransport) -> HttpFeedSource {
        let client = RetryingClient::new(
            Arc::new(mock),
            RetryPolicy::new(1, Duration::from_millis(1)),
        );
        HttpFeedSource::new(client, "http://proxy.test/api")
    }

    #[test]
    fn test_query_order() {
        let query = PostQuery::page(2, 20, Some("completed"));
        assert_eq!(
            query.pairs(),
            vec![
                ("market_effect", "true".to_string()),
                ("limit", "20".to_string()),
                ("status", "completed".to_string()),
                ("offset", "40".to_string()),
            ]
        );

        let bare = PostQuery {
            offset: Some(0),
            ..Default::default()
        };
        assert_eq!(bare.pairs(), vec![("offset", "0".to_string())]);
    }

    #[tokio::test]
    async fn test_fetch_posts_sends_filters_and_reads_pagination() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let record = seen.clone();
        let mut mock = MockTransport::new();
        mock.expect_get().returning(move |request| {
            record.lock().unwrap().push(request.url.to_string());
            Ok(TransportResponse::new(
                200,
                r#"{"success":true,"data":[{"tweet_process_id":"p1","tweet_content":"hi","author_id":"a1"}],
                    "pagination":{"total":41,"limit":20,"offset":0,"hasMore":true}}"#,
            ))
        });

        let page = source(mock)
            .fetch_posts(&PostQuery::page(0, 20, Some("completed")))
            .await
            .unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.pagination.unwrap().total, Some(41));
        assert_eq!(page.pagination.unwrap().has_more, Some(true));
        assert_eq!(
            seen.lock().unwrap()[0],
            "http://proxy.test/api/tweets?market_effect=true&limit=20&status=completed&offset=0"
        );
    }

    #[tokio::test]
    async fn test_trades_accept_either_list_key() {
        let mut mock = MockTransport::new();
        mock.expect_get().returning(|request| {
            let body = if request.url.path().ends_with("queued") {
                r#"{"success":true,"trades":[{"id":"q1","tweet_process_id":"p1","ticker":"TSLA","dollar_amount":5000,"queued_at":"2024-01-15T10:35:00Z"}]}"#
            } else {
                r#"{"success":true,"data":[{"id":1,"tweet_id":"mock-1","ticker":"ENPH","dollar_amount":4200,"executed_at":"2024-01-15T10:35:00Z"}]}"#
            };
            Ok(TransportResponse::new(200, body))
        });
        let source = source(mock);

        let queued = source.fetch_queued_trades().await.unwrap();
        let executed = source.fetch_executed_trades().await.unwrap();
        assert_eq!(queued.len(), 1);
        assert!(queued[0].is_queued());
        assert_eq!(executed.len(), 1);
        assert!(executed[0].is_executed());
    }

    #[tokio::test]
    async fn test_null_reasoning_keeps_the_listing() {
        let mut mock = MockTransport::new();
        mock.expect_get().returning(|_| {
            Ok(TransportResponse::new(
                200,
                r#"{"success":true,"trades":[
                    {"id":"q1","tweet_process_id":"p1","ticker":"TSLA","dollar_amount":5000,"reasoning":null,"days_to_hold":null},
                    {"id":"q2","tweet_process_id":"p2","ticker":"NVDA","dollar_amount":7500,"reasoning":"Earnings beat"}]}"#,
            ))
        });

        let trades = source(mock).fetch_queued_trades().await.unwrap();
        let ids: Vec<&str> = trades.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["q1", "q2"]);
        assert_eq!(trades[0].reasoning, "");
    }

    #[tokio::test]
    async fn test_malformed_records_are_skipped() {
        let mut mock = MockTransport::new();
        mock.expect_get().returning(|request| {
            let body = if request.url.path().ends_with("tweets") {
                r#"{"success":true,"data":[{"tweet_content":"no id"},{"tweet_process_id":"p1","tweet_content":"ok"}]}"#
            } else {
                r#"{"success":true,"trades":[{"id":"q1","ticker":"TSLA"},{"id":"q2","tweet_process_id":"p1","ticker":"SPY"}]}"#
            };
            Ok(TransportResponse::new(200, body))
        });
        let source = source(mock);

        let page = source.fetch_posts(&PostQuery::page(0, 20, None)).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, "p1");

        let trades = source.fetch_queued_trades().await.unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].id, "q2");
    }

    #[tokio::test]
    async fn test_error_envelope_becomes_upstream_error() {
        let mut mock = MockTransport::new();
        mock.expect_get().returning(|_| {
            Ok(TransportResponse::new(
                500,
                r#"{"success":false,"error":"Internal server error"}"#,
            ))
        });

        let err = source(mock)
            .fetch_posts(&PostQuery::page(0, 20, None))
            .await
            .unwrap_err();
        match err {
            Error::Upstream { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Internal server error");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_author_is_none() {
        let mut mock = MockTransport::new();
        mock.expect_get().returning(|request| {
            assert_eq!(request.url.path(), "/api/authors/a%20b");
            Ok(TransportResponse::new(
                404,
                r#"{"success":false,"error":"Failed to fetch author"}"#,
            ))
        });

        let author = source(mock).fetch_author("a b").await.unwrap();
        assert_eq!(author, None);
    }

    #[tokio::test]
    async fn test_author_envelope() {
        let mut mock = MockTransport::new();
        mock.expect_get().returning(|_| {
            Ok(TransportResponse::new(
                200,
                r#"{"success":true,"data":{"id":"a1","name":"Jane Doe","platform":"twitter"}}"#,
            ))
        });

        let author = source(mock).fetch_author("a1").await.unwrap().unwrap();
        assert_eq!(author.name, "Jane Doe");
    }
}
