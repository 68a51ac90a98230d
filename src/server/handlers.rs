//! Route handlers and the relay logic behind them.

use super::resource::Resource;
use super::response::ProxyError;
use crate::api::{BackendRequest, HttpTransport, RetryPolicy, RetryingClient, TransportResponse};
use crate::config::{Config, ResourcePolicy, ResourcesConfig};
use crate::error::{Error, Result};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use reqwest::Url;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{Instrument, debug, error, info_span, warn};
use uuid::Uuid;

type ProxyResult = std::result::Result<Json<Value>, ProxyError>;

/// Filters accepted on `GET /api/tweets`. Only these are forwarded.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostFilters {
    pub market_effect: Option<String>,
    pub limit: Option<String>,
    pub status: Option<String>,
    pub offset: Option<String>,
}

impl PostFilters {
    /// Present, non-empty filters in forwarding order.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("market_effect", &self.market_effect),
            ("limit", &self.limit),
            ("status", &self.status),
            ("offset", &self.offset),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| (key, v.to_string()))
        })
        .collect()
    }
}

/// Forwards requests to the backend and applies per-resource policies.
pub struct ProxyService {
    client: RetryingClient,
    base_url: String,
    api_key: Option<String>,
    resources: ResourcesConfig,
}

impl ProxyService {
    pub fn new(
        client: RetryingClient,
        base_url: impl Into<String>,
        api_key: Option<String>,
        resources: ResourcesConfig,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
            resources,
        }
    }

    /// Build the service with a reqwest transport from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = HttpTransport::new(config.backend.timeout())?;
        let client = RetryingClient::new(
            Arc::new(transport),
            RetryPolicy::from_config(&config.backend),
        );
        Ok(Self::new(
            client,
            config.backend.base_url.clone(),
            config.backend.api_key.clone(),
            config.resources.clone(),
        ))
    }

    /// Fetch `resource` from the backend and turn the outcome into a proxy
    /// response.
    pub async fn relay(&self, resource: Resource, query: &[(&'static str, String)]) -> ProxyResult {
        let span = info_span!(
            "proxy",
            request_id = %Uuid::new_v4(),
            resource = resource.name()
        );
        self.relay_in_span(&resource, query).instrument(span).await
    }

    async fn relay_in_span(&self, resource: &Resource, query: &[(&'static str, String)]) -> ProxyResult {
        let policy = resource.policy(&self.resources);

        match self.forward(resource, query, policy).await {
            Ok(response) if response.is_success() => match response.json::<Value>() {
                Ok(body) => {
                    debug!(status = response.status, "relayed backend response");
                    Ok(Json(body))
                }
                Err(err) => self.fail(resource, policy, err),
            },
            Ok(response) => {
                warn!(status = response.status, "backend returned an error status");
                if policy.degrade_to_mock_on_failure {
                    Ok(self.mock(resource))
                } else {
                    Err(ProxyError::upstream(
                        response.status,
                        resource.failure_message(response.status),
                    ))
                }
            }
            Err(err) => self.fail(resource, policy, err),
        }
    }

    fn fail(&self, resource: &Resource, policy: ResourcePolicy, err: Error) -> ProxyResult {
        error!(error = %err, "backend request failed");
        if policy.degrade_to_mock_on_failure {
            Ok(self.mock(resource))
        } else {
            Err(ProxyError::Internal)
        }
    }

    fn mock(&self, resource: &Resource) -> Json<Value> {
        warn!("falling back to mock data");
        Json(resource.mock_payload(Utc::now()))
    }

    async fn forward(
        &self,
        resource: &Resource,
        query: &[(&'static str, String)],
        policy: ResourcePolicy,
    ) -> Result<TransportResponse> {
        let mut request = BackendRequest::get(self.backend_url(resource, query)?);
        if policy.requires_auth {
            let key = self
                .api_key
                .as_deref()
                .ok_or_else(|| Error::auth("ADMIN_API_KEY is not configured"))?;
            request = request.with_bearer(key);
        }
        debug!(url = %request.url, "forwarding to backend");
        self.client.fetch(&request).await
    }

    fn backend_url(&self, resource: &Resource, query: &[(&'static str, String)]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::config(format!("backend.base_url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| Error::config("backend.base_url cannot carry a path"))?
            .pop_if_empty()
            .extend(resource.backend_segments());
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }
}

/// `GET /api/tweets`
pub async fn posts(
    State(service): State<Arc<ProxyService>>,
    Query(filters): Query<PostFilters>,
) -> ProxyResult {
    service.relay(Resource::Posts, &filters.pairs()).await
}

/// `GET /api/trades/queued`
pub async fn queued_trades(State(service): State<Arc<ProxyService>>) -> ProxyResult {
    service.relay(Resource::QueuedTrades, &[]).await
}

/// `GET /api/trades/executed`
pub async fn executed_trades(State(service): State<Arc<ProxyService>>) -> ProxyResult {
    service.relay(Resource::ExecutedTrades, &[]).await
}

/// `GET /api/trades/queued/{post_id}`
pub async fn queued_trades_by_post(
    State(service): State<Arc<ProxyService>>,
    Path(post_id): Path<String>,
) -> ProxyResult {
    service
        .relay(Resource::QueuedTradesByPost(post_id), &[])
        .await
}

/// `GET /api/trades/executed/{post_id}`
pub async fn executed_trades_by_post(
    State(service): State<Arc<ProxyService>>,
    Path(post_id): Path<String>,
) -> ProxyResult {
    service
        .relay(Resource::ExecutedTradesByPost(post_id), &[])
        .await
}

/// `GET /api/authors/{author_id}`
pub async fn author(
    State(service): State<Arc<ProxyService>>,
    Path(author_id): Path<String>,
) -> ProxyResult {
    service.relay(Resource::Author(author_id), &[]).await
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
