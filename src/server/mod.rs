//! HTTP proxy in front of the trading backend.
//!
//! Every route maps to one [`Resource`]. The [`ProxyService`] forwards the
//! request, retries rate limits and network failures, and then either relays
//! the backend body untouched, answers with an error envelope, or serves a
//! canned payload for resources configured to degrade.

mod handlers;
mod mock;
mod resource;
mod response;

pub use handlers::{PostFilters, ProxyService};
pub use resource::Resource;
pub use response::{INTERNAL_ERROR, ProxyError};

use crate::config::Config;
use crate::error::Result;
use axum::{Router, routing::get};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// The proxy HTTP server.
pub struct ProxyServer {
    service: Arc<ProxyService>,
    bind_addr: String,
    cors_permissive: bool,
}

impl ProxyServer {
    pub fn new(service: ProxyService, bind_addr: impl Into<String>, cors_permissive: bool) -> Self {
        Self {
            service: Arc::new(service),
            bind_addr: bind_addr.into(),
            cors_permissive,
        }
    }

    /// Build the server and its reqwest-backed service from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            ProxyService::from_config(config)?,
            config.server.bind_addr.clone(),
            config.server.cors_permissive,
        ))
    }

    /// The route table.
    pub fn router(&self) -> Router {
        let router = Router::new()
            .route("/api/tweets", get(handlers::posts))
            .route("/api/trades/queued", get(handlers::queued_trades))
            .route("/api/trades/executed", get(handlers::executed_trades))
            .route(
                "/api/trades/queued/{post_id}",
                get(handlers::queued_trades_by_post),
            )
            .route(
                "/api/trades/executed/{post_id}",
                get(handlers::executed_trades_by_post),
            )
            .route("/api/authors/{author_id}", get(handlers::author))
            .route("/health", get(handlers::health));

        let router = if self.cors_permissive {
            router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
        } else {
            router
        };

        router.with_state(self.service.clone())
    }

    /// Serve on an already-bound listener until the task is dropped.
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        axum::serve(listener, self.router()).await?;
        Ok(())
    }

    /// Bind the configured address and serve until Ctrl-C.
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(&self.bind_addr).await?;
        info!("Proxy listening on http://{}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("Shutting down proxy");
            })
            .await?;
        Ok(())
    }
}
