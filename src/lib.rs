//! # signaldesk - proxy and dashboard for post-driven trade signals
//!
//! A trading backend ingests social-media posts, judges whether they move
//! markets and derives queued and executed trades from them. signaldesk sits
//! in front of that backend:
//!
//! - **Server**: HTTP proxy with retries, per-resource mock fallback and
//!   bearer credentials
//! - **Feed**: paginated client-side join of posts, trades and authors with
//!   request coalescing and a snapshot cache
//! - **App / UI / Events**: ratatui dashboard over the joined feed
//! - **API**: transport and retry layer shared by proxy and dashboard
//! - **State**: domain types and the action/reducer store
//! - **Config**: layered configuration

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod feed;
pub mod server;
pub mod state;
pub mod ui;

pub use app::App;
pub use config::Config;
pub use error::{Error, Result};
pub use feed::{FeedLoader, FeedSource, HttpFeedSource};
pub use server::{ProxyServer, ProxyService};
