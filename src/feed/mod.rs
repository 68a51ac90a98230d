//! Client-side data loading for the dashboard.
//!
//! A [`FeedLoader`] pulls posts page by page from a [`FeedSource`], fetches
//! the queued and executed trade listings alongside the first page, resolves
//! authors through a coalescing [`AuthorDirectory`] and joins everything into
//! a [`FeedState`](crate::state::FeedState).

mod authors;
mod cache;
mod coalesce;
mod join;
mod loader;
mod source;
mod worker;

pub use authors::AuthorDirectory;
pub use cache::{Snapshot, SnapshotCache};
pub use coalesce::{Coalescer, SharedResult};
pub use join::{TradeBook, join_posts};
pub use loader::{FeedLoader, LoadOutcome, Liveness};
pub use source::{FeedSource, HttpFeedSource, Page, Pagination, PostQuery};
pub use worker::{FeedCommand, FeedWorker};

#[cfg(test)]
pub use source::MockFeedSource;
