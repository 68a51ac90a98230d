//! Paginated feed loading.

use super::authors::AuthorDirectory;
use super::cache::{Snapshot, SnapshotCache};
use super::join::{TradeBook, join_posts};
use super::source::{FeedSource, Page, PostQuery};
use crate::config::FeedConfig;
use crate::state::{Author, FeedPhase, FeedState, Post, Trade};
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Shared flag telling in-flight loads whether anyone still wants the result.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Default for Liveness {
    fn default() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }
}

impl Liveness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_mounted(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Results of loads still in flight are dropped from now on.
    pub fn unmount(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// What a loader operation ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Fresh data was fetched and committed.
    Committed,
    /// The snapshot cache answered.
    Cached,
    /// The posts fetch failed; the error is in the state.
    Failed,
    /// Preconditions did not hold; nothing was fetched.
    Skipped,
    /// The loader was unmounted before the result arrived.
    Discarded,
}

/// Loads posts page by page and joins trades and authors onto them.
///
/// Every operation takes `&mut self`: one task owns the loader. Observers
/// follow state changes through [`FeedLoader::subscribe`].
pub struct FeedLoader {
    source: Arc<dyn FeedSource>,
    authors: AuthorDirectory,
    cache: Option<Arc<SnapshotCache>>,
    liveness: Liveness,
    page_size: usize,
    status_filter: Option<String>,
    book: TradeBook,
    state: watch::Sender<FeedState>,
}

impl FeedLoader {
    /// Create a loader with the given page size (at least 1).
    pub fn new(source: Arc<dyn FeedSource>, page_size: usize) -> Self {
        let (state, _) = watch::channel(FeedState::default());
        Self {
            authors: AuthorDirectory::new(source.clone()),
            source,
            cache: None,
            liveness: Liveness::new(),
            page_size: page_size.max(1),
            status_filter: None,
            book: TradeBook::default(),
            state,
        }
    }

    /// Create a loader from the feed configuration. The cache, if any, is
    /// owned by the caller.
    pub fn from_config(
        source: Arc<dyn FeedSource>,
        config: &FeedConfig,
        cache: Option<Arc<SnapshotCache>>,
    ) -> Self {
        let mut loader = Self::new(source, config.page_size)
            .with_status_filter(Some(config.status_filter.clone()));
        loader.cache = cache;
        loader
    }

    /// Only request posts with this processing status.
    pub fn with_status_filter(mut self, status: Option<String>) -> Self {
        self.status_filter = status.filter(|s| !s.trim().is_empty());
        self
    }

    /// Serve `load` from (and store page-0 results in) this cache.
    pub fn with_cache(mut self, cache: Arc<SnapshotCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Current state.
    pub fn state(&self) -> FeedState {
        self.state.borrow().clone()
    }

    /// Follow state changes.
    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state.subscribe()
    }

    /// Handle for unmounting from another task.
    pub fn liveness(&self) -> Liveness {
        self.liveness.clone()
    }

    pub fn unmount(&self) {
        self.liveness.unmount();
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Initial load. Answered from the snapshot cache when it is fresh.
    pub async fn load(&mut self) -> LoadOutcome {
        if let Some(snapshot) = self.cache.as_ref().and_then(|cache| cache.get()) {
            if !self.liveness.is_mounted() {
                return LoadOutcome::Discarded;
            }
            info!(posts = snapshot.state.posts.len(), "feed served from cache");
            self.book = snapshot.book;
            self.state.send_replace(snapshot.state);
            return LoadOutcome::Cached;
        }
        self.load_first_page().await
    }

    /// Drop cached data and pagination, then load page 0 from the network.
    ///
    /// Posts already on screen stay until the new page arrives.
    pub async fn refresh(&mut self) -> LoadOutcome {
        if let Some(cache) = &self.cache {
            cache.invalidate();
        }
        self.authors.clear().await;
        self.state.send_modify(|state| {
            state.page = 0;
            state.has_more = false;
            state.total = None;
        });
        self.load_first_page().await
    }

    /// Append the next page. Only runs when ready, with more to load and no
    /// other next-page fetch in flight.
    pub async fn load_more(&mut self) -> LoadOutcome {
        let (page, known_authors) = {
            let state = self.state.borrow();
            if state.phase != FeedPhase::Ready || !state.has_more || state.loading_more {
                return LoadOutcome::Skipped;
            }
            let known: HashMap<String, Option<Author>> = state
                .posts
                .iter()
                .filter(|fp| !fp.author.is_placeholder())
                .map(|fp| (fp.author.id.clone(), Some(fp.author.clone())))
                .collect();
            (state.page + 1, known)
        };

        self.state.send_modify(|state| {
            state.loading_more = true;
            state.error = None;
        });

        let query = self.query(page);
        let result = self.source.fetch_posts(&query).await;
        if !self.liveness.is_mounted() {
            return LoadOutcome::Discarded;
        }

        let fetched = match result {
            Ok(fetched) => fetched,
            Err(err) => {
                error!(page, error = %err, "failed to load more posts");
                self.state.send_modify(|state| {
                    state.loading_more = false;
                    state.error = Some(err.to_string());
                });
                return LoadOutcome::Failed;
            }
        };

        let has_more = self.has_more(&fetched, query.offset.unwrap_or(0));
        let total = fetched.pagination.and_then(|p| p.total);
        let rows = fetched.items.len();

        let existing: HashSet<String> = self
            .state
            .borrow()
            .posts
            .iter()
            .map(|fp| fp.post.id.clone())
            .collect();
        let fresh = dedupe(fetched.items, existing);

        let unknown: Vec<&str> = fresh
            .iter()
            .filter_map(Post::author_key)
            .filter(|id| !known_authors.contains_key(*id))
            .collect();
        let mut authors = self.authors.resolve_many(unknown).await;
        if !self.liveness.is_mounted() {
            return LoadOutcome::Discarded;
        }
        authors.extend(known_authors);

        let joined = join_posts(fresh, &self.book, &authors);
        info!(page, rows, added = joined.len(), has_more, "loaded more posts");

        self.state.send_modify(|state| {
            state.posts.extend(joined);
            state.page = page;
            state.has_more = has_more;
            state.total = total.or(state.total);
            state.loading_more = false;
            state.error = None;
            state.last_updated = Some(Utc::now());
        });
        LoadOutcome::Committed
    }

    async fn load_first_page(&mut self) -> LoadOutcome {
        self.state.send_modify(|state| {
            state.phase = FeedPhase::Loading;
            state.loading_more = false;
            state.error = None;
        });

        let query = self.query(0);
        let (posts, queued, executed) = tokio::join!(
            self.source.fetch_posts(&query),
            self.source.fetch_queued_trades(),
            self.source.fetch_executed_trades(),
        );
        if !self.liveness.is_mounted() {
            return LoadOutcome::Discarded;
        }

        let fetched = match posts {
            Ok(fetched) => fetched,
            Err(err) => {
                error!(error = %err, "failed to load posts");
                self.state.send_modify(|state| {
                    state.phase = FeedPhase::Error;
                    state.error = Some(err.to_string());
                });
                return LoadOutcome::Failed;
            }
        };

        let book = TradeBook::new(
            trades_or_empty(queued, "queued"),
            trades_or_empty(executed, "executed"),
        );
        let has_more = self.has_more(&fetched, 0);
        let total = fetched.pagination.and_then(|p| p.total);
        let rows = fetched.items.len();
        let posts = dedupe(fetched.items, HashSet::new());

        let authors = self
            .authors
            .resolve_many(posts.iter().filter_map(Post::author_key))
            .await;
        if !self.liveness.is_mounted() {
            return LoadOutcome::Discarded;
        }

        let joined = join_posts(posts, &book, &authors);
        info!(rows, trades = book.len(), has_more, "loaded feed");

        let state = FeedState {
            phase: FeedPhase::Ready,
            loading_more: false,
            posts: joined,
            has_more,
            total,
            page: 0,
            error: None,
            last_updated: Some(Utc::now()),
        };
        if let Some(cache) = &self.cache {
            cache.put(Snapshot {
                state: state.clone(),
                book: book.clone(),
            });
        }
        self.book = book;
        self.state.send_replace(state);
        LoadOutcome::Committed
    }

    fn query(&self, page: usize) -> PostQuery {
        PostQuery::page(page, self.page_size, self.status_filter.as_deref())
    }

    /// Pagination metadata wins; a full page means there may be more.
    fn has_more(&self, page: &Page<Post>, offset: usize) -> bool {
        let rows = page.items.len();
        match page.pagination {
            Some(pagination) => match (pagination.has_more, pagination.total) {
                (Some(has_more), _) => has_more,
                (None, Some(total)) => ((offset + rows) as u64) < total,
                (None, None) => rows == self.page_size,
            },
            None => rows == self.page_size,
        }
    }
}

fn trades_or_empty(result: crate::Result<Vec<Trade>>, listing: &str) -> Vec<Trade> {
    result.unwrap_or_else(|err| {
        warn!(listing, error = %err, "trade listing unavailable, continuing without it");
        Vec::new()
    })
}

/// Keep the first occurrence of each post id not already in `seen`.
fn dedupe(posts: Vec<Post>, mut seen: HashSet<String>) -> Vec<Post> {
    posts
        .into_iter()
        .filter(|post| seen.insert(post.id.clone()))
        .collect()
}
