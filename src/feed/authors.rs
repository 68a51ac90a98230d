//! Author lookups, deduplicated per author id.

use super::coalesce::Coalescer;
use super::source::FeedSource;
use crate::state::Author;
use futures::future::join_all;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolves authors through a [`Coalescer`] so each id is fetched at most
/// once until the directory is cleared.
pub struct AuthorDirectory {
    source: Arc<dyn FeedSource>,
    lookups: Coalescer<String, Option<Author>>,
}

impl AuthorDirectory {
    pub fn new(source: Arc<dyn FeedSource>) -> Self {
        Self {
            source,
            lookups: Coalescer::new(),
        }
    }

    /// Resolve one author. `None` when the author is unknown or the lookup
    /// failed; failures are not remembered.
    pub async fn resolve(&self, author_id: &str) -> Option<Author> {
        let source = self.source.clone();
        let id = author_id.to_string();
        let result = self
            .lookups
            .get_or_fetch(id.clone(), move || async move { source.fetch_author(&id).await })
            .await;

        match result {
            Ok(author) => author,
            Err(err) => {
                warn!(author_id, error = %err, "author lookup failed");
                None
            }
        }
    }

    /// Resolve every distinct id concurrently.
    pub async fn resolve_many<'a>(
        &self,
        author_ids: impl IntoIterator<Item = &'a str>,
    ) -> HashMap<String, Option<Author>> {
        let distinct: BTreeSet<&str> = author_ids.into_iter().collect();
        let requested = distinct.len();
        let lookups = distinct.into_iter().map(|id| async move {
            let author = self.resolve(id).await;
            (id.to_string(), author)
        });
        let resolved: HashMap<_, _> = join_all(lookups).await.into_iter().collect();
        let known = self.lookups.len().await;
        debug!(requested, known, "authors resolved");
        resolved
    }

    /// Forget every resolved author.
    pub async fn clear(&self) {
        self.lookups.clear().await;
    }
}
