//! Keyed request coalescing.
//!
//! Concurrent requests for the same key share one in-flight future; later
//! requests for a key that already resolved successfully get the stored
//! result. Failed results are evicted so the next request tries again.

use crate::error::Error;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

/// Outcome shared between every caller waiting on the same key.
pub type SharedResult<V> = std::result::Result<V, Arc<Error>>;

type Entry<V> = (u64, Shared<BoxFuture<'static, SharedResult<V>>>);

/// Request-coalescing cache keyed by `K`.
pub struct Coalescer<K, V>
where
    V: Clone,
{
    entries: Mutex<HashMap<K, Entry<V>>>,
    generation: AtomicU64,
}

impl<K, V> Default for Coalescer<K, V>
where
    V: Clone,
{
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            generation: AtomicU64::new(0),
        }
    }
}

impl<K, V> Coalescer<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `key`, starting `fetch` only if no request for it is in
    /// flight or stored.
    ///
    /// The map lock is held only to look up or insert the entry, never
    /// across the fetch itself.
    pub async fn get_or_fetch<F, Fut>(&self, key: K, fetch: F) -> SharedResult<V>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = crate::Result<V>> + Send + 'static,
    {
        let (generation, shared) = {
            let mut entries = self.entries.lock().await;
            match entries.get(&key) {
                Some(entry) => entry.clone(),
                None => {
                    let generation = self
                        .generation
                        .fetch_add(1, Ordering::Relaxed);
                    let shared = fetch().map(|result| result.map_err(Arc::new)).boxed().shared();
                    entries.insert(key.clone(), (generation, shared.clone()));
                    (generation, shared)
                }
            }
        };

        let result = shared.await;
        if result.is_err() {
            // Only drop the entry we awaited; a retry may already have replaced it.
            let mut entries = self.entries.lock().await;
            if entries.get(&key).is_some_and(|(g, _)| *g == generation) {
                entries.remove(&key);
            }
        }
        result
    }

    /// Forget every key.
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    /// Number of keys currently in flight or stored.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}
