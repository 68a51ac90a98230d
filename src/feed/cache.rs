//! Time-bounded snapshot of the last page-0 load.

use super::join::TradeBook;
use crate::state::FeedState;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// What a successful page-0 load produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub state: FeedState,
    pub book: TradeBook,
}

/// Holds at most one [`Snapshot`] for `ttl`.
///
/// Owned by whoever builds the loader, so several loaders (or a remounted
/// one) can share it.
#[derive(Debug)]
pub struct SnapshotCache {
    ttl: Duration,
    entry: Mutex<Option<(Instant, Snapshot)>>,
}

impl SnapshotCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The stored snapshot, if it is younger than the TTL.
    pub fn get(&self) -> Option<Snapshot> {
        let mut entry = self.entry.lock().unwrap_or_else(|e| e.into_inner());
        match entry.as_ref() {
            Some((stored_at, snapshot)) if stored_at.elapsed() < self.ttl => Some(snapshot.clone()),
            Some(_) => {
                *entry = None;
                None
            }
            None => None,
        }
    }

    pub fn put(&self, snapshot: Snapshot) {
        let mut entry = self.entry.lock().unwrap_or_else(|e| e.into_inner());
        *entry = Some((Instant::now(), snapshot));
    }

    pub fn invalidate(&self) {
        let mut entry = self.entry.lock().unwrap_or_else(|e| e.into_inner());
        *entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FeedPhase;

    fn snapshot() -> Snapshot {
        Snapshot {
            state: FeedState {
                phase: FeedPhase::Ready,
                has_more: true,
                ..Default::default()
            },
            book: TradeBook::default(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_expires_after_ttl() {
        let cache = SnapshotCache::new(Duration::from_secs(300));
        assert!(cache.get().is_none());

        cache.put(snapshot());
        tokio::time::advance(Duration::from_secs(299)).await;
        assert!(cache.get().is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_invalidate() {
        let cache = SnapshotCache::new(Duration::from_secs(300));
        cache.put(snapshot());
        cache.invalidate();
        assert!(cache.get().is_none());
    }
}
