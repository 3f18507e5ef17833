use moka::future::Cache;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;

use crate::models::{MatchRequest, MatchResult, SessionKey};

/// Outcome of a cached batch lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedBatch {
    pub results: Vec<MatchResult>,
    /// True when the results came from an earlier computation
    pub cached: bool,
}

/// Per-session store of scored batches
///
/// The first batch computed for a session is kept verbatim for the lifetime
/// of the process: later requests with the same key get the same scores even
/// if the underlying reference data changed. There is no eviction and no TTL.
#[derive(Clone)]
pub struct ResultCache {
    batches: Cache<SessionKey, Arc<Vec<MatchResult>>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self {
            batches: Cache::builder().name("match-results").build(),
        }
    }

    /// Return the stored batch for `key`, or compute, store and return it
    ///
    /// `compute` runs at most once per call and receives an owned copy of the
    /// whole batch so the snapshot is stored as a unit.
    pub async fn get_or_compute<F, Fut>(
        &self,
        key: &SessionKey,
        items: &[MatchRequest],
        compute: F,
    ) -> CachedBatch
    where
        F: FnOnce(Vec<MatchRequest>) -> Fut,
        Fut: Future<Output = Vec<MatchResult>>,
    {
        let entry = self
            .batches
            .entry_by_ref(key)
            .or_insert_with(async { Arc::new(compute(items.to_vec()).await) })
            .await;

        let cached = !entry.is_fresh();
        if cached {
            tracing::debug!("Result cache hit: {}", key);
        } else {
            tracing::trace!("Result cache miss, stored {} scores: {}", items.len(), key);
        }

        CachedBatch {
            results: Vec::clone(&entry.into_value()),
            cached,
        }
    }

    /// Peek at a stored batch without computing
    pub async fn get(&self, key: &SessionKey) -> Option<Vec<MatchResult>> {
        self.batches.get(key).await.map(|batch| Vec::clone(&batch))
    }

    /// Number of sessions with a stored batch
    pub async fn len(&self) -> u64 {
        self.batches.run_pending_tasks().await;
        self.batches.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            sessions: self.batches.entry_count(),
            weighted_size: self.batches.weighted_size(),
        }
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub sessions: u64,
    pub weighted_size: u64,
}
