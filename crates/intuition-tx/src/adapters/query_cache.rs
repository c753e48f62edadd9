//! In-Memory Query Cache Adapter
//!
//! Implements `QueryCache` with prefix invalidation.

use crate::domain::QueryKey;
use crate::ports::outbound::QueryCache;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// Process-local cache of read-query results.
///
/// One instance is created per session and handed to every coordinator.
#[derive(Default)]
pub struct InMemoryQueryCache {
    entries: RwLock<HashMap<QueryKey, serde_json::Value>>,
    invalidations: RwLock<Vec<QueryKey>>,
}

impl InMemoryQueryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Every key passed to `invalidate`, in call order.
    pub fn invalidation_log(&self) -> Vec<QueryKey> {
        self.invalidations.read().clone()
    }
}

impl QueryCache for InMemoryQueryCache {
    fn invalidate(&self, key: &QueryKey) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|cached, _| !key.is_prefix_of(cached));
        let dropped = before - entries.len();
        drop(entries);

        self.invalidations.write().push(key.clone());
        debug!(key = %key, dropped, "Invalidated cached queries");
        dropped
    }

    fn get(&self, key: &QueryKey) -> Option<serde_json::Value> {
        self.entries.read().get(key).cloned()
    }

    fn put(&self, key: QueryKey, value: serde_json::Value) {
        self.entries.write().insert(key, value);
    }
}
