use crate::cache::RecordCache;
use crate::storage::QueryExecutor;

/// One logical execution context: the backing store plus the per-table
/// record cache, threaded by mutable reference through every lifecycle
/// call. There is no global state; two sessions never share cache entries.
///
/// The session is deliberately single-threaded. Callers that need to cross
/// threads wrap the whole session in their own synchronization.
pub struct Session<S: QueryExecutor> {
    store: S,
    cache: RecordCache,
}

impl<S: QueryExecutor> Session<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            cache: RecordCache::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn cache(&self) -> &RecordCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut RecordCache {
        &mut self.cache
    }

    /// Tear down the session, keeping the store
    pub fn into_store(self) -> S {
        self.store
    }
}
