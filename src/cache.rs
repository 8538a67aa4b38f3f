//! Keyed, fill-once result cache.
//!
//! Entries are written the first time a key is fetched and then kept for the
//! lifetime of the cache. Failed fetches leave no entry behind.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use tracing::debug;

/// Cache owned by a dashboard session.
#[derive(Debug)]
pub struct ResultCache<K, V> {
    entries: HashMap<K, Arc<V>>,
}

impl<K, V> Default for ResultCache<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K, V> ResultCache<K, V>
where
    K: Eq + Hash + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key`, running `fetch` only on a miss.
    pub async fn get_or_fetch<F, Fut, E>(&mut self, key: K, fetch: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.entries.get(&key) {
            debug!("Cache hit for {:?}", key);
            return Ok(Arc::clone(value));
        }

        debug!("Cache miss for {:?}", key);
        let value = Arc::new(fetch().await?);
        self.entries.insert(key, Arc::clone(&value));
        Ok(value)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)] // Pairs with len()
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
