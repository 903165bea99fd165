/*!
 * Per-key serialization of remote work.
 *
 * Capability fetches are serialized per direction and glossary provisioning
 * per language pair, so concurrent callers waiting on the same remote
 * resource share one in-flight call instead of issuing duplicates.
 */

use parking_lot::Mutex;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// A set of async mutexes addressed by key
#[derive(Debug)]
pub struct KeyedLocks<K> {
    locks: Mutex<HashMap<K, Arc<AsyncMutex<()>>>>,
}

impl<K> KeyedLocks<K>
where
    K: Eq + Hash + Clone,
{
    /// Create an empty lock set
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Wait for exclusive access to `key`
    ///
    /// The guard releases the key when dropped. Keys are never evicted;
    /// the key space (directions, language pairs) is small and bounded.
    pub async fn lock(&self, key: &K) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock();
            locks
                .entry(key.clone())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };

        lock.lock_owned().await
    }

    /// Number of keys seen so far
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    /// Whether no key has been locked yet
    pub fn is_empty(&self) -> bool {
        self.locks.lock().is_empty()
    }
}

impl<K> Default for KeyedLocks<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
