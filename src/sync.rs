//! Synchronization helpers shared by the resolver and the procedure cache.
//!
//! Both caches follow the same discipline: many concurrent readers, rare short
//! writers, and no expensive work while a lock is held. Reads use
//! `read_recursive` so a thread that already holds a read guard can take
//! another one even while a writer is queued.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::hash::{BuildHasherDefault, Hash};
use twox_hash::XxHash64;

/// Hasher used by every engine map.
pub(crate) type FastHash = BuildHasherDefault<XxHash64>;

/// A `HashMap` using [`FastHash`].
pub(crate) type FastMap<K, V> = HashMap<K, V, FastHash>;

/// A value behind a reader/writer lock, accessed through closures so guards
/// never escape.
#[derive(Debug, Default)]
pub(crate) struct Guarded<T> {
    inner: RwLock<T>,
}

impl<T> Guarded<T> {
    pub(crate) fn new(value: T) -> Self {
        Self {
            inner: RwLock::new(value),
        }
    }

    /// Runs `f` under a shared, re-entrant read lock.
    pub(crate) fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.inner.read_recursive();
        f(&guard)
    }

    /// Runs `f` under the exclusive write lock.
    pub(crate) fn write<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.inner.write();
        f(&mut guard)
    }
}

/// A compute-once map: lookups under the read lock, the value is produced with
/// no lock held, and the first writer wins.
#[derive(Debug)]
pub(crate) struct Memo<K, V> {
    map: Guarded<FastMap<K, V>>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            map: Guarded::new(FastMap::default()),
        }
    }
}

impl<K: Eq + Hash, V: Clone> Memo<K, V> {
    /// Returns the cached value for `key`, producing it with `make` on a miss.
    ///
    /// Concurrent misses may each run `make`; only the first result is kept
    /// and every caller receives it.
    pub(crate) fn get_or_insert_with(&self, key: K, make: impl FnOnce() -> V) -> V {
        if let Some(found) = self.map.read(|m| m.get(&key).cloned()) {
            return found;
        }
        let made = make();
        self.map.write(|m| m.entry(key).or_insert(made).clone())
    }

    pub(crate) fn len(&self) -> usize {
        self.map.read(HashMap::len)
    }

    pub(crate) fn clear(&self) {
        self.map.write(HashMap::clear);
    }
}
