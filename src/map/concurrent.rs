//! Concurrent Map Implementation
//!
//! A `HashMap` guarded by a single reader/writer lock. Lookups, iteration and size
//! queries share the lock; inserts and removals take it exclusively.
//!
//! ## Design
//!
//! - One `RwLock` per map; no striping
//! - Readers never block each other, writers are serialized
//! - `for_each` holds the read lock for the whole walk, so the callback sees a
//!   consistent snapshot but must not re-enter the map
//! - Values are returned by clone; `get_with` reads in place for values that are
//!   not `Clone`
//!
//! ## Ordering
//!
//! Writes to the same key are applied in lock-acquisition order; the last writer
//! wins. Writes to different keys carry no ordering guarantee relative to each other.
//!
//! ## Example
//!
//! ```rust
//! use safesync::map::ConcurrentMap;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let map = Arc::new(ConcurrentMap::new());
//!
//! let writer = thread::spawn({
//!     let map = Arc::clone(&map);
//!     move || {
//!         for i in 0..1000 {
//!             map.set(i, i * 2);
//!         }
//!     }
//! });
//! writer.join().unwrap();
//!
//! let mut sum = 0;
//! map.for_each(|_, value| sum += *value);
//! assert_eq!(sum, 999_000); // Sum of 0, 2, 4, ..., 1998
//! ```

use crate::metrics::{AtomicMetrics, MetricsCollector, PerformanceMetrics};
use crate::sync::RwLock;
use core::borrow::Borrow;
use core::fmt;
use core::hash::Hash;
use std::collections::HashMap;

/// A hash map safe for concurrent multi-reader / single-writer access
///
/// # Type Parameters
///
/// * `K` - The key type, must implement `Hash + Eq`
/// * `V` - The value type, unconstrained; `Clone` is needed only by [`get`](Self::get)
///
/// # Examples
///
/// ```rust
/// use safesync::map::ConcurrentMap;
///
/// let map: ConcurrentMap<i32, String> = ConcurrentMap::new();
/// map.set(1, "hello".to_string());
/// assert_eq!(map.get(&1), Some("hello".to_string()));
/// assert_eq!(map.get(&2), None);
/// ```
pub struct ConcurrentMap<K, V> {
    inner: RwLock<HashMap<K, V>>,
    metrics: AtomicMetrics,
}

impl<K, V> ConcurrentMap<K, V>
where
    K: Hash + Eq,
{
    /// Create an empty map
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty map with room for at least `capacity` entries
    ///
    /// # Examples
    ///
    /// ```rust
    /// use safesync::map::ConcurrentMap;
    ///
    /// let map: ConcurrentMap<u64, u64> = ConcurrentMap::with_capacity(1024);
    /// assert!(map.is_empty());
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_map(HashMap::with_capacity(capacity))
    }

    fn from_map(map: HashMap<K, V>) -> Self {
        Self {
            inner: RwLock::new(map),
            metrics: AtomicMetrics::default(),
        }
    }

    /// Number of entries currently stored
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Check if the map holds no entries
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Insert or overwrite the value for `key`
    ///
    /// Always succeeds. The previous value, if any, is dropped after the write lock
    /// is released.
    pub fn set(&self, key: K, value: V) {
        let start = self.metrics.start();
        let previous = self.inner.write().insert(key, value);
        drop(previous);
        self.metrics.record_success(start);
    }

    /// Get a clone of the value stored for `key`
    ///
    /// Returns `None` if the key is absent; use `unwrap_or_default()` for the
    /// zero-value convention.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use safesync::map::ConcurrentMap;
    ///
    /// let map = ConcurrentMap::new();
    /// map.set("hits", 0u32);
    /// assert_eq!(map.get("hits"), Some(0));
    /// assert_eq!(map.get("misses").unwrap_or_default(), 0);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.get_with(key, V::clone)
    }

    /// Run `f` on the value stored for `key` while holding the read lock
    ///
    /// `f` must not call back into this map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use safesync::map::ConcurrentMap;
    ///
    /// let map = ConcurrentMap::new();
    /// map.set(1, vec![1, 2, 3]);
    /// assert_eq!(map.get_with(&1, |v| v.len()), Some(3));
    /// ```
    pub fn get_with<Q, R, F>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        F: FnOnce(&V) -> R,
    {
        let start = self.metrics.start();
        let result = self.inner.read().get(key).map(f);
        if result.is_some() {
            self.metrics.record_success(start);
        } else {
            self.metrics.record_failure(start);
        }
        result
    }

    /// Check if `key` is present
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.read().contains_key(key)
    }

    /// Remove the entry for `key`; a no-op if it is absent
    pub fn delete<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let start = self.metrics.start();
        let removed = self.inner.write().remove(key);
        drop(removed);
        self.metrics.record_success(start);
    }

    /// Remove every entry
    ///
    /// Counts as one successful operation, like [`delete`](Self::delete).
    pub fn clear(&self) {
        let start = self.metrics.start();
        let drained = core::mem::take(&mut *self.inner.write());
        drop(drained);
        self.metrics.record_success(start);
    }

    /// Call `f` once for every entry, in unspecified order
    ///
    /// The read lock is held for the whole iteration: writers wait until it ends,
    /// and `f` must not call back into this map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use safesync::map::ConcurrentMap;
    ///
    /// let map = ConcurrentMap::new();
    /// map.set(1, "one");
    /// map.set(2, "two");
    /// map.set(3, "three");
    ///
    /// let mut sum = 0;
    /// map.for_each(|key, _| sum += key);
    /// assert_eq!(sum, 6);
    /// ```
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V),
    {
        let guard = self.inner.read();
        for (key, value) in guard.iter() {
            f(key, value);
        }
    }
}

impl<K, V> Default for ConcurrentMap<K, V>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Clone for ConcurrentMap<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Snapshot copy taken under the read lock; metrics start fresh
    fn clone(&self) -> Self {
        let snapshot = self.inner.read().clone();
        Self::from_map(snapshot)
    }
}

impl<K, V> FromIterator<(K, V)> for ConcurrentMap<K, V>
where
    K: Hash + Eq,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_map(iter.into_iter().collect())
    }
}

impl<K, V> fmt::Debug for ConcurrentMap<K, V>
where
    K: Hash + Eq,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrentMap")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl<K, V> MetricsCollector for ConcurrentMap<K, V> {
    fn metrics(&self) -> PerformanceMetrics {
        self.metrics.snapshot()
    }

    fn reset_metrics(&self) {
        self.metrics.reset();
    }

    fn set_metrics_enabled(&self, enabled: bool) {
        self.metrics.set_enabled(enabled);
    }

    fn is_metrics_enabled(&self) -> bool {
        self.metrics.is_enabled()
    }
}
