//! Time-bounded, per-actor snapshot cache.
//!
//! [`SnapshotCache`] keeps one entry per actor key. Each entry pairs a
//! write instant with an [`InventorySnapshot`] and is swapped in as a single
//! `Arc`, so a reader sees either the old pair or the new pair and never a
//! mixture of the two.
//!
//! # Freshness
//!
//! An entry is fresh while `now - written_at < expiry`. Expiry is checked on
//! read; nothing is evicted in the background.
//!
//! # Compute-once
//!
//! Hits load the entry through an [`ArcSwapOption`] without locking. Misses
//! take a per-actor capture lock and re-check freshness before capturing, so
//! callers racing on the same stale entry trigger exactly one capture and all
//! observe the same snapshot `Arc`.
//!
//! # Invalidation races
//!
//! [`SnapshotCache::invalidate`] clears the entry but does not wait for a
//! capture already in flight. That capture may still store its result after
//! the invalidation (last writer wins). Callers needing a post-invalidation
//! read call `invalidate` and then `get_or_capture`.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use stash::{CacheConfig, ItemRef, ManualClock, Occupant, SlotIndex, SnapshotCache};
//!
//! struct Gem;
//! impl Occupant for Gem {
//!     fn is_empty(&self) -> bool { false }
//! }
//!
//! let clock = Arc::new(ManualClock::new());
//! let cache: SnapshotCache<u64, Gem> =
//!     SnapshotCache::with_config(CacheConfig::default(), clock.clone()).unwrap();
//!
//! let first = cache.get_or_capture(&7, || vec![(SlotIndex::new(0), Some(ItemRef::new(Gem)))]);
//! let again = cache.get_or_capture(&7, || Vec::new());
//! assert!(Arc::ptr_eq(&first, &again));
//!
//! clock.advance(Duration::from_millis(500));
//! let expired = cache.get_or_capture(&7, || Vec::new());
//! assert!(expired.is_empty());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwapOption;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace};

use crate::clock::{Clock, SystemClock};
use crate::config::CacheConfig;
use crate::error::StashError;
use crate::item::{ItemRef, Occupant};
use crate::slot::SlotIndex;
use crate::snapshot::InventorySnapshot;
use crate::stats::{CacheStats, Counters};

/// A snapshot together with the instant it was stored.
struct Entry<T> {
    written_at: Instant,
    snapshot: Arc<InventorySnapshot<T>>,
}

/// Per-actor cell: the current entry plus the lock serialising captures.
struct ActorCell<T> {
    current: ArcSwapOption<Entry<T>>,
    capture: Mutex<()>,
}

impl<T> ActorCell<T> {
    fn new() -> Self {
        Self {
            current: ArcSwapOption::empty(),
            capture: Mutex::new(()),
        }
    }
}

/// Cache of inventory snapshots keyed by actor.
///
/// `K` is the actor key and `T` the item payload. The cache is `Sync` and is
/// meant to be shared by reference (or behind an `Arc`) across every caller
/// that queries the same actors.
pub struct SnapshotCache<K, T> {
    expiry: Duration,
    clock: Arc<dyn Clock>,
    table: RwLock<HashMap<K, Arc<ActorCell<T>>>>,
    counters: Counters,
}

impl<K, T> fmt::Debug for SnapshotCache<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotCache")
            .field("expiry", &self.expiry)
            .field("clock", &self.clock)
            .field("actors", &self.table.read().len())
            .field("stats", &self.counters.read())
            .finish()
    }
}

impl<K, T> Default for SnapshotCache<K, T>
where
    K: Eq + Hash + Clone + fmt::Debug,
    T: Occupant,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, T> SnapshotCache<K, T>
where
    K: Eq + Hash + Clone + fmt::Debug,
    T: Occupant,
{
    /// Creates a cache with the default 500 ms window and the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self {
            expiry: CacheConfig::default().expiry,
            clock: Arc::new(SystemClock),
            table: RwLock::new(HashMap::new()),
            counters: Counters::default(),
        }
    }

    /// Creates a cache from a config and a time source.
    ///
    /// # Errors
    ///
    /// Returns [`StashError::InvalidConfig`] if the config fails validation.
    pub fn with_config(config: CacheConfig, clock: Arc<dyn Clock>) -> Result<Self, StashError> {
        config.validate()?;
        Ok(Self {
            expiry: config.expiry,
            clock,
            table: RwLock::new(HashMap::new()),
            counters: Counters::default(),
        })
    }

    /// The freshness window.
    #[must_use]
    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    /// Returns the actor's snapshot, capturing it if absent or expired.
    ///
    /// `contents` reads the live inventory and is only called on a miss. It
    /// runs while the actor's capture lock is held, so it must not call back
    /// into this cache for the same key.
    pub fn get_or_capture<F, I>(&self, key: &K, contents: F) -> Arc<InventorySnapshot<T>>
    where
        F: FnOnce() -> I,
        I: IntoIterator<Item = (SlotIndex, Option<ItemRef<T>>)>,
    {
        let cell = self.cell(key);

        if let Some(snapshot) = self.fresh(&cell) {
            self.counters.hit();
            trace!(actor = ?key, "snapshot cache hit");
            return snapshot;
        }

        let _capturing = cell.capture.lock();

        // Another caller may have captured while we waited for the lock.
        if let Some(snapshot) = self.fresh(&cell) {
            self.counters.hit();
            trace!(actor = ?key, "snapshot captured by concurrent caller");
            return snapshot;
        }

        let written_at = self.clock.now();
        let snapshot = Arc::new(InventorySnapshot::capture(contents(), written_at));
        cell.current.store(Some(Arc::new(Entry {
            written_at,
            snapshot: Arc::clone(&snapshot),
        })));
        self.counters.capture();
        debug!(actor = ?key, slots = snapshot.len(), "captured inventory snapshot");

        snapshot
    }

    /// Returns the actor's snapshot only if a fresh one is cached.
    #[must_use]
    pub fn peek(&self, key: &K) -> Option<Arc<InventorySnapshot<T>>> {
        let cell = self.table.read().get(key).cloned()?;
        self.fresh(&cell)
    }

    /// Drops the actor's snapshot so the next read captures again.
    ///
    /// A capture already in flight for this actor may still store its
    /// result afterwards.
    pub fn invalidate(&self, key: &K) {
        let cell = self.table.read().get(key).cloned();
        if let Some(cell) = cell {
            if cell.current.swap(None).is_some() {
                self.counters.invalidation();
                debug!(actor = ?key, "invalidated inventory snapshot");
            }
        }
    }

    /// Forgets the actor entirely, releasing its table slot.
    ///
    /// Returns true if the actor had an entry.
    pub fn remove(&self, key: &K) -> bool {
        let removed = self.table.write().remove(key).is_some();
        if removed {
            debug!(actor = ?key, "removed actor from snapshot cache");
        }
        removed
    }

    /// Forgets every actor.
    pub fn clear(&self) {
        self.table.write().clear();
    }

    /// Number of actors with a table entry, fresh or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    /// Returns true if no actor has a table entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.read().is_empty()
    }

    /// Current counter values.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.counters.read()
    }

    fn cell(&self, key: &K) -> Arc<ActorCell<T>> {
        if let Some(cell) = self.table.read().get(key) {
            return Arc::clone(cell);
        }
        let mut table = self.table.write();
        Arc::clone(
            table
                .entry(key.clone())
                .or_insert_with(|| Arc::new(ActorCell::new())),
        )
    }

    fn fresh(&self, cell: &ActorCell<T>) -> Option<Arc<InventorySnapshot<T>>> {
        let entry = cell.current.load_full()?;
        let age = self.clock.now().saturating_duration_since(entry.written_at);
        (age < self.expiry).then(|| Arc::clone(&entry.snapshot))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::clock::ManualClock;

    #[derive(Debug)]
    struct Stack(&'static str);

    impl Occupant for Stack {
        fn is_empty(&self) -> bool {
            self.0.is_empty()
        }
    }

    fn cache_with_clock() -> (SnapshotCache<u64, Stack>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cache = SnapshotCache::with_config(CacheConfig::default(), clock.clone()).unwrap();
        (cache, clock)
    }

    fn name_at(snapshot: &InventorySnapshot<Stack>, slot: u32) -> &'static str {
        let item: &Stack = snapshot.get(SlotIndex::new(slot)).unwrap();
        item.0
    }

    fn one_item(name: &'static str) -> Vec<(SlotIndex, Option<ItemRef<Stack>>)> {
        vec![(SlotIndex::new(0), Some(ItemRef::new(Stack(name))))]
    }

    #[test]
    fn hit_within_window_returns_same_snapshot() {
        let (cache, clock) = cache_with_clock();
        let first = cache.get_or_capture(&1, || one_item("sword"));
        clock.advance(Duration::from_millis(499));
        let second = cache.get_or_capture(&1, || one_item("axe"));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(name_at(&second, 0), "sword");
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().captures, 1);
    }

    #[test]
    fn expiry_at_window_boundary() {
        let (cache, clock) = cache_with_clock();
        cache.get_or_capture(&1, || one_item("sword"));
        clock.advance(Duration::from_millis(500));
        let later = cache.get_or_capture(&1, || one_item("axe"));
        assert_eq!(name_at(&later, 0), "axe");
        assert_eq!(cache.stats().captures, 2);
    }

    #[test]
    fn invalidate_forces_capture() {
        let (cache, _clock) = cache_with_clock();
        cache.get_or_capture(&1, || one_item("sword"));
        cache.invalidate(&1);
        let after = cache.get_or_capture(&1, || one_item("axe"));
        assert_eq!(name_at(&after, 0), "axe");
        assert_eq!(cache.stats().invalidations, 1);
    }

    #[test]
    fn invalidate_unknown_actor_is_noop() {
        let (cache, _clock) = cache_with_clock();
        cache.invalidate(&99);
        assert_eq!(cache.stats().invalidations, 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn actors_are_independent() {
        let (cache, _clock) = cache_with_clock();
        cache.get_or_capture(&1, || one_item("sword"));
        cache.get_or_capture(&2, || one_item("bow"));
        cache.invalidate(&1);

        assert!(cache.peek(&1).is_none());
        assert_eq!(name_at(&cache.peek(&2).unwrap(), 0), "bow");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn peek_never_captures() {
        let (cache, clock) = cache_with_clock();
        assert!(cache.peek(&1).is_none());
        cache.get_or_capture(&1, || one_item("sword"));
        assert!(cache.peek(&1).is_some());
        clock.advance(Duration::from_secs(1));
        assert!(cache.peek(&1).is_none());
        assert_eq!(cache.stats().captures, 1);
    }

    #[test]
    fn remove_and_clear() {
        let (cache, _clock) = cache_with_clock();
        cache.get_or_capture(&1, || one_item("sword"));
        cache.get_or_capture(&2, || one_item("bow"));

        assert!(cache.remove(&1));
        assert!(!cache.remove(&1));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn concurrent_misses_capture_once() {
        let (cache, _clock) = cache_with_clock();
        let reads = AtomicUsize::new(0);
        let (cache, reads) = (&cache, &reads);

        let snapshots: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(move || {
                        cache.get_or_capture(&1, || {
                            reads.fetch_add(1, Ordering::SeqCst);
                            std::thread::sleep(Duration::from_millis(10));
                            one_item("sword")
                        })
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(reads.load(Ordering::SeqCst), 1);
        assert!(snapshots.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[test]
    fn zero_window_config_rejected() {
        let result: Result<SnapshotCache<u64, Stack>, _> = SnapshotCache::with_config(
            CacheConfig::with_expiry(Duration::ZERO),
            Arc::new(SystemClock),
        );
        assert!(result.is_err());
    }
}
