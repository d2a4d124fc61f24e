//! Table: keeps the value store and the bucket index mutually consistent.
//!
//! Everything here works on positions and recorded hashes; hashing and key
//! comparison are supplied by the caller (DenseHashMap), so no method in
//! this module calls into `K: Hash`.
//!
//! Every method that can move an entry (push, with the growth it may
//! trigger; remove_at; reset) bumps `generation`.

use crate::bucket_index::BucketIndex;
use crate::value_store::{Slot, ValueStore};
use log::{debug, trace};

/// Bucket count multiplier applied on growth.
pub const GROWTH_FACTOR: usize = 2;
/// Grow once `len / bucket_count >= LOAD_FACTOR_NUMERATOR / LOAD_FACTOR_DENOMINATOR`.
pub const LOAD_FACTOR_NUMERATOR: usize = 2;
pub const LOAD_FACTOR_DENOMINATOR: usize = 3;

#[derive(Debug, Clone)]
pub(crate) struct Table<K, V> {
    store: ValueStore<K, V>,
    index: BucketIndex,
    generation: u64,
}

impl<K, V> Table<K, V> {
    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            store: ValueStore::with_capacity(capacity),
            index: BucketIndex::new(),
            generation: 0,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.store.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    #[inline]
    pub(crate) fn bucket_count(&self) -> usize {
        self.index.bucket_count()
    }

    #[inline]
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Reserves value store room only; the bucket count is driven solely by
    /// the load factor.
    pub(crate) fn reserve(&mut self, additional: usize) {
        self.store.reserve(additional);
    }

    #[inline]
    pub(crate) fn get(&self, pos: usize) -> Option<&Slot<K, V>> {
        self.store.get(pos)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, pos: usize) -> Option<&mut Slot<K, V>> {
        self.store.get_mut(pos)
    }

    pub(crate) fn slots(&self) -> &[Slot<K, V>] {
        self.store.slots()
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [Slot<K, V>] {
        self.store.slots_mut()
    }

    pub(crate) fn into_slots(self) -> Vec<Slot<K, V>> {
        self.store.into_slots()
    }

    /// First position in `hash`'s bucket whose slot has the same recorded
    /// hash and a key accepted by `eq`.
    pub(crate) fn locate<F>(&self, hash: u64, mut eq: F) -> Option<usize>
    where
        F: FnMut(&K) -> bool,
    {
        self.index.chain(hash).iter().copied().find(|&pos| {
            self.store
                .get(pos)
                .map(|s| s.hash == hash && eq(&s.key))
                .unwrap_or(false)
        })
    }

    /// Append a new entry (the caller has checked the key is absent), chain
    /// its position, then apply the growth policy. Returns the position.
    pub(crate) fn push(&mut self, key: K, value: V, hash: u64) -> usize {
        let pos = self.store.push(key, value, hash);
        self.index.insert(hash, pos);
        self.bump();
        self.grow_if_needed();
        pos
    }

    fn grow_if_needed(&mut self) {
        let buckets = self.index.bucket_count();
        if LOAD_FACTOR_DENOMINATOR * self.store.len() >= LOAD_FACTOR_NUMERATOR * buckets {
            let grown = buckets.saturating_mul(GROWTH_FACTOR);
            debug!(
                target: "dense_hashmap::resize",
                "growing bucket index {} -> {} at {} entries",
                buckets,
                grown,
                self.store.len()
            );
            self.index.rebuild(grown, self.store.hashes());
        }
    }

    /// Swap-with-last removal of the entry at `pos`, followed by index
    /// repair for the entry that moved into `pos`.
    pub(crate) fn remove_at(&mut self, pos: usize) -> Option<Slot<K, V>> {
        let last = self.store.len().checked_sub(1)?;
        let removed = self.store.swap_remove(pos)?;

        let unlinked = self.index.remove(removed.hash, pos);
        debug_assert!(unlinked, "erased position {pos} missing from its bucket");

        if pos != last {
            // The former last entry now lives at `pos`.
            if let Some(moved_hash) = self.store.hash_at(pos) {
                let repaired = self.index.repoint(moved_hash, last, pos);
                debug_assert!(repaired, "moved position {last} missing from its bucket");
                trace!(
                    target: "dense_hashmap::erase",
                    "repointed position {} -> {}",
                    last,
                    pos
                );
            }
        }
        self.bump();
        Some(removed)
    }

    /// Empty both arrays, back to one bucket. Returns the detached slots so
    /// the caller decides when their destructors run.
    pub(crate) fn reset(&mut self) -> Vec<Slot<K, V>> {
        let detached = self.store.take_all();
        self.index.reset();
        self.bump();
        trace!(
            target: "dense_hashmap::clear",
            "cleared {} entries",
            detached.len()
        );
        detached
    }

    #[inline]
    fn bump(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    #[cfg(any(test, feature = "bench_internal"))]
    pub(crate) fn chain_stats(&self) -> crate::bucket_index::ChainStats {
        self.index.stats()
    }

    /// Panics unless every position `0..len` is chained exactly once, in the
    /// bucket its recorded hash reduces to, and the load factor is below the
    /// growth threshold.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let len = self.store.len();
        let mut seen = vec![false; len];
        for (b, chain) in self.index.chains().enumerate() {
            for &pos in chain {
                assert!(pos < len, "stale position {pos} (len {len})");
                assert!(!seen[pos], "position {pos} chained twice");
                seen[pos] = true;
                let hash = self.store.hash_at(pos).unwrap_or_default();
                assert_eq!(
                    self.index.bucket_of(hash),
                    b,
                    "position {pos} chained in the wrong bucket"
                );
            }
        }
        assert!(seen.iter().all(|&s| s), "some position is not chained");
        assert!(self.index.bucket_count().is_power_of_two());
        assert!(
            LOAD_FACTOR_DENOMINATOR * len < LOAD_FACTOR_NUMERATOR * self.index.bucket_count(),
            "load factor at or above threshold after mutation"
        );
    }
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
