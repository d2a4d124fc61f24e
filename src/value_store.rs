//! ValueStore: the dense, ordered array of entries.
//!
//! This is the only place entries live. Its length is the map's length and
//! its order is the iteration order. Entries are appended on insert and
//! removed only by swapping with the last slot and popping, so an erase moves
//! at most one other entry.

#[derive(Debug, Clone)]
pub(crate) struct Slot<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    // Full hash recorded at insertion; reducing it by the bucket count gives
    // the slot's bucket. Never recomputed.
    pub(crate) hash: u64,
}

#[derive(Debug, Clone)]
pub(crate) struct ValueStore<K, V> {
    slots: Vec<Slot<K, V>>,
}

impl<K, V> ValueStore<K, V> {
    pub(crate) const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.slots.reserve(additional);
    }

    /// Append a slot and return its position.
    pub(crate) fn push(&mut self, key: K, value: V, hash: u64) -> usize {
        let pos = self.slots.len();
        self.slots.push(Slot { key, value, hash });
        pos
    }

    #[inline]
    pub(crate) fn get(&self, pos: usize) -> Option<&Slot<K, V>> {
        self.slots.get(pos)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, pos: usize) -> Option<&mut Slot<K, V>> {
        self.slots.get_mut(pos)
    }

    #[inline]
    pub(crate) fn hash_at(&self, pos: usize) -> Option<u64> {
        self.slots.get(pos).map(|s| s.hash)
    }

    /// Remove the slot at `pos` by moving the last slot into its place.
    ///
    /// Afterwards the entry formerly at `len() - 1` (before the call) lives
    /// at `pos`, unless `pos` was the last position.
    pub(crate) fn swap_remove(&mut self, pos: usize) -> Option<Slot<K, V>> {
        if pos < self.slots.len() {
            Some(self.slots.swap_remove(pos))
        } else {
            None
        }
    }

    /// Detach all slots, leaving the store empty with no allocation.
    pub(crate) fn take_all(&mut self) -> Vec<Slot<K, V>> {
        core::mem::take(&mut self.slots)
    }

    pub(crate) fn hashes(&self) -> impl Iterator<Item = u64> + '_ {
        self.slots.iter().map(|s| s.hash)
    }

    pub(crate) fn slots(&self) -> &[Slot<K, V>] {
        &self.slots
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [Slot<K, V>] {
        &mut self.slots
    }

    pub(crate) fn into_slots(self) -> Vec<Slot<K, V>> {
        self.slots
    }
}

impl<K, V> Default for ValueStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(s: &ValueStore<&'static str, i32>) -> Vec<&'static str> {
        s.slots().iter().map(|s| s.key).collect()
    }

    #[test]
    fn push_returns_consecutive_positions() {
        let mut s = ValueStore::new();
        assert_eq!(s.push("a", 1, 10), 0);
        assert_eq!(s.push("b", 2, 20), 1);
        assert_eq!(s.push("c", 3, 30), 2);
        assert_eq!(s.len(), 3);
        assert_eq!(s.hash_at(1), Some(20));
        assert_eq!(s.hash_at(3), None);
    }

    /// Removing from the middle moves exactly the last entry into the hole.
    #[test]
    fn swap_remove_moves_last_into_hole() {
        let mut s = ValueStore::new();
        for (i, k) in ["a", "b", "c", "d"].into_iter().enumerate() {
            s.push(k, i as i32, i as u64);
        }
        let removed = s.swap_remove(1).unwrap();
        assert_eq!(removed.key, "b");
        assert_eq!(keys(&s), vec!["a", "d", "c"]);
        assert_eq!(s.get(1).map(|s| s.hash), Some(3));
    }

    #[test]
    fn swap_remove_last_only_shrinks() {
        let mut s = ValueStore::new();
        s.push("a", 1, 0);
        s.push("b", 2, 0);
        let removed = s.swap_remove(1).unwrap();
        assert_eq!(removed.value, 2);
        assert_eq!(keys(&s), vec!["a"]);
        assert!(s.swap_remove(5).is_none());
    }

    #[test]
    fn take_all_frees_storage() {
        let mut s = ValueStore::with_capacity(16);
        s.push("a", 1, 0);
        let detached = s.take_all();
        assert_eq!(detached.len(), 1);
        assert!(s.is_empty());
        assert_eq!(s.capacity(), 0);
    }
}
