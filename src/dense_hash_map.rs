//! DenseHashMap: public map over the two-array table, with a debug reentry check.

use crate::cursor::Cursor;
use crate::entry::{EntryMut, EntryRef};
use crate::error::{Error, Result};
use crate::iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
use crate::reentrancy::ReentryCheck;
use crate::table::Table;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::sync::atomic::{AtomicU64, Ordering};
use hashbrown::hash_map::DefaultHashBuilder;

/// Hash map storing its entries in one dense array, indexed by a
/// separate-chaining bucket array of positions.
///
/// Keys are unique; iteration walks the entries in storage order. Lookups
/// hand out borrows tied to the map, or [`Cursor`]s that are checked against
/// the issuing map and its generation on every dereference.
///
/// The map may be sent to another thread but not shared between threads:
///
/// ```compile_fail
/// fn shared<T: Sync>() {}
/// shared::<dense_hashmap::DenseHashMap<u32, u32>>();
/// ```
pub struct DenseHashMap<K, V, S = DefaultHashBuilder> {
    hasher: S,
    table: Table<K, V>,
    // Process-unique; stamped into every cursor this map issues.
    id: u64,
    reentry: ReentryCheck,
}

static NEXT_MAP_ID: AtomicU64 = AtomicU64::new(1);

#[inline]
fn next_map_id() -> u64 {
    NEXT_MAP_ID.fetch_add(1, Ordering::Relaxed)
}

#[inline]
fn make_hash<S, Q>(hasher: &S, q: &Q) -> u64
where
    S: BuildHasher,
    Q: ?Sized + Hash,
{
    hasher.hash_one(q)
}

impl<K, V> DenseHashMap<K, V> {
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    /// Empty map whose value store can take `capacity` entries without
    /// reallocating. The bucket count still starts at one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<K, V> Default for DenseHashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

// Operations that never hash: size, cursors, iteration, clearing.
impl<K, V, S> DenseHashMap<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            table: Table::new(),
            id: next_map_id(),
            reentry: ReentryCheck::new(),
        }
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            hasher,
            table: Table::with_capacity(capacity),
            id: next_map_id(),
            reentry: ReentryCheck::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// The hash builder this map was constructed with.
    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Number of buckets in the index. Always a power of two, never shrinks
    /// except through `clear`.
    pub fn bucket_count(&self) -> usize {
        self.table.bucket_count()
    }

    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.bucket_count() as f64
    }

    /// Entries the value store holds before it must reallocate.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional);
    }

    #[cfg(test)]
    pub(crate) fn generation(&self) -> u64 {
        self.table.generation()
    }

    /// Cursor at the first entry in iteration order.
    pub fn begin(&self) -> Cursor {
        Cursor::new(self.id, 0, self.table.generation())
    }

    /// Cursor one past the last entry.
    pub fn end(&self) -> Cursor {
        Cursor::new(self.id, self.table.len(), self.table.generation())
    }

    fn check_cursor(&self, cursor: Cursor) -> Result<usize> {
        if cursor.owner() != self.id {
            return Err(Error::ForeignCursor);
        }
        let current = self.table.generation();
        if cursor.generation() != current {
            return Err(Error::StaleCursor {
                issued: cursor.generation(),
                current,
            });
        }
        let len = self.table.len();
        if cursor.position() >= len {
            return Err(Error::OutOfRange {
                position: cursor.position(),
                len,
            });
        }
        Ok(cursor.position())
    }

    pub fn entry_at(&self, cursor: Cursor) -> Result<EntryRef<'_, K, V>> {
        let pos = self.check_cursor(cursor)?;
        let len = self.table.len();
        self.table
            .get(pos)
            .map(|s| EntryRef::new(&s.key, &s.value))
            .ok_or(Error::OutOfRange { position: pos, len })
    }

    pub fn entry_at_mut(&mut self, cursor: Cursor) -> Result<EntryMut<'_, K, V>> {
        let pos = self.check_cursor(cursor)?;
        let len = self.table.len();
        self.table
            .get_mut(pos)
            .map(|s| EntryMut::new(&s.key, &mut s.value))
            .ok_or(Error::OutOfRange { position: pos, len })
    }

    /// Entries in value-store order: insertion order, except that each erase
    /// moves the then-last entry into the erased slot.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.table.slots())
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(self.table.slots_mut())
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.table.slots())
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.table.slots())
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut::new(self.table.slots_mut())
    }

    /// Remove every entry, release both arrays' storage and return to a
    /// single bucket.
    pub fn clear(&mut self) {
        let detached = {
            let _scope = self.reentry.enter();
            self.table.reset()
        };
        // Key and value destructors run after the table is consistent again.
        drop(detached);
    }

    #[cfg(any(test, feature = "bench_internal"))]
    pub fn chain_stats(&self) -> crate::bucket_index::ChainStats {
        self.table.chain_stats()
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        self.table.assert_consistent();
    }
}

impl<K, V, S> DenseHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn locate<Q>(&self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = make_hash(&self.hasher, q);
        self.table.locate(hash, |k| k.borrow() == q)
    }

    /// Cursor to `q`'s entry, or `None` when the key is absent.
    pub fn find<Q>(&self, q: &Q) -> Option<Cursor>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _scope = self.reentry.enter();
        self.locate(q)
            .map(|pos| Cursor::new(self.id, pos, self.table.generation()))
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _scope = self.reentry.enter();
        self.locate(q).is_some()
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _scope = self.reentry.enter();
        let pos = self.locate(q)?;
        self.table.get(pos).map(|s| &s.value)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _scope = self.reentry.enter();
        let pos = self.locate(q)?;
        self.table.get(pos).map(|s| (&s.key, &s.value))
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _scope = self.reentry.enter();
        let hash = make_hash(&self.hasher, q);
        let pos = self.table.locate(hash, |k| k.borrow() == q)?;
        self.table.get_mut(pos).map(|s| &mut s.value)
    }

    /// Strict read: the value for `q`, or `Error::KeyNotFound`.
    pub fn at<Q>(&self, q: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).ok_or(Error::KeyNotFound)
    }

    /// Insert `key -> value` unless `key` is already present. A duplicate
    /// leaves the stored value untouched and returns false.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.try_insert(key, value).is_ok()
    }

    /// Like `insert`, but hands back a cursor to the new entry, or
    /// `Error::DuplicateKey`.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<Cursor> {
        let _scope = self.reentry.enter();
        let hash = make_hash(&self.hasher, &key);
        if self.table.locate(hash, |k| *k == key).is_some() {
            return Err(Error::DuplicateKey);
        }
        let pos = self.table.push(key, value, hash);
        Ok(Cursor::new(self.id, pos, self.table.generation()))
    }

    /// Value for `key`, inserting `default()` first if the key is absent.
    /// `default` runs only on insertion.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let _scope = self.reentry.enter();
        let hash = make_hash(&self.hasher, &key);
        let pos = match self.table.locate(hash, |k| *k == key) {
            Some(pos) => pos,
            None => self.table.push(key, default(), hash),
        };
        &mut self.table.slots_mut()[pos].value
    }

    /// Value for `key`, inserting `V::default()` first if the key is absent.
    pub fn get_or_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    /// Remove `q`'s entry and hand back the owned pair.
    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _scope = self.reentry.enter();
        let hash = make_hash(&self.hasher, q);
        let pos = self.table.locate(hash, |k| k.borrow() == q)?;
        self.table.remove_at(pos).map(|s| (s.key, s.value))
    }

    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }

    /// Remove `q`'s entry if present; returns whether anything was removed.
    pub fn erase<Q>(&mut self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).is_some()
    }
}

impl<K, V, S> Clone for DenseHashMap<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            hasher: self.hasher.clone(),
            table: self.table.clone(),
            id: next_map_id(),
            reentry: ReentryCheck::new(),
        }
    }
}

impl<K, V, S> fmt::Debug for DenseHashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Equal when both hold the same keys with equal values; order is ignored.
impl<K, V, S> PartialEq for DenseHashMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).map_or(false, |ov| *v == *ov))
    }
}

impl<K, V, S> Eq for DenseHashMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

/// Builds a map from pairs; a later duplicate of an earlier key is ignored.
impl<K, V, S> FromIterator<(K, V)> for DenseHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_hasher(S::default());
        map.extend(iter);
        map
    }
}

/// Inserts each pair in turn; pairs whose key is already present are ignored.
impl<K, V, S> Extend<(K, V)> for DenseHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V, S> Extend<(&'a K, &'a V)> for DenseHashMap<K, V, S>
where
    K: Eq + Hash + Copy,
    V: Copy,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: I) {
        self.extend(iter.into_iter().map(|(&k, &v)| (k, v)));
    }
}

impl<'a, K, V, S> IntoIterator for &'a DenseHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut DenseHashMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, S> IntoIterator for DenseHashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.table.into_slots())
    }
}
