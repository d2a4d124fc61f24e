//! Cursor: a generation-tagged position into a DenseHashMap.
//!
//! Positions are only meaningful until the next mutation: an insert may grow
//! and rechain the map, an erase moves the last entry into the erased slot.
//! Every such mutation bumps the map's generation, and a cursor remembers the
//! generation it was issued at, so dereferencing an outdated cursor reports
//! `Error::StaleCursor` instead of silently reading a different entry.
//!
//! A cursor also records the id of the map that issued it; handing it to any
//! other map, including a clone of the issuer, reports `Error::ForeignCursor`.

use crate::dense_hash_map::DenseHashMap;
use crate::entry::{EntryMut, EntryRef};
use crate::error::Result;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Cursor {
    owner: u64,
    position: usize,
    generation: u64,
}

impl Cursor {
    pub(crate) fn new(owner: u64, position: usize, generation: u64) -> Self {
        Cursor {
            owner,
            position,
            generation,
        }
    }

    #[inline]
    pub(crate) fn owner(&self) -> u64 {
        self.owner
    }

    #[inline]
    pub(crate) fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// Step to the next position. Stepping does not validate; only
    /// dereference does.
    #[inline]
    pub fn advance(&mut self) {
        self.position = self.position.saturating_add(1);
    }

    #[inline]
    pub fn successor(self) -> Cursor {
        Cursor {
            position: self.position.saturating_add(1),
            ..self
        }
    }

    /// Step back one position, stopping at 0. Like `advance`, this does not
    /// validate.
    #[inline]
    pub fn retreat(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    #[inline]
    pub fn predecessor(self) -> Cursor {
        Cursor {
            position: self.position.saturating_sub(1),
            ..self
        }
    }

    pub fn entry<'a, K, V, S>(&self, map: &'a DenseHashMap<K, V, S>) -> Result<EntryRef<'a, K, V>> {
        map.entry_at(*self)
    }

    pub fn key<'a, K, V, S>(&self, map: &'a DenseHashMap<K, V, S>) -> Result<&'a K> {
        map.entry_at(*self).map(|e| e.key())
    }

    pub fn value<'a, K, V, S>(&self, map: &'a DenseHashMap<K, V, S>) -> Result<&'a V> {
        map.entry_at(*self).map(|e| e.value())
    }

    pub fn value_mut<'a, K, V, S>(&self, map: &'a mut DenseHashMap<K, V, S>) -> Result<&'a mut V> {
        map.entry_at_mut(*self).map(EntryMut::into_value_mut)
    }
}
