//! Borrowed views of one stored entry.
//!
//! Keys are only ever handed out behind `&K`; a view never allows rewriting a
//! key in place, since that would strand the entry in the wrong bucket.

use core::fmt;

/// Read-only view of a stored `(key, value)` pair.
pub struct EntryRef<'a, K, V> {
    key: &'a K,
    value: &'a V,
}

impl<'a, K, V> EntryRef<'a, K, V> {
    pub(crate) fn new(key: &'a K, value: &'a V) -> Self {
        Self { key, value }
    }

    pub fn key(&self) -> &'a K {
        self.key
    }

    pub fn value(&self) -> &'a V {
        self.value
    }

    pub fn into_pair(self) -> (&'a K, &'a V) {
        (self.key, self.value)
    }
}

impl<K, V> Clone for EntryRef<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for EntryRef<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for EntryRef<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryRef")
            .field("key", self.key)
            .field("value", self.value)
            .finish()
    }
}

/// View of a stored pair with a read-only key and a mutable value.
pub struct EntryMut<'a, K, V> {
    key: &'a K,
    value: &'a mut V,
}

impl<'a, K, V> EntryMut<'a, K, V> {
    pub(crate) fn new(key: &'a K, value: &'a mut V) -> Self {
        Self { key, value }
    }

    pub fn key(&self) -> &K {
        self.key
    }

    pub fn value(&self) -> &V {
        self.value
    }

    pub fn value_mut(&mut self) -> &mut V {
        self.value
    }

    /// Give up the view and keep the mutable value borrow for `'a`.
    pub fn into_value_mut(self) -> &'a mut V {
        self.value
    }

    /// Replace the stored value, returning the old one.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(self.value, value)
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for EntryMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryMut")
            .field("key", self.key)
            .field("value", &*self.value)
            .finish()
    }
}
