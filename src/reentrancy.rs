//! Reentry check for the hashing entry points of DenseHashMap.
//!
//! While a lookup or mutation is running, the map may call `Hash` (through
//! the hasher) and `Eq` (while scanning a chain) on user keys. If such a call
//! reaches back into the same map, it can see a value store that no longer
//! matches the bucket index. Debug builds keep a busy flag per map and panic
//! on the nested call. Release builds keep nothing.

use core::cell::Cell;
use core::marker::PhantomData;

#[derive(Debug)]
pub(crate) struct ReentryCheck {
    #[cfg(debug_assertions)]
    busy: Cell<bool>,
    // Send, but never Sync, in either build profile.
    _not_sync: PhantomData<Cell<()>>,
}

impl ReentryCheck {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            busy: Cell::new(false),
            _not_sync: PhantomData,
        }
    }

    /// Mark the map busy until the returned scope drops.
    #[inline]
    #[track_caller]
    pub(crate) fn enter(&self) -> ReentryScope<'_> {
        #[cfg(debug_assertions)]
        {
            if self.busy.replace(true) {
                panic!("reentrant call into DenseHashMap from key Hash/Eq");
            }
        }
        ReentryScope {
            #[cfg(debug_assertions)]
            busy: &self.busy,
            _check: PhantomData,
        }
    }
}

impl Default for ReentryCheck {
    fn default() -> Self {
        Self::new()
    }
}

// A cloned map is never busy.
impl Clone for ReentryCheck {
    fn clone(&self) -> Self {
        Self::new()
    }
}

pub(crate) struct ReentryScope<'a> {
    #[cfg(debug_assertions)]
    busy: &'a Cell<bool>,
    _check: PhantomData<&'a ReentryCheck>,
}

impl Drop for ReentryScope<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            self.busy.set(false);
        }
    }
}
