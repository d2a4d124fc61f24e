//! dense-hashmap: a single-threaded, separate-chaining map whose entries
//! live in one dense array, so iteration is a plain linear walk.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a hash map built from two cooperating arrays instead of
//!   buckets of entries, so lookups are hashed but iteration never is.
//! - Layers:
//!   - ValueStore<K, V>: dense `Vec` of `(key, value, hash)` slots. Sole
//!     source of truth for length and iteration order.
//!   - BucketIndex: `Vec` of small inline arrays; bucket `b` holds the
//!     value-store positions whose hash reduces to `b`.
//!   - Table<K, V>: owns both arrays and the generation counter; implements
//!     append-and-chain, the growth policy, swap-with-last removal with
//!     index repair, and reset. Works on positions and recorded hashes only.
//!   - DenseHashMap<K, V, S>: public API. Hashes queries with `S`, compares
//!     keys with `Eq`, and hands out borrows, `Cursor`s and iterators.
//!
//! Constraints
//! - Single-threaded: `Send` (when `K`, `V`, `S` are) but never `Sync`.
//! - Unique keys; a duplicate insert is a no-op that reports `false`.
//! - Chains are contiguous small arrays, no per-node allocation.
//! - The bucket count starts at 1, doubles whenever
//!   `3 * len >= 2 * bucket_count` after an insertion, and only returns to 1
//!   through `clear`.
//!
//! Positions and invalidation
//! - A position is an index into the value store. It changes when an erase
//!   moves the last entry into the erased slot, and nothing outside `Table`
//!   ever sees a raw position.
//! - Borrows (`get`, `at`, `get_or_default`, iterators) are tied to the map
//!   borrow, so the compiler rejects holding one across a mutation.
//! - `Cursor`s are `Copy` and may outlive a mutation. Each carries the
//!   generation it was issued at; the map bumps its generation on every
//!   successful insert, erase and clear, and dereferencing a cursor from an
//!   older generation returns `Error::StaleCursor`. Cursors also carry the
//!   issuing map's process-unique id (a global atomic counter, fresh on
//!   `Clone`), and any other map rejects them with `Error::ForeignCursor`.
//!   Cursors step both ways: `advance`/`successor` and `retreat`/`predecessor`.
//!
//! Hasher and rehashing invariants
//! - Each slot stores the `u64` hash computed at insertion. Growth and
//!   erase repair use the stored hash, so `K: Hash` runs once per call and
//!   never during a rebuild. The hasher must be deterministic for equal keys;
//!   this is assumed, not checked.
//!
//! Reentrancy policy
//! - In debug builds every hashing entry point opens a `ReentryCheck`
//!   scope, and a key whose `Hash`/`Eq` reaches back into the same map
//!   panics instead of observing half-updated arrays. `clear` runs key and
//!   value destructors only after the scope has closed.
//!
//! Notes and non-goals
//! - No shrinking of the bucket index on erase.
//! - Keys are immutable post-insert; views expose `&K` only.
//! - `Extend`/`FromIterator` keep the first occurrence of a key, matching
//!   `insert`.

mod bucket_index;
mod cursor;
mod dense_hash_map;
#[cfg(test)]
mod dense_hash_map_proptest;
mod entry;
mod error;
pub mod iter;
mod reentrancy;
mod table;
mod value_store;

// Public surface
pub use bucket_index::INITIAL_BUCKET_COUNT;
#[cfg(feature = "bench_internal")]
pub use bucket_index::ChainStats;
pub use cursor::Cursor;
pub use dense_hash_map::DenseHashMap;
pub use entry::{EntryMut, EntryRef};
pub use error::{Error, Result};
pub use table::{GROWTH_FACTOR, LOAD_FACTOR_DENOMINATOR, LOAD_FACTOR_NUMERATOR};
