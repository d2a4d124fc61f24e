//! Error types for DenseHashMap.

use thiserror::Error;

/// Result type alias for fallible DenseHashMap operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Failures reported by the strict accessors and by cursor dereference.
///
/// Everything else on the map (`insert`, `erase`, `find`, `len`, `clear`,
/// construction) is total.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The strict read accessor was asked for a key the map does not hold.
    #[error("key not found")]
    KeyNotFound,

    /// `try_insert` was given a key that is already present.
    #[error("key already present")]
    DuplicateKey,

    /// The cursor was issued before a mutation that may have moved entries.
    #[error("stale cursor: issued at generation {issued}, map is at generation {current}")]
    StaleCursor { issued: u64, current: u64 },

    /// The cursor was issued by a different map.
    #[error("cursor was issued by a different map")]
    ForeignCursor,

    /// The cursor is current but points at or past `end()`.
    #[error("cursor position {position} is out of range for a map of {len} entries")]
    OutOfRange { position: usize, len: usize },
}
