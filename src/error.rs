//! Recoverable failures reported by [`Tree`][crate::Tree] operations.
//!
//! Broken structural invariants are not represented here. Those are bugs in
//! the tree itself and panic instead.

use thiserror::Error;

/// Errors returned by the fallible [`Tree`][crate::Tree] operations. None of
/// them change the set of stored keys.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// `insert` was called with a key that is already stored.
    #[error("key is already present in the tree")]
    DuplicateKey,
    /// The key (or cursor) passed to `erase`, `rank` or `rank_of` does not name
    /// a stored key.
    #[error("key is not present in the tree")]
    KeyNotFound,
    /// `try_select` was asked for a rank outside of `1..=len`.
    #[error("rank {rank} is out of range for a tree of {len} keys")]
    OutOfRange {
        /// The requested 1-based rank.
        rank: usize,
        /// The number of keys in the tree at the time of the call.
        len: usize,
    },
}
