use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Anything that can be compared and indexed as a stream symbol.
///
/// Pixel channel values (`u8`) are the common case, but the compressor only
/// needs equality, copying and hashing (for the hash-chain matcher).
pub trait Symbol: Copy + Eq + Hash + Debug {}

impl<T: Copy + Eq + Hash + Debug> Symbol for T {}

/// Matches of this length or shorter are emitted as literals instead.
pub const MAX_REJECTED_MATCH: usize = 3;

/// Shortest match that is encoded as a back-reference.
pub const MIN_MATCH: usize = MAX_REJECTED_MATCH + 1;

/// Represents a single `(offset, length, next symbol)` token
///
/// A literal has `offset == 0 && length == 0` and carries the symbol in
/// `next_symbol`. A match copies `length` symbols from `offset` back and then
/// appends `next_symbol`, which is `None` only when the match ran to the end
/// of the stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token<S = u8> {
    pub offset: usize,
    pub length: usize,
    pub next_symbol: Option<S>,
}

impl<S: Symbol> Token<S> {
    pub fn literal(symbol: S) -> Self {
        Self { offset: 0, length: 0, next_symbol: Some(symbol) }
    }

    pub fn copy(offset: usize, length: usize, next_symbol: Option<S>) -> Self {
        Self { offset, length, next_symbol }
    }

    #[inline]
    pub fn is_literal(&self) -> bool {
        self.length == 0
    }

    /// Number of source symbols this token reconstructs
    pub fn covered_len(&self) -> usize {
        self.length.saturating_add(usize::from(self.next_symbol.is_some()))
    }
}

/// A candidate back-reference found by a matcher
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    /// Backward distance from the cursor to the start of the run
    pub distance: usize,
    pub length: usize,
}
