use super::tokens::{Match, Symbol, MIN_MATCH};
use std::collections::HashMap;

/// Minimum number of positions indexed between sweeps of stale chain heads
const PRUNE_INTERVAL: usize = 4096;

/// Longest-match search over the already-seen part of a symbol stream.
///
/// Implementations must agree exactly: the longest run wins, and among runs
/// of equal length the nearest candidate (smallest distance) wins. Only runs
/// of at least [`MIN_MATCH`] symbols are reported.
pub trait MatchFinder<S> {
    /// Best match starting at `cursor`, searching candidates in
    /// `[cursor - window_size, cursor)`.
    fn longest_match(&mut self, symbols: &[S], cursor: usize) -> Option<Match>;
}

/// Length of the run shared by `symbols[candidate..]` and `symbols[cursor..]`,
/// capped at `max_len`. The run may extend past `cursor` (overlapping match).
#[inline]
fn run_length<S: Symbol>(symbols: &[S], candidate: usize, cursor: usize, max_len: usize) -> usize {
    let mut length = 0;
    while length < max_len && symbols[candidate + length] == symbols[cursor + length] {
        length += 1;
    }
    length
}

/// Exhaustive scan of every window position.
///
/// O(window * buffer) per cursor position.
#[derive(Clone, Debug)]
pub struct BruteForceMatcher {
    window_size: usize,
    buffer_size: usize,
}

impl BruteForceMatcher {
    pub fn new(window_size: usize, buffer_size: usize) -> Self {
        Self { window_size, buffer_size }
    }
}

impl<S: Symbol> MatchFinder<S> for BruteForceMatcher {
    fn longest_match(&mut self, symbols: &[S], cursor: usize) -> Option<Match> {
        let max_len = self.buffer_size.min(symbols.len() - cursor);
        if max_len < MIN_MATCH {
            return None;
        }

        let search_start = cursor.saturating_sub(self.window_size);
        let mut best = Match { distance: 0, length: 0 };

        // Nearest first, so only a strictly longer run replaces the best
        for candidate in (search_start..cursor).rev() {
            let length = run_length(symbols, candidate, cursor, max_len);
            if length > best.length {
                best = Match { distance: cursor - candidate, length };
                if length == max_len {
                    break;
                }
            }
        }

        (best.length >= MIN_MATCH).then_some(best)
    }
}

/// Hash-chain index keyed on the first [`MIN_MATCH`] symbols of each position.
///
/// Produces the same matches as [`BruteForceMatcher`]: any run of at least
/// `MIN_MATCH` symbols shares its key with the cursor, the chain is walked
/// nearest-first, and there is no chain-depth limit.
///
/// Keys whose newest position has left the window are swept periodically, so
/// the key map stays proportional to the window rather than the input.
#[derive(Clone, Debug)]
pub struct HashChainMatcher<S> {
    window_size: usize,
    buffer_size: usize,
    /// Most recent position for each key
    head: HashMap<[S; MIN_MATCH], usize>,
    /// Previous position with the same key, per position
    prev: Vec<Option<usize>>,
    /// Positions below this have been indexed
    indexed: usize,
    /// Value of `indexed` at the last sweep of `head`
    pruned_at: usize,
}

impl<S: Symbol> HashChainMatcher<S> {
    pub fn new(window_size: usize, buffer_size: usize) -> Self {
        Self {
            window_size,
            buffer_size,
            head: HashMap::new(),
            prev: Vec::new(),
            indexed: 0,
            pruned_at: 0,
        }
    }

    #[inline]
    fn key(symbols: &[S], pos: usize) -> Option<[S; MIN_MATCH]> {
        symbols.get(pos..pos + MIN_MATCH).map(|s| [s[0], s[1], s[2], s[3]])
    }

    /// Index every position before `cursor`
    fn index_up_to(&mut self, symbols: &[S], cursor: usize) {
        while self.indexed < cursor {
            let pos = self.indexed;
            let prev = match Self::key(symbols, pos) {
                Some(key) => self.head.insert(key, pos),
                None => None,
            };
            self.prev.push(prev);
            self.indexed += 1;
        }

        if self.indexed - self.pruned_at >= self.window_size.max(PRUNE_INTERVAL) {
            // The window start only moves forward, so a head below it never
            // becomes reachable again
            let floor = cursor.saturating_sub(self.window_size);
            self.head.retain(|_, pos| *pos >= floor);
            self.pruned_at = self.indexed;
        }
    }
}

impl<S: Symbol> MatchFinder<S> for HashChainMatcher<S> {
    fn longest_match(&mut self, symbols: &[S], cursor: usize) -> Option<Match> {
        self.index_up_to(symbols, cursor);

        let max_len = self.buffer_size.min(symbols.len() - cursor);
        if max_len < MIN_MATCH {
            return None;
        }
        let key = Self::key(symbols, cursor)?;
        let search_start = cursor.saturating_sub(self.window_size);

        let mut best = Match { distance: 0, length: 0 };
        let mut next = self.head.get(&key).copied();
        while let Some(candidate) = next {
            if candidate < search_start {
                break;
            }
            let length = run_length(symbols, candidate, cursor, max_len);
            if length > best.length {
                best = Match { distance: cursor - candidate, length };
                if length == max_len {
                    break;
                }
            }
            next = self.prev[candidate];
        }

        (best.length >= MIN_MATCH).then_some(best)
    }
}
