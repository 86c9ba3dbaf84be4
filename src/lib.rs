pub mod error;
pub mod lz77;

pub use error::{Error, Result};
pub use lz77::{
    decompress, observer_fn, verify_round_trip, CancelToken, CompressOutcome, Compressor,
    NoProgress, Progress, ProgressObserver, Symbol, Token,
};

/// How the compressor searches the window for the longest match
///
/// Both strategies emit identical token sequences; they differ only in speed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MatchStrategy {
    /// Compare against every window position (O(window * buffer) per symbol)
    #[default]
    BruteForce,
    /// Follow a hash chain of positions sharing the next four symbols
    HashChain,
}

/// Configuration for a compression run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompressConfig {
    /// How far back (in symbols) a match may start
    pub window_size: usize,
    /// Lookahead horizon: the longest match considered
    pub buffer_size: usize,
    pub strategy: MatchStrategy,
}

impl CompressConfig {
    pub fn validate(&self) -> Result<()> {
        if self.window_size < 1 {
            return Err(Error::InvalidParameter { name: "window_size", value: self.window_size });
        }
        if self.buffer_size < 1 {
            return Err(Error::InvalidParameter { name: "buffer_size", value: self.buffer_size });
        }
        Ok(())
    }
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self { window_size: 255, buffer_size: 255, strategy: MatchStrategy::BruteForce }
    }
}

/// Size report for a token sequence
///
/// Sizes follow the pixel-viewer convention: one byte per input symbol and
/// three bytes per token.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompressionStats {
    pub input_symbols: usize,
    pub tokens: usize,
    pub literal_tokens: usize,
    pub match_tokens: usize,
    /// Symbols reproduced by back-references (excluding trailing symbols)
    pub matched_symbols: usize,
}

impl CompressionStats {
    /// Bytes charged per emitted token
    pub const TOKEN_BYTES: usize = 3;

    pub fn from_tokens<S: Symbol>(input_symbols: usize, tokens: &[Token<S>]) -> Self {
        let mut stats = Self { input_symbols, tokens: tokens.len(), ..Default::default() };
        for token in tokens {
            if token.is_literal() {
                stats.literal_tokens += 1;
            } else {
                stats.match_tokens += 1;
                stats.matched_symbols = stats.matched_symbols.saturating_add(token.length);
            }
        }
        stats
    }

    pub fn original_size(&self) -> usize {
        self.input_symbols
    }

    pub fn compressed_size(&self) -> usize {
        self.tokens * Self::TOKEN_BYTES
    }

    /// Compressed size over original size (0.0 for empty input)
    pub fn ratio(&self) -> f64 {
        if self.input_symbols == 0 {
            0.0
        } else {
            self.compressed_size() as f64 / self.original_size() as f64
        }
    }
}

/// Compress `symbols` with the brute-force matcher.
///
/// Fails with [`Error::InvalidParameter`] if either size is zero.
pub fn compress<S: Symbol>(
    symbols: &[S],
    window_size: usize,
    buffer_size: usize,
) -> Result<Vec<Token<S>>> {
    let config = CompressConfig { window_size, buffer_size, ..Default::default() };
    Ok(Compressor::new(config)?.compress(symbols))
}
