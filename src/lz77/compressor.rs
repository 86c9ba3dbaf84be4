use super::matcher::{BruteForceMatcher, HashChainMatcher, MatchFinder};
use super::progress::{CancelToken, NoProgress, Progress, ProgressObserver};
use super::tokens::{Symbol, Token};
use crate::error::Result;
use crate::{CompressConfig, CompressionStats, MatchStrategy};
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, info, trace, warn};

/// Result of an observed compression run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompressOutcome<S> {
    pub tokens: Vec<Token<S>>,
    /// Final cursor: number of input symbols the tokens reconstruct
    pub consumed: usize,
    /// Run stopped early through a [`CancelToken`]
    pub cancelled: bool,
    /// Observer calls that returned an error or panicked
    pub observer_failures: u64,
}

impl<S: Symbol> CompressOutcome<S> {
    /// Size statistics over the symbols actually consumed
    pub fn stats(&self) -> CompressionStats {
        CompressionStats::from_tokens(self.consumed, &self.tokens)
    }
}

/// Greedy sliding-window LZ77 compressor
#[derive(Clone, Debug)]
pub struct Compressor {
    config: CompressConfig,
}

impl Compressor {
    /// Create a compressor, rejecting a zero window or buffer size
    pub fn new(config: CompressConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CompressConfig {
        &self.config
    }

    /// Compress `symbols` to completion without observation
    pub fn compress<S: Symbol>(&self, symbols: &[S]) -> Vec<Token<S>> {
        self.compress_observed(symbols, &mut NoProgress, None).tokens
    }

    /// Compress `symbols`, reporting to `observer` after every token and
    /// stopping early once `cancel` is set.
    pub fn compress_observed<S, O>(
        &self,
        symbols: &[S],
        observer: &mut O,
        cancel: Option<&CancelToken>,
    ) -> CompressOutcome<S>
    where
        S: Symbol,
        O: ProgressObserver<S> + ?Sized,
    {
        let CompressConfig { window_size, buffer_size, strategy } = self.config;
        match strategy {
            MatchStrategy::BruteForce => {
                let matcher = BruteForceMatcher::new(window_size, buffer_size);
                self.run(symbols, matcher, observer, cancel)
            }
            MatchStrategy::HashChain => {
                let matcher = HashChainMatcher::new(window_size, buffer_size);
                self.run(symbols, matcher, observer, cancel)
            }
        }
    }

    fn run<S, M, O>(
        &self,
        symbols: &[S],
        mut matcher: M,
        observer: &mut O,
        cancel: Option<&CancelToken>,
    ) -> CompressOutcome<S>
    where
        S: Symbol,
        M: MatchFinder<S>,
        O: ProgressObserver<S> + ?Sized,
    {
        let total = symbols.len();
        debug!(
            symbols = total,
            window_size = self.config.window_size,
            buffer_size = self.config.buffer_size,
            strategy = ?self.config.strategy,
            "starting compression"
        );

        let mut tokens: Vec<Token<S>> = Vec::new();
        let mut cursor = 0;
        let mut cancelled = false;
        let mut observer_failures = 0u64;

        while cursor < total {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                info!(cursor, tokens = tokens.len(), "compression cancelled");
                cancelled = true;
                break;
            }

            let token = match matcher.longest_match(symbols, cursor) {
                Some(m) => {
                    let next_symbol = symbols.get(cursor + m.length).copied();
                    // The trailing symbol is absent when the match ends the stream
                    cursor = (cursor + m.length + 1).min(total);
                    Token::copy(m.distance, m.length, next_symbol)
                }
                None => {
                    let token = Token::literal(symbols[cursor]);
                    cursor += 1;
                    token
                }
            };
            trace!(cursor, ?token, "emitted token");
            tokens.push(token);

            let progress = Progress { reconstructed: &symbols[..cursor], tokens: &tokens, total };
            match panic::catch_unwind(AssertUnwindSafe(|| observer.on_progress(&progress))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    observer_failures += 1;
                    warn!(cursor, error = %e, "progress observer failed");
                }
                Err(_) => {
                    observer_failures += 1;
                    warn!(cursor, "progress observer panicked");
                }
            }
        }

        debug!(consumed = cursor, tokens = tokens.len(), cancelled, "compression finished");
        CompressOutcome { tokens, consumed: cursor, cancelled, observer_failures }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lz77::decoder::decompress;
    use crate::lz77::progress::observer_fn;

    fn compressor(window_size: usize, buffer_size: usize) -> Compressor {
        Compressor::new(CompressConfig { window_size, buffer_size, ..Default::default() }).unwrap()
    }

    #[test]
    fn test_empty_input() {
        let mut calls = 0;
        let mut observer = observer_fn(|_: &Progress<'_, u8>| {
            calls += 1;
            Ok(())
        });
        let symbols: [u8; 0] = [];
        let outcome = compressor(255, 255).compress_observed(&symbols, &mut observer, None);
        assert!(outcome.tokens.is_empty());
        assert_eq!(outcome.consumed, 0);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_config_is_kept() {
        let config =
            CompressConfig { window_size: 12, buffer_size: 7, strategy: MatchStrategy::HashChain };
        let compressor = Compressor::new(config.clone()).unwrap();
        assert_eq!(compressor.config(), &config);
    }

    #[test]
    fn test_single_symbol() {
        let tokens = compressor(255, 255).compress(&[42u8]);
        assert_eq!(tokens, vec![Token::literal(42)]);
    }

    #[test]
    fn test_run_of_fives() {
        let symbols = [5u8, 5, 5, 5, 5, 5, 1, 2];
        let tokens = compressor(255, 255).compress(&symbols);

        // Literal 5, then an overlapping match of the remaining five 5s ending in 1
        assert_eq!(tokens, vec![Token::literal(5), Token::copy(1, 5, Some(1)), Token::literal(2)]);
        assert_eq!(decompress(&tokens).unwrap(), symbols);
    }

    #[test]
    fn test_short_repeats_stay_literal() {
        let symbols = b"abcabcab";
        let tokens = compressor(255, 255).compress(&symbols[..]);
        // Longest repeat at cursor 3 is "abcab" (length 5), so only the first three are literals
        assert_eq!(tokens[..3], [Token::literal(b'a'), Token::literal(b'b'), Token::literal(b'c')]);
        assert_eq!(tokens[3], Token::copy(3, 5, None));
        assert!(tokens.iter().all(|t| t.length == 0 || t.length > 3));
    }

    #[test]
    fn test_three_symbol_match_is_literal() {
        let symbols = b"abcXabcY";
        let tokens = compressor(255, 255).compress(&symbols[..]);
        assert!(tokens.iter().all(Token::is_literal));
        assert_eq!(tokens.len(), symbols.len());
    }

    #[test]
    fn test_zero_next_symbol_is_kept() {
        let symbols = [7u8, 7, 7, 7, 7, 0];
        let tokens = compressor(255, 255).compress(&symbols);
        assert_eq!(tokens, vec![Token::literal(7), Token::copy(1, 4, Some(0))]);
    }

    #[test]
    fn test_match_to_end_has_no_next_symbol() {
        let symbols = [3u8; 6];
        let outcome = compressor(255, 255).compress_observed(&symbols, &mut NoProgress, None);
        assert_eq!(outcome.tokens, vec![Token::literal(3), Token::copy(1, 5, None)]);
        assert_eq!(outcome.consumed, symbols.len());
    }

    #[test]
    fn test_observer_sees_growing_prefix() {
        let symbols: Vec<u8> = b"the cat sat on the mat, the cat sat on the hat".to_vec();
        let mut lengths = Vec::new();
        let mut prefixes_match = true;
        let mut observer = observer_fn(|p: &Progress<'_, u8>| {
            prefixes_match &= p.reconstructed == &symbols[..p.reconstructed.len()];
            prefixes_match &= p.total == symbols.len();
            lengths.push((p.reconstructed.len(), p.tokens.len()));
            Ok(())
        });
        let outcome = compressor(255, 255).compress_observed(&symbols, &mut observer, None);

        assert!(prefixes_match);
        assert_eq!(outcome.observer_failures, 0);
        assert_eq!(lengths.len(), outcome.tokens.len());
        assert!(lengths.windows(2).all(|w| w[0].0 < w[1].0));
        assert!(lengths.iter().enumerate().all(|(i, &(_, n))| n == i + 1));
        assert_eq!(lengths.last().map(|l| l.0), Some(symbols.len()));
    }

    #[test]
    fn test_failing_observer_does_not_change_output() {
        let symbols: Vec<u8> = (0..500u32).map(|i| (i % 17) as u8).collect();
        let expected = compressor(64, 32).compress(&symbols);

        let mut observer = observer_fn(|_: &Progress<'_, u8>| Err("display gone".into()));
        let outcome = compressor(64, 32).compress_observed(&symbols, &mut observer, None);
        assert_eq!(outcome.tokens, expected);
        assert_eq!(outcome.observer_failures, expected.len() as u64);
        assert!(!outcome.cancelled);
    }

    #[test]
    fn test_panicking_observer_is_isolated() {
        let symbols = b"panic at the disco, panic at the disco";
        let expected = compressor(255, 255).compress(&symbols[..]);

        let mut calls = 0;
        let mut observer = observer_fn(|_: &Progress<'_, u8>| {
            calls += 1;
            if calls == 2 {
                panic!("renderer crashed");
            }
            Ok(())
        });
        let outcome = compressor(255, 255).compress_observed(&symbols[..], &mut observer, None);
        assert_eq!(outcome.tokens, expected);
        assert_eq!(outcome.observer_failures, 1);
    }

    #[test]
    fn test_cancel_returns_partial_prefix() {
        let symbols: Vec<u8> = (0..200u32).map(|i| (i * 31 % 251) as u8).collect();
        let cancel = CancelToken::new();
        let handle = cancel.clone();
        let mut observer = observer_fn(|p: &Progress<'_, u8>| {
            if p.tokens.len() == 10 {
                handle.cancel();
            }
            Ok(())
        });
        let outcome =
            compressor(255, 255).compress_observed(&symbols, &mut observer, Some(&cancel));

        assert!(outcome.cancelled);
        assert_eq!(outcome.tokens.len(), 10);
        assert_eq!(decompress(&outcome.tokens).unwrap(), symbols[..outcome.consumed]);
    }

    #[test]
    fn test_cancel_before_start() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let outcome =
            compressor(255, 255).compress_observed(&[1u8, 2, 3], &mut NoProgress, Some(&cancel));
        assert!(outcome.cancelled);
        assert!(outcome.tokens.is_empty());
        assert_eq!(outcome.consumed, 0);
    }

    #[test]
    fn test_hash_chain_matches_brute_force() {
        let symbols: Vec<u16> = (0..2000u32).map(|i| ((i / 3) % 40 + (i % 7) * 100) as u16).collect();
        for (window, buffer) in [(1, 1), (4, 4), (16, 8), (255, 255), (1000, 3)] {
            let brute = compressor(window, buffer).compress(&symbols);
            let chain = Compressor::new(CompressConfig {
                window_size: window,
                buffer_size: buffer,
                strategy: MatchStrategy::HashChain,
            })
            .unwrap()
            .compress(&symbols);
            assert_eq!(brute, chain, "window {} buffer {}", window, buffer);
        }
    }
}
