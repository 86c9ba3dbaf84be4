use super::tokens::{Symbol, Token};
use crate::error::{Error, Result};

/// Replay a token sequence back into the symbols it encodes.
///
/// Literals append their symbol. Matches copy `length` symbols starting
/// `offset` back in the output, one at a time so that a copy may overlap the
/// symbols it is producing (`offset < length`), then append the trailing
/// symbol if there is one.
pub fn decompress<S: Symbol>(tokens: &[Token<S>]) -> Result<Vec<S>> {
    replay(tokens, None)
}

/// Check that `tokens` replays to exactly `symbols`
///
/// Replay stops with [`Error::SizeMismatch`] as soon as the output would
/// outgrow `symbols`.
pub fn verify_round_trip<S: Symbol>(symbols: &[S], tokens: &[Token<S>]) -> Result<()> {
    let decoded = replay(tokens, Some(symbols.len()))?;

    if let Some(position) = symbols.iter().zip(&decoded).position(|(a, b)| a != b) {
        return Err(Error::RoundTripMismatch { position });
    }
    if decoded.len() != symbols.len() {
        return Err(Error::SizeMismatch { expected: symbols.len(), found: decoded.len() });
    }
    Ok(())
}

/// Token lengths are untrusted: output grows per token, never pre-sized from
/// the whole sequence, and each reservation is fallible.
fn replay<S: Symbol>(tokens: &[Token<S>], ceiling: Option<usize>) -> Result<Vec<S>> {
    let mut output: Vec<S> = Vec::new();

    for (index, token) in tokens.iter().enumerate() {
        if token.is_literal() {
            if token.offset != 0 {
                return Err(Error::InvalidToken { index, reason: "literal with non-zero offset" });
            }
            if token.next_symbol.is_none() {
                return Err(Error::InvalidToken { index, reason: "literal without a symbol" });
            }
        } else if token.offset == 0 || token.offset > output.len() {
            return Err(Error::InvalidBackReference {
                index,
                offset: token.offset,
                available: output.len(),
            });
        }

        let covered = token.covered_len();
        if let Some(limit) = ceiling {
            let found = output.len().saturating_add(covered);
            if found > limit {
                return Err(Error::SizeMismatch { expected: limit, found });
            }
        }
        output
            .try_reserve(covered)
            .map_err(|_| Error::OutputTooLarge { index, length: token.length })?;

        if !token.is_literal() {
            let start = output.len() - token.offset;
            for i in 0..token.length {
                let symbol = output[start + i];
                output.push(symbol);
            }
        }
        if let Some(symbol) = token.next_symbol {
            output.push(symbol);
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literals() {
        let tokens = vec![Token::literal(b'A'), Token::literal(b'B')];
        assert_eq!(decompress(&tokens).unwrap(), b"AB");
    }

    #[test]
    fn test_overlapping_copy() {
        // distance=1, length=5 -> "AAAAA" after the seed
        let tokens = vec![Token::literal(b'A'), Token::copy(1, 5, Some(b'B'))];
        assert_eq!(decompress(&tokens).unwrap(), b"AAAAAAB");
    }

    #[test]
    fn test_overlapping_pattern() {
        let tokens = vec![Token::literal(b'A'), Token::literal(b'B'), Token::copy(2, 6, None)];
        assert_eq!(decompress(&tokens).unwrap(), b"ABABABAB");
    }

    #[test]
    fn test_zero_symbol_after_match() {
        let tokens = vec![Token::literal(0u8), Token::copy(1, 4, Some(0))];
        assert_eq!(decompress(&tokens).unwrap(), vec![0u8; 6]);
    }

    #[test]
    fn test_back_reference_before_start() {
        let tokens = vec![Token::literal(1u8), Token::copy(2, 4, None)];
        assert!(matches!(
            decompress(&tokens),
            Err(Error::InvalidBackReference { index: 1, offset: 2, available: 1 })
        ));
    }

    #[test]
    fn test_zero_offset_match() {
        let tokens = vec![Token::literal(1u8), Token::copy(0, 4, None)];
        assert!(matches!(decompress(&tokens), Err(Error::InvalidBackReference { index: 1, .. })));
    }

    #[test]
    fn test_malformed_literals() {
        let empty: Vec<Token<u8>> = vec![Token { offset: 0, length: 0, next_symbol: None }];
        assert!(matches!(decompress(&empty), Err(Error::InvalidToken { index: 0, .. })));

        let offset: Vec<Token<u8>> = vec![Token { offset: 3, length: 0, next_symbol: Some(1) }];
        assert!(matches!(decompress(&offset), Err(Error::InvalidToken { index: 0, .. })));
    }

    #[test]
    fn test_huge_length_is_rejected() {
        let tokens = vec![Token::literal(1u8), Token::copy(1, usize::MAX, None)];
        assert!(matches!(
            decompress(&tokens),
            Err(Error::OutputTooLarge { index: 1, length: usize::MAX })
        ));

        let tokens = vec![Token::literal(1u8), Token::copy(1, usize::MAX, Some(2))];
        assert!(matches!(decompress(&tokens), Err(Error::OutputTooLarge { index: 1, .. })));
    }

    #[test]
    fn test_verify_stops_at_input_length() {
        let tokens = vec![Token::literal(1u8), Token::copy(1, usize::MAX / 4, None)];
        assert!(matches!(
            verify_round_trip(&[1u8; 5], &tokens),
            Err(Error::SizeMismatch { expected: 5, found }) if found == 1 + usize::MAX / 4
        ));

        let tokens = vec![Token::literal(1u8), Token::copy(1, usize::MAX, Some(1))];
        assert!(matches!(
            verify_round_trip(&[1u8; 5], &tokens),
            Err(Error::SizeMismatch { expected: 5, found: usize::MAX })
        ));
    }

    #[test]
    fn test_verify_round_trip() {
        let tokens = vec![Token::literal(b'x'), Token::copy(1, 4, Some(b'y'))];
        assert!(verify_round_trip(b"xxxxxy", &tokens).is_ok());
        assert!(matches!(
            verify_round_trip(b"xxxxzy", &tokens),
            Err(Error::RoundTripMismatch { position: 4 })
        ));
        assert!(matches!(
            verify_round_trip(b"xxxxxyz", &tokens),
            Err(Error::SizeMismatch { expected: 7, found: 6 })
        ));
    }
}
