#![no_main]

use libfuzzer_sys::fuzz_target;
use pixlz::{decompress, verify_round_trip, Token};

fuzz_target!(|data: &[u8]| {
    // Arbitrary token triples with unbounded lengths; malformed ones must be
    // rejected, never panic or abort on allocation
    let tokens: Vec<Token> = data
        .chunks_exact(10)
        .map(|c| {
            let mut length = [0u8; 8];
            length.copy_from_slice(&c[1..9]);
            Token {
                offset: usize::from(c[0] % 16),
                length: u64::from_le_bytes(length) as usize,
                next_symbol: (c[9] != 0xFF).then_some(c[9]),
            }
        })
        .collect();

    // Huge lengths that still fit in memory are valid output; keep the
    // unbounded replay to small ones and bound the rest by a target length
    if tokens.iter().all(|t| t.length <= 1 << 16) {
        let _ = decompress(&tokens);
    }
    let _ = verify_round_trip(&data[..data.len().min(64)], &tokens);
});
