#![no_main]

use libfuzzer_sys::fuzz_target;
use pixlz::{verify_round_trip, CompressConfig, Compressor, MatchStrategy};

fuzz_target!(|data: &[u8]| {
    // First two bytes pick the window and buffer sizes
    if data.len() < 2 {
        return;
    }
    let window_size = usize::from(data[0]).max(1);
    let buffer_size = usize::from(data[1]).max(1);
    let symbols = &data[2..];

    let brute = Compressor::new(CompressConfig { window_size, buffer_size, ..Default::default() })
        .unwrap()
        .compress(symbols);
    verify_round_trip(symbols, &brute).unwrap();

    let chain = Compressor::new(CompressConfig {
        window_size,
        buffer_size,
        strategy: MatchStrategy::HashChain,
    })
    .unwrap()
    .compress(symbols);
    assert_eq!(brute, chain);
});
