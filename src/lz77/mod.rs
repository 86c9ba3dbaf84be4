pub mod compressor;
pub mod decoder;
pub mod matcher;
pub mod progress;
pub mod tokens;

pub use compressor::{CompressOutcome, Compressor};
pub use decoder::{decompress, verify_round_trip};
pub use matcher::{BruteForceMatcher, HashChainMatcher, MatchFinder};
pub use progress::{observer_fn, CancelToken, NoProgress, ObserverResult, Progress, ProgressObserver};
pub use tokens::{Match, Symbol, Token, MIN_MATCH};
