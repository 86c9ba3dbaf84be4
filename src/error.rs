use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Configuration errors
    #[error("Invalid parameter: {name} must be at least 1, got {value}")]
    InvalidParameter { name: &'static str, value: usize },

    // Token replay errors
    #[error("Invalid token at index {index}: {reason}")]
    InvalidToken { index: usize, reason: &'static str },

    #[error("Token {index}: back-reference offset {offset} exceeds available output {available}")]
    InvalidBackReference { index: usize, offset: usize, available: usize },

    #[error("Token {index}: length {length} cannot be allocated")]
    OutputTooLarge { index: usize, length: usize },

    // Verification errors
    #[error("Round-trip mismatch at symbol {position}")]
    RoundTripMismatch { position: usize },

    #[error("Size mismatch: expected {expected} symbols, got {found}")]
    SizeMismatch { expected: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
