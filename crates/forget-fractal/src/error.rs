//! Error type for the Forget Fractal core.
//!
//! Only boundary operations return errors (parsing patterns, building
//! permutations from explicit slots, exporting the journal). Contract
//! violations inside the core panic instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FractalError {
    #[error("pattern must hold exactly {expected} symbols, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("symbol {symbol} at position {position} is outside [0, {limit})")]
    InvalidSymbol { position: usize, symbol: u8, limit: u8 },

    #[error("invalid color permutation: {0}")]
    InvalidPermutation(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
