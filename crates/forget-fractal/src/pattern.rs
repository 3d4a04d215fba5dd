//! The 32-cell [`Pattern`] grid and the constants that bound it.
//!
//! A pattern is an ordered sequence of [`PATTERN_LEN`] symbols, each in
//! `[0, SYMBOL_COUNT)`. Whether a pattern is a *valid fractal* is decided by
//! [`crate::codec`]; this module only guarantees well-formedness.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FractalError;

/// Number of cells in the puzzle grid.
pub const PATTERN_LEN: usize = 32;
/// Size of the symbol alphabet. Symbols are depths `0..SYMBOL_COUNT`.
pub const SYMBOL_COUNT: u8 = 6;
/// Deepest recursion level any codec routine accepts.
///
/// A 32-cell grid only ever reaches depth 5; the slack covers the
/// multi-cube cell visual, which nests up to ten levels.
pub const MAX_DEPTH: u8 = 10;

/// A well-formed 32-cell grid of symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pattern([u8; PATTERN_LEN]);

impl Pattern {
    /// A pattern with every cell set to `symbol`.
    pub fn filled(symbol: u8) -> Self {
        assert!(symbol < SYMBOL_COUNT, "symbol {symbol} out of range");
        Self([symbol; PATTERN_LEN])
    }

    /// Validate and copy a symbol slice.
    pub fn from_symbols(symbols: &[u8]) -> Result<Self, FractalError> {
        if symbols.len() != PATTERN_LEN {
            return Err(FractalError::InvalidLength {
                expected: PATTERN_LEN,
                actual:   symbols.len(),
            });
        }
        let mut cells = [0u8; PATTERN_LEN];
        for (position, (&symbol, cell)) in symbols.iter().zip(cells.iter_mut()).enumerate() {
            if symbol >= SYMBOL_COUNT {
                return Err(FractalError::InvalidSymbol { position, symbol, limit: SYMBOL_COUNT });
            }
            *cell = symbol;
        }
        Ok(Self(cells))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Overwrite one cell. Panics on an out-of-range position or symbol.
    pub fn set(&mut self, position: usize, symbol: u8) {
        assert!(symbol < SYMBOL_COUNT, "symbol {symbol} out of range");
        self.0[position] = symbol;
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }

    /// Positions at which `self` and `other` hold different symbols.
    pub fn diff(&self, other: &Pattern) -> Vec<usize> {
        (0..PATTERN_LEN).filter(|&i| self.0[i] != other.0[i]).collect()
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [u8; PATTERN_LEN] {
        &mut self.0
    }
}

impl AsRef<[u8]> for Pattern {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Index<usize> for Pattern {
    type Output = u8;

    fn index(&self, position: usize) -> &u8 {
        &self.0[position]
    }
}

impl IndexMut<usize> for Pattern {
    fn index_mut(&mut self, position: usize) -> &mut u8 {
        &mut self.0[position]
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in self.0 {
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}

impl FromStr for Pattern {
    type Err = FractalError;

    /// Parse 32 digits `0`–`5`. Whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut symbols = Vec::with_capacity(PATTERN_LEN);
        for (position, ch) in s.chars().filter(|c| !c.is_whitespace()).enumerate() {
            // Non-digits are reported as symbol 255.
            let symbol = ch.to_digit(10).map_or(u8::MAX, |d| d as u8);
            if symbol >= SYMBOL_COUNT {
                return Err(FractalError::InvalidSymbol { position, symbol, limit: SYMBOL_COUNT });
            }
            symbols.push(symbol);
        }
        Self::from_symbols(&symbols)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
