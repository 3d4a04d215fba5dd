//! Submission judging.
//!
//! A [`Submission`] records which cells the player touched and which cycle
//! index each one holds. [`judge`] turns it into a [`Verdict`]; precedence
//! is fixed:
//!
//! 1. empty submission → [`Verdict::NoOp`]
//! 2. any cell decodes to its original symbol → [`Verdict::RevealedOriginal`]
//! 3. composed grid is not a valid fractal → [`Verdict::InvalidPattern`]
//! 4. more edits than the budget → [`Verdict::OverBudget`]
//! 5. otherwise → [`Verdict::Accept`]

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::codec;
use crate::palette::ColorPermutation;
use crate::pattern::{Pattern, PATTERN_LEN, SYMBOL_COUNT};

// ─────────────────────────────────────────────
// Submission
// ─────────────────────────────────────────────

/// Player edits: `None` for an untouched cell, otherwise a cycle index `0..6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    cells: [Option<u8>; PATTERN_LEN],
}

impl Default for Submission {
    fn default() -> Self {
        Self { cells: [None; PATTERN_LEN] }
    }
}

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one cell through `unset → 0 → … → 5 → unset`.
    ///
    /// Returns the cell's new value.
    pub fn toggle(&mut self, position: usize) -> Option<u8> {
        let next = match self.cells[position] {
            None => Some(0),
            Some(c) if c + 1 < SYMBOL_COUNT => Some(c + 1),
            Some(_) => None,
        };
        self.cells[position] = next;
        next
    }

    pub fn get(&self, position: usize) -> Option<u8> {
        self.cells[position]
    }

    pub fn cells(&self) -> &[Option<u8>; PATTERN_LEN] {
        &self.cells
    }

    /// Number of touched cells.
    pub fn edit_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.edit_count() == 0
    }

    pub fn clear(&mut self) {
        self.cells = [None; PATTERN_LEN];
    }

    /// Logical symbol written to each cell, after decoding.
    pub fn decoded(&self, decoder: &ColorPermutation) -> [Option<u8>; PATTERN_LEN] {
        self.cells.map(|c| c.map(|c| decoder.decode(c)))
    }

    /// Target with every touched cell replaced by its decoded symbol.
    pub fn compose(&self, target: &Pattern, decoder: &ColorPermutation) -> Pattern {
        let mut out = *target;
        for (position, symbol) in self.decoded(decoder).into_iter().enumerate() {
            if let Some(symbol) = symbol {
                out.set(position, symbol);
            }
        }
        out
    }

    /// Touched positions whose decoded symbol equals the target's.
    pub fn original_positions(&self, target: &Pattern, decoder: &ColorPermutation) -> Vec<usize> {
        self.decoded(decoder)
            .into_iter()
            .enumerate()
            .filter(|&(position, symbol)| symbol == Some(target[position]))
            .map(|(position, _)| position)
            .collect()
    }
}

// ─────────────────────────────────────────────
// Verdict
// ─────────────────────────────────────────────

/// Outcome of one judged submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Nothing was edited; the submit press is ignored.
    NoOp,
    /// At least one cell was set back to its original symbol.
    RevealedOriginal,
    /// Composed grid is this many edits away from any valid fractal.
    InvalidPattern(usize),
    /// Valid, but more edits than the budget allows.
    OverBudget,
    /// Valid and within budget.
    Accept,
}

impl Verdict {
    /// Strikes to register for this verdict.
    ///
    /// `remaining` is how many strikes the bomb can still take before it
    /// detonates (maximum minus current). An invalid pattern never spends
    /// the last one.
    pub fn penalty(&self, remaining: i64) -> u32 {
        match *self {
            Self::NoOp | Self::Accept => 0,
            Self::RevealedOriginal | Self::OverBudget => 1,
            Self::InvalidPattern(n) => penalty_units(n, remaining),
        }
    }

    pub fn is_penalty(&self) -> bool {
        matches!(self, Self::RevealedOriginal | Self::InvalidPattern(_) | Self::OverBudget)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoOp => f.write_str("no edits"),
            Self::RevealedOriginal => f.write_str("a cell was changed back to its original color"),
            Self::InvalidPattern(n) => write!(f, "fractal is invalid ({n} edits from valid)"),
            Self::OverBudget => f.write_str("valid, but over the edit budget"),
            Self::Accept => f.write_str("accepted"),
        }
    }
}

/// `max(1, min(n, remaining - 1))`.
pub fn penalty_units(n: usize, remaining: i64) -> u32 {
    let n = i64::try_from(n).unwrap_or(i64::MAX);
    n.min(remaining - 1).max(1) as u32
}

/// Judge `submission` against `target`.
pub fn judge(
    target:      &Pattern,
    submission:  &Submission,
    decoder:     &ColorPermutation,
    edit_budget: usize,
) -> Verdict {
    if submission.is_empty() {
        return Verdict::NoOp;
    }
    if !submission.original_positions(target, decoder).is_empty() {
        return Verdict::RevealedOriginal;
    }
    let composed = submission.compose(target, decoder);
    let distance = codec::edit_distance(composed.as_slice());
    if distance > 0 {
        return Verdict::InvalidPattern(distance);
    }
    if submission.edit_count() > edit_budget {
        return Verdict::OverBudget;
    }
    Verdict::Accept
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
