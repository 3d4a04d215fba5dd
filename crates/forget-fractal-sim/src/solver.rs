//! Auto-solver: reads the stages like a player would and answers with one
//! of several strategies.
//!
//! | Strategy        | Answer                                              | Expected verdict      |
//! |-----------------|-----------------------------------------------------|-----------------------|
//! | `optimal`       | nearest valid fractal                               | `Accept`              |
//! | `overspend`     | farthest valid fractal                              | `OverBudget`          |
//! | `copy-original` | nearest valid fractal plus one cell rewritten as is | `RevealedOriginal`    |
//! | `invalid`       | nearest valid fractal with one edit spoiled         | `InvalidPattern(1)`   |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use forget_fractal::{codec, FractalError, Pattern, PuzzleSession, Stage, PATTERN_LEN, SYMBOL_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    Optimal,
    Overspend,
    CopyOriginal,
    Invalid,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [Self::Optimal, Self::Overspend, Self::CopyOriginal, Self::Invalid];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Optimal => "optimal",
            Self::Overspend => "overspend",
            Self::CopyOriginal => "copy-original",
            Self::Invalid => "invalid",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Strategy {
    type Err = FractalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.label() == s.to_lowercase())
            .ok_or_else(|| {
                FractalError::Config(format!(
                    "unknown strategy '{s}' (use optimal, overspend, copy-original, invalid)"
                ))
            })
    }
}

/// Rebuild the target from the stages: the last sighting of each cell is
/// the true one.
pub fn transcribe(stages: &[Stage]) -> Pattern {
    let mut target = Pattern::filled(0);
    for stage in stages {
        for cell in &stage.cells {
            target.set(cell.position, cell.symbol);
        }
    }
    target
}

/// Logical symbol to write into each cell that should change.
pub fn answer(strategy: Strategy, target: &Pattern) -> Vec<(usize, u8)> {
    let nearest = codec::nearest_valid(target);
    let edits = |goal: &Pattern| -> Vec<(usize, u8)> {
        target.diff(goal).into_iter().map(|p| (p, goal[p])).collect()
    };

    match strategy {
        Strategy::Optimal => edits(&nearest),
        Strategy::Overspend => {
            let farthest = codec::all_valid()
                .max_by_key(|v| target.diff(v).len())
                .unwrap_or(nearest);
            edits(&farthest)
        }
        Strategy::CopyOriginal => {
            let mut out = edits(&nearest);
            let untouched = (0..PATTERN_LEN).find(|p| !out.iter().any(|&(q, _)| q == *p));
            match untouched {
                Some(p) => out.push((p, target[p])),
                None => out[0].1 = target[out[0].0],
            }
            out
        }
        Strategy::Invalid => {
            let mut out = edits(&nearest);
            if let Some(edit) = out.first_mut() {
                let (p, fixed) = *edit;
                // Neither the original nor the repaired symbol.
                edit.1 = (0..SYMBOL_COUNT)
                    .find(|&s| s != target[p] && s != fixed)
                    .unwrap_or(fixed);
            }
            out
        }
    }
}

/// Press cells until the session's submission holds `edits`.
///
/// Returns the number of presses made.
pub fn enter(session: &mut PuzzleSession, edits: &[(usize, u8)]) -> usize {
    let decoder = session.decoder();
    let mut presses = 0;
    for &(position, symbol) in edits {
        let cycle = decoder.encode(symbol);
        let current = session.submission().get(position);
        // Presses from the current cycle state to the wanted one.
        let needed = match current {
            None => usize::from(cycle) + 1,
            Some(c) => (usize::from(cycle) + 7 - usize::from(c)) % 7,
        };
        for _ in 0..needed {
            session.press_cell(position);
        }
        presses += needed;
    }
    presses
}
