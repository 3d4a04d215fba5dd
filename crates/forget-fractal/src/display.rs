//! Display projections: the text screen and the cell colors.
//!
//! These are pure functions of session data, recomputed on every
//! transition. Rendering them is the host's business.

use serde::{Deserialize, Serialize};

use crate::palette::{ColorPermutation, PaletteColor};
use crate::pattern::PATTERN_LEN;

/// Text shown before activation.
pub const IDLE_TEXT: &str = "FRACTAL";
/// Text shown once solved.
pub const SOLVED_TEXT: &str = "SOLVED";

/// Color of the screen text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextTone {
    White,
    Green,
    Cyan,
    Blue,
    Red,
    Magenta,
}

/// Screen contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenText {
    pub text: String,
    pub tone: TextTone,
}

impl ScreenText {
    pub fn new(text: impl Into<String>, tone: TextTone) -> Self {
        Self { text: text.into(), tone }
    }
}

/// Color of every cell; `None` is a black (blank) cell.
pub type CellColors = [Option<PaletteColor>; PATTERN_LEN];

/// `"{stage}/{count}"` with the stage right-aligned to the width of `count`.
///
/// `stage` is 0-based.
pub fn stage_text(stage: usize, count: usize) -> String {
    let width = count.to_string().len();
    format!("{:>width$}/{count}", stage + 1)
}

/// `"{edits}/??"` while the budget is hidden, `"{edits}/{budget}"` after.
pub fn edit_counter_text(edits: usize, budget: Option<usize>) -> String {
    match budget {
        Some(b) => format!("{edits:>2}/{b:<2}"),
        None => format!("{edits:>2}/??"),
    }
}

/// Map a logical grid to palette colors.
pub fn colorize(grid: &[Option<u8>; PATTERN_LEN], palette: &ColorPermutation) -> CellColors {
    grid.map(|s| s.map(|s| palette.color(s)))
}
