//! Fractal codec: generation, distortion and minimum-edit validation.
//!
//! ## The fractal family
//!
//! A span `[lo, hi)` at depth `d` is a valid fractal when either
//!
//! | Fill half      | Recursive half              |
//! |----------------|-----------------------------|
//! | `[lo, mid)` = d | `[mid, hi)` valid at `d + 1` |
//! | `[mid, hi)` = d | `[lo, mid)` valid at `d + 1` |
//!
//! with `mid = (lo + hi) / 2`. A single cell is valid when it equals its
//! depth. The full grid starts at depth 0, so a 32-cell grid bottoms out
//! at depth 5 and every symbol of the alphabet is reachable.
//!
//! ## Minimum edits
//!
//! [`min_edits_to_valid`] evaluates both structural choices at every level
//! and keeps the cheaper one: the fill half costs its mismatches against
//! `d`, the other half recurses. Each level does linear work in its span,
//! so a full evaluation is `O(n log n)`.
//!
//! All routines work on any power-of-two span; the puzzle only ever uses
//! [`PATTERN_LEN`].

use rand::Rng;

use crate::pattern::{Pattern, MAX_DEPTH, PATTERN_LEN, SYMBOL_COUNT};

// ─────────────────────────────────────────────
// Generation
// ─────────────────────────────────────────────

/// Build a random valid fractal over the full grid.
///
/// At every span wider than one cell a fair coin picks which half is filled
/// with the current depth; the other half recurses one level deeper.
pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Pattern {
    let mut pattern = Pattern::filled(0);
    build(pattern.cells_mut(), 0, PATTERN_LEN, 0, rng);
    pattern
}

/// Fill `cells[lo..hi]` with a valid fractal rooted at `depth`.
pub fn build<R: Rng + ?Sized>(cells: &mut [u8], lo: usize, hi: usize, depth: u8, rng: &mut R) {
    check_span(cells, lo, hi, depth);
    if hi - lo == 1 {
        cells[lo] = depth;
        return;
    }
    let mid = (lo + hi) / 2;
    if rng.gen_bool(0.5) {
        cells[lo..mid].fill(depth);
        build(cells, mid, hi, depth + 1, rng);
    } else {
        build(cells, lo, mid, depth + 1, rng);
        cells[mid..hi].fill(depth);
    }
}

/// Distort a pattern so that it is guaranteed *not* to be a valid fractal.
///
/// Writes a random symbol to [`PATTERN_LEN`] random positions (repeats
/// allowed). If the result still happens to be valid, one more random cell
/// is shifted to a different symbol, which always breaks validity.
pub fn perturb<R: Rng + ?Sized>(pattern: &Pattern, rng: &mut R) -> Pattern {
    let mut out = *pattern;
    for _ in 0..PATTERN_LEN {
        let position = rng.gen_range(0..PATTERN_LEN);
        out.set(position, rng.gen_range(0..SYMBOL_COUNT));
    }
    if is_valid(out.as_slice()) {
        let position = rng.gen_range(0..PATTERN_LEN);
        let shifted = (out[position] + rng.gen_range(1..SYMBOL_COUNT)) % SYMBOL_COUNT;
        out.set(position, shifted);
    }
    out
}

// ─────────────────────────────────────────────
// Validation
// ─────────────────────────────────────────────

/// Minimum number of single-cell changes that make `cells[lo..hi]` the
/// depth-`depth` branch of some valid fractal.
///
/// Panics when the span is empty, not a power of two, out of bounds, or
/// when `depth` exceeds [`MAX_DEPTH`].
pub fn min_edits_to_valid(cells: &[u8], lo: usize, hi: usize, depth: u8) -> usize {
    check_span(cells, lo, hi, depth);
    if hi - lo == 1 {
        return usize::from(cells[lo] != depth);
    }
    let mid = (lo + hi) / 2;
    let fill_left = mismatches(&cells[lo..mid], depth) + min_edits_to_valid(cells, mid, hi, depth + 1);
    let fill_right = mismatches(&cells[mid..hi], depth) + min_edits_to_valid(cells, lo, mid, depth + 1);
    fill_left.min(fill_right)
}

/// Edit distance of a whole grid from the nearest valid fractal.
pub fn edit_distance(cells: &[u8]) -> usize {
    min_edits_to_valid(cells, 0, cells.len(), 0)
}

/// `true` if the whole grid is a valid fractal.
pub fn is_valid(cells: &[u8]) -> bool {
    edit_distance(cells) == 0
}

/// One valid fractal at distance [`edit_distance`] from `pattern`.
///
/// Ties between the two structural choices resolve toward filling the left
/// half, matching the order [`min_edits_to_valid`] compares them in.
pub fn nearest_valid(pattern: &Pattern) -> Pattern {
    let mut out = *pattern;
    fit(out.cells_mut(), 0, PATTERN_LEN, 0);
    out
}

fn fit(cells: &mut [u8], lo: usize, hi: usize, depth: u8) {
    if hi - lo == 1 {
        cells[lo] = depth;
        return;
    }
    let mid = (lo + hi) / 2;
    let fill_left = mismatches(&cells[lo..mid], depth) + min_edits_to_valid(cells, mid, hi, depth + 1);
    let fill_right = mismatches(&cells[mid..hi], depth) + min_edits_to_valid(cells, lo, mid, depth + 1);
    if fill_left <= fill_right {
        cells[lo..mid].fill(depth);
        fit(cells, mid, hi, depth + 1);
    } else {
        fit(cells, lo, mid, depth + 1);
        cells[mid..hi].fill(depth);
    }
}

// ─────────────────────────────────────────────
// Enumeration
// ─────────────────────────────────────────────

/// Number of distinct valid fractals over the full grid: one binary choice
/// per level.
pub const FRACTAL_COUNT: usize = 1 << PATTERN_LEN.trailing_zeros();

/// The fractal whose fill half at depth `d` is the left one exactly when
/// bit `d` of `choices` is set. Bits above the deepest level are ignored.
pub fn from_choices(choices: u32) -> Pattern {
    let mut pattern = Pattern::filled(0);
    let cells = pattern.cells_mut();
    let (mut lo, mut hi, mut depth) = (0, PATTERN_LEN, 0u8);
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if choices >> depth & 1 == 1 {
            cells[lo..mid].fill(depth);
            lo = mid;
        } else {
            cells[mid..hi].fill(depth);
            hi = mid;
        }
        depth += 1;
    }
    cells[lo] = depth;
    pattern
}

/// Every valid fractal over the full grid.
pub fn all_valid() -> impl Iterator<Item = Pattern> {
    (0..FRACTAL_COUNT as u32).map(from_choices)
}

fn mismatches(cells: &[u8], depth: u8) -> usize {
    cells.iter().filter(|&&c| c != depth).count()
}

fn check_span(cells: &[u8], lo: usize, hi: usize, depth: u8) {
    assert!(lo < hi && hi <= cells.len(), "span [{lo}, {hi}) outside grid of {}", cells.len());
    assert!((hi - lo).is_power_of_two(), "span width {} is not a power of two", hi - lo);
    assert!(depth <= MAX_DEPTH, "depth {depth} exceeds maximum {MAX_DEPTH}");
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
