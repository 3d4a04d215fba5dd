//! Staged disclosure: reveals the target pattern piecemeal, with noise.
//!
//! ## Planning protocol
//!
//! 1. **Partition**: every grid position is dropped into a random stage
//!    bucket; a full bucket rejects the draw and the position is redrawn.
//! 2. **Top up**: buckets still short of `cells_per_stage` receive further
//!    random positions not already in that bucket. A position may therefore
//!    appear in several stages.
//! 3. **Assign**: stages are walked from the last to the first. The first
//!    time a position is met on that walk it carries its true symbol; every
//!    other occurrence carries a decoy drawn uniformly from the five other
//!    symbols.
//!
//! The net contract: a position's true symbol is shown only in the
//! highest-indexed stage that contains it, and never in an earlier one.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::pattern::{Pattern, PATTERN_LEN, SYMBOL_COUNT};

/// Default floor for cells shown per stage.
pub const DEFAULT_MIN_CELLS_PER_STAGE: usize = 3;

// ─────────────────────────────────────────────
// Layout
// ─────────────────────────────────────────────

/// Number of stages and the size of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageLayout {
    pub stage_count:     usize,
    pub cells_per_stage: usize,
}

impl StageLayout {
    /// One stage per progress unit plus the opening stage.
    ///
    /// Cells per stage is `ceil(32 / stage_count)`, raised to `min_cells`
    /// and capped at the grid size.
    pub fn for_progress_units(units: usize, min_cells: usize) -> Self {
        let stage_count = units + 1;
        let cells_per_stage = PATTERN_LEN
            .div_ceil(stage_count)
            .max(min_cells)
            .min(PATTERN_LEN);
        Self { stage_count, cells_per_stage }
    }

    pub fn last_stage(&self) -> usize {
        self.stage_count - 1
    }
}

// ─────────────────────────────────────────────
// Stage
// ─────────────────────────────────────────────

/// One (position, symbol) pair shown during a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCell {
    pub position: usize,
    pub symbol:   u8,
}

/// A batch of cells shown together while the stage is current.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub cells: Vec<StageCell>,
}

impl Stage {
    /// Full grid view: `Some(symbol)` where the stage shows a cell.
    pub fn grid(&self) -> [Option<u8>; PATTERN_LEN] {
        let mut grid = [None; PATTERN_LEN];
        for cell in &self.cells {
            grid[cell.position] = Some(cell.symbol);
        }
        grid
    }

    pub fn contains(&self, position: usize) -> bool {
        self.cells.iter().any(|c| c.position == position)
    }
}

// ─────────────────────────────────────────────
// Planning
// ─────────────────────────────────────────────

/// Split `target` into `layout.stage_count` stages of `layout.cells_per_stage`
/// cells each.
///
/// Panics on a layout with no stages, or with more cells per stage than the
/// grid holds.
pub fn plan<R: Rng + ?Sized>(target: &Pattern, layout: StageLayout, rng: &mut R) -> Vec<Stage> {
    assert!(layout.stage_count > 0, "layout needs at least one stage");
    assert!(
        (1..=PATTERN_LEN).contains(&layout.cells_per_stage),
        "cells per stage {} outside [1, {PATTERN_LEN}]",
        layout.cells_per_stage,
    );
    assert!(
        layout.stage_count * layout.cells_per_stage >= PATTERN_LEN,
        "layout {layout:?} cannot cover the grid",
    );

    let buckets = partition(layout, rng);

    let mut revealed = [false; PATTERN_LEN];
    let mut stages: Vec<Stage> = buckets
        .into_iter()
        .map(|positions| Stage {
            cells: positions.into_iter().map(|position| StageCell { position, symbol: 0 }).collect(),
        })
        .collect();

    for stage in stages.iter_mut().rev() {
        for cell in &mut stage.cells {
            if revealed[cell.position] {
                cell.symbol = decoy(target[cell.position], rng);
            } else {
                cell.symbol = target[cell.position];
                revealed[cell.position] = true;
            }
        }
    }
    stages
}

/// Uniform over the symbols other than `truth`.
fn decoy<R: Rng + ?Sized>(truth: u8, rng: &mut R) -> u8 {
    (truth + rng.gen_range(1..SYMBOL_COUNT)) % SYMBOL_COUNT
}

fn partition<R: Rng + ?Sized>(layout: StageLayout, rng: &mut R) -> Vec<Vec<usize>> {
    let StageLayout { stage_count, cells_per_stage } = layout;
    let mut buckets: Vec<Vec<usize>> = vec![Vec::with_capacity(cells_per_stage); stage_count];

    for position in 0..PATTERN_LEN {
        loop {
            let bucket = rng.gen_range(0..stage_count);
            if buckets[bucket].len() < cells_per_stage {
                buckets[bucket].push(position);
                break;
            }
        }
    }

    for bucket in &mut buckets {
        while bucket.len() < cells_per_stage {
            let position = rng.gen_range(0..PATTERN_LEN);
            if !bucket.contains(&position) {
                bucket.push(position);
            }
        }
    }
    buckets
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
