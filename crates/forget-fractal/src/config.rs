//! Configuration for a puzzle session.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::disclosure::DEFAULT_MIN_CELLS_PER_STAGE;
use crate::error::FractalError;
use crate::pattern::PATTERN_LEN;

/// Default duration of one full reveal animation, in milliseconds.
pub const DEFAULT_REVEAL_MS: u64 = 1000;

/// Tunables for a single puzzle session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleConfig {
    /// Floor for cells shown per disclosure stage.
    /// Default: `3`
    pub min_cells_per_stage: usize,

    /// Time for a redisplay to reveal all 32 cells.
    /// Default: `1000`
    pub reveal_ms: u64,

    /// Extra module names whose solves do not advance stages. Merged with
    /// the built-in ignore list and the host's list.
    #[serde(default)]
    pub ignored_modules: Vec<String>,

    /// Fixed RNG seed. `None` seeds from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            min_cells_per_stage: DEFAULT_MIN_CELLS_PER_STAGE,
            reveal_ms:           DEFAULT_REVEAL_MS,
            ignored_modules:     Vec::new(),
            seed:                None,
        }
    }
}

impl PuzzleConfig {
    /// Load from environment variables, falling back to defaults.
    ///
    /// | Variable                              | Default |
    /// |---------------------------------------|---------|
    /// | `FORGET_FRACTAL_MIN_CELLS_PER_STAGE`  | `3`     |
    /// | `FORGET_FRACTAL_REVEAL_MS`            | `1000`  |
    /// | `FORGET_FRACTAL_IGNORED_MODULES`      | empty (comma-separated) |
    /// | `FORGET_FRACTAL_SEED`                 | unset   |
    pub fn from_env() -> Self {
        Self {
            min_cells_per_stage: env_parse("FORGET_FRACTAL_MIN_CELLS_PER_STAGE", DEFAULT_MIN_CELLS_PER_STAGE),
            reveal_ms:           env_parse("FORGET_FRACTAL_REVEAL_MS", DEFAULT_REVEAL_MS),
            ignored_modules:     env_list("FORGET_FRACTAL_IGNORED_MODULES"),
            seed:                std::env::var("FORGET_FRACTAL_SEED").ok().and_then(|s| s.parse().ok()),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn reveal_duration(&self) -> Duration {
        Duration::from_millis(self.reveal_ms)
    }

    /// Reject values no session can be built from.
    pub fn validate(&self) -> Result<(), FractalError> {
        if !(1..=PATTERN_LEN).contains(&self.min_cells_per_stage) {
            return Err(FractalError::Config(format!(
                "min_cells_per_stage must be in [1, {PATTERN_LEN}], got {}",
                self.min_cells_per_stage
            )));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_list(key: &str) -> Vec<String> {
    std::env::var(key)
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}
