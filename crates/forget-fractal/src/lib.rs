//! `forget-fractal`: logic core of the Forget Fractal puzzle.
//!
//! A 32-cell grid holds a distorted member of a recursive pattern family.
//! The player reads it back piecemeal over the course of the bomb, with
//! noise mixed in, then repairs it with as few edits as possible through a
//! scrambled color input, without ever writing a cell back to its original
//! color.
//!
//! ## Crate structure
//!
//! | Module         | Responsibility                                               |
//! |----------------|--------------------------------------------------------------|
//! | [`pattern`]    | [`Pattern`] grid and its constants                           |
//! | [`codec`]      | Fractal generation, distortion, minimum-edit validation      |
//! | [`palette`]    | [`ColorPermutation`], context-derived palette                |
//! | [`disclosure`] | [`StageLayout`], staged noisy reveal of the target           |
//! | [`judge`]      | [`Submission`], [`Verdict`], submission judging              |
//! | [`machine`]    | [`PuzzleSession`] state machine                              |
//! | [`reveal`]     | Reveal animation pacing + cancellable async [`Revealer`]     |
//! | [`host`]       | [`PuzzleHost`] seam, [`PuzzleContext`], ignore lists         |
//! | [`display`]    | Screen text and cell color projections                       |
//! | [`journal`]    | Session log (text + JSON)                                    |
//! | [`config`]     | [`PuzzleConfig`] from environment variables                  |
//! | [`error`]      | [`FractalError`]                                             |
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use forget_fractal::{PuzzleConfig, PuzzleSession};
//!
//! let mut session = PuzzleSession::new(PuzzleConfig::from_env())?;
//! session.activate(&bomb);
//! loop {
//!     session.tick(&bomb);
//!     if let Some(redisplay) = session.take_redisplay() {
//!         renderer.apply(redisplay);
//!     }
//!     // route button presses to press_display / press_cell
//! }
//! ```
//!
//! ## Environment variables
//! | Variable | Default | Description |
//! |---|---|---|
//! | `FORGET_FRACTAL_MIN_CELLS_PER_STAGE` | `3` | Floor for cells per stage |
//! | `FORGET_FRACTAL_REVEAL_MS` | `1000` | Duration of one reveal animation |
//! | `FORGET_FRACTAL_IGNORED_MODULES` | empty | Extra ignored module names, comma-separated |
//! | `FORGET_FRACTAL_SEED` | unset | Fixed RNG seed |

pub mod codec;
pub mod config;
pub mod disclosure;
pub mod display;
pub mod error;
pub mod host;
pub mod journal;
pub mod judge;
pub mod machine;
pub mod palette;
pub mod pattern;
pub mod reveal;

// ── Grid / codec ──────────────────────────────────────────────────────────────
pub use codec::{edit_distance, generate, is_valid, min_edits_to_valid, nearest_valid, perturb};
pub use pattern::{Pattern, MAX_DEPTH, PATTERN_LEN, SYMBOL_COUNT};

// ── Colors ────────────────────────────────────────────────────────────────────
pub use palette::{derive_permutation, ColorPermutation, PaletteColor, PermutationRule};

// ── Disclosure / judging ──────────────────────────────────────────────────────
pub use disclosure::{plan, Stage, StageCell, StageLayout};
pub use judge::{judge, penalty_units, Submission, Verdict};

// ── Session ───────────────────────────────────────────────────────────────────
pub use display::{CellColors, ScreenText, TextTone};
pub use host::{serial_digit_sum, PuzzleContext, PuzzleHost, MODULE_NAME};
pub use journal::{Journal, JournalEntry};
pub use machine::{PuzzleSession, PuzzleState, Redisplay};
pub use reveal::{Reveal, RevealEvent, Revealer};

// ── Config / errors ───────────────────────────────────────────────────────────
pub use config::PuzzleConfig;
pub use error::FractalError;

pub type Result<T> = std::result::Result<T, FractalError>;
