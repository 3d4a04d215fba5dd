//! `forget-fractal-sim`: plays Forget Fractal sessions without a game.
//!
//! ## Crate structure
//!
//! | Module     | Responsibility                                                 |
//! |------------|----------------------------------------------------------------|
//! | [`bomb`]   | [`SimulatedBomb`] host with fake modules solving over time      |
//! | [`solver`] | Stage transcription and answer [`Strategy`]s                   |
//! | [`runner`] | [`run`] one full session, reveal animation included            |

pub mod bomb;
pub mod runner;
pub mod solver;

pub use bomb::{FakeModule, SimulatedBomb, MODULE_POOL};
pub use runner::{run, SimConfig, SimReport};
pub use solver::{answer, enter, transcribe, Strategy};
