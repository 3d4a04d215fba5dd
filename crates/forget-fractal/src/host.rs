//! Host seam: the narrow interface between the puzzle core and the bomb.
//!
//! The core never talks to a concrete host. Everything it needs is read
//! through [`PuzzleHost`]; the two side effects it produces (strikes and
//! the solve signal) go back through the same trait.
//!
//! [`PuzzleContext`] is the snapshot of host state taken once at
//! activation and used to derive the session color permutation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Module name this puzzle registers under. Always part of the ignore set.
pub const MODULE_NAME: &str = "Forget Fractal";

/// Modules whose solves never advance the disclosure stages.
///
/// These are boss modules and other stage-driven modules that either
/// cannot be solved before this one or would stall it indefinitely.
pub const DEFAULT_IGNORED_MODULES: &[&str] = &[
    MODULE_NAME,
    "Forget Me Not",
    "Forget Everything",
    "Forget This",
    "Forget Them All",
    "Forget Infinity",
    "Forget Enigma",
    "Forget Perspective",
    "Forget Us Not",
    "Forget It Not",
    "Forget Me Later",
    "Souvenir",
    "The Swan",
    "Simon's Stages",
    "Tallordered Keys",
    "Purgatory",
    "Turn The Key",
    "The Time Keeper",
    "Timing is Everything",
    "Bamboozling Time Keeper",
    "Organization",
    "Hogwarts",
    "Divided Squares",
    "Cookie Jars",
    "Encrypted Hangman",
    "Tech Support",
    "Übermodule",
    "Ultimate Custom Night",
    "Busy Beaver",
    "Black Arrows",
    "Iconic",
    "14",
];

/// Read-only queries plus the two effects the core emits.
pub trait PuzzleHost {
    /// Sum of the digits in the bomb's serial number.
    fn serial_digit_sum(&self) -> u32;
    fn port_plate_count(&self) -> usize;
    fn indicator_count(&self) -> usize;
    fn battery_count(&self) -> usize;
    /// Every module on the bomb, needy modules included.
    fn module_count(&self) -> usize;
    /// Seconds shown on the bomb timer.
    fn elapsed_secs(&self) -> f64;
    fn strike_count(&self) -> u32;
    /// Strikes that detonate the bomb.
    fn max_strikes(&self) -> u32;
    /// Names of all solvable modules (repeats allowed).
    fn solvable_modules(&self) -> Vec<String>;
    /// Names of all solved modules (repeats allowed).
    fn solved_modules(&self) -> Vec<String>;
    /// Host-configured ignore list for this puzzle.
    fn configured_ignore_list(&self) -> Vec<String> {
        Vec::new()
    }

    /// Register one strike.
    fn register_strike(&mut self);
    /// Mark the puzzle solved. Called at most once per session.
    fn mark_solved(&mut self);
}

/// The context values that pick the session color permutation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PuzzleContext {
    pub serial_digit_sum: u32,
    pub port_plate_count: usize,
    pub indicator_count:  usize,
    pub battery_count:    usize,
    pub module_count:     usize,
    pub elapsed_secs:     f64,
}

impl PuzzleContext {
    pub fn capture<H: PuzzleHost + ?Sized>(host: &H) -> Self {
        Self {
            serial_digit_sum: host.serial_digit_sum(),
            port_plate_count: host.port_plate_count(),
            indicator_count:  host.indicator_count(),
            battery_count:    host.battery_count(),
            module_count:     host.module_count(),
            elapsed_secs:     host.elapsed_secs(),
        }
    }

    /// Whole minutes on the timer.
    pub fn elapsed_minutes(&self) -> u64 {
        (self.elapsed_secs.max(0.0).floor() as u64) / 60
    }
}

/// Sum of the decimal digits found in a serial number string.
pub fn serial_digit_sum(serial: &str) -> u32 {
    serial.chars().filter_map(|c| c.to_digit(10)).sum()
}

/// Default ignore list merged with `extra` (host- and config-provided).
pub fn ignore_set<I, S>(extra: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    DEFAULT_IGNORED_MODULES
        .iter()
        .map(|s| s.to_string())
        .chain(extra.into_iter().map(Into::into))
        .collect()
}

/// Number of names not present in `ignored`.
pub fn count_unignored(names: &[String], ignored: &HashSet<String>) -> usize {
    names.iter().filter(|n| !ignored.contains(n.as_str())).count()
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_sum_skips_letters() {
        assert_eq!(serial_digit_sum("AB3CD9"), 12);
        assert_eq!(serial_digit_sum("XXXXXX"), 0);
    }

    #[test]
    fn ignore_set_always_contains_self() {
        let set = ignore_set(Vec::<String>::new());
        assert!(set.contains(MODULE_NAME));
    }

    #[test]
    fn ignore_set_merges_extra() {
        let set = ignore_set(["Wires", "Souvenir"]);
        assert!(set.contains("Wires"));
        assert!(set.contains("Souvenir"));
        assert_eq!(set.len(), DEFAULT_IGNORED_MODULES.len() + 1);
    }

    #[test]
    fn count_unignored_counts_duplicates() {
        let set = ignore_set(Vec::<String>::new());
        let names: Vec<String> = ["Wires", "Wires", MODULE_NAME, "Password"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(count_unignored(&names, &set), 3);
    }

    #[test]
    fn elapsed_minutes_floors() {
        let ctx = PuzzleContext { elapsed_secs: 35.0 * 60.0 - 0.5, ..Default::default() };
        assert_eq!(ctx.elapsed_minutes(), 34);
        let ctx = PuzzleContext { elapsed_secs: 35.0 * 60.0, ..Default::default() };
        assert_eq!(ctx.elapsed_minutes(), 35);
    }
}
