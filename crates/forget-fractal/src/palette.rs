//! Color obfuscation: the session palette and the player decoder.
//!
//! A [`ColorPermutation`] is a bijection from logical indices `0..6` to
//! palette slots `0..6`. Slots 0, 1 and 5 are fixed; only `{2, 3, 4}` move.
//!
//! Two permutations exist per session:
//!
//! | Role      | Source                          | Maps                              |
//! |-----------|---------------------------------|-----------------------------------|
//! | palette   | [`derive_permutation`] (context) | logical symbol → displayed color  |
//! | decoder   | [`ColorPermutation::random`]     | player cycle index → logical symbol |
//!
//! The decoder is the permutation that colored the pre-activation preview.
//!
//! ## Context rules
//!
//! Evaluated in order, first match wins:
//!
//! | Rule | Condition                                 | Slots 2,3,4 |
//! |------|-------------------------------------------|-------------|
//! | 1    | serial digit sum divisible by 6           | `2 3 4`     |
//! | 2    | more than 2 port plates                   | `4 2 3`     |
//! | 3    | more than 2 indicators                    | `3 4 2`     |
//! | 4    | ≥ 5 batteries or more than 63 modules     | `2 4 3`     |
//! | 5    | ≥ 35 whole minutes on the timer           | `3 2 4`     |
//! |:    | otherwise                                 | `4 3 2`     |

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::FractalError;
use crate::host::PuzzleContext;
use crate::pattern::SYMBOL_COUNT;

/// Letters for palette slots, in slot order.
pub const PALETTE_LETTERS: &str = "RGMYB?";

// ─────────────────────────────────────────────
// Palette colors
// ─────────────────────────────────────────────

/// A displayed cell color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaletteColor {
    Red,
    Green,
    Magenta,
    Yellow,
    Blue,
    /// Rendered as a nested multi-colored cube; reads as "?".
    Multicolor,
}

impl PaletteColor {
    pub const ALL: [PaletteColor; 6] = [
        Self::Red,
        Self::Green,
        Self::Magenta,
        Self::Yellow,
        Self::Blue,
        Self::Multicolor,
    ];

    pub fn from_slot(slot: u8) -> Self {
        Self::ALL[usize::from(slot)]
    }

    pub fn slot(self) -> u8 {
        self as u8
    }

    pub fn letter(self) -> char {
        PALETTE_LETTERS.as_bytes()[self as usize] as char
    }
}

// ─────────────────────────────────────────────
// Permutation
// ─────────────────────────────────────────────

/// Bijection between logical indices and palette slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorPermutation {
    slots: [u8; 6],
}

impl ColorPermutation {
    /// Build from the ordering of slots `{2, 3, 4}`.
    pub fn from_extra(extra: [u8; 3]) -> Result<Self, FractalError> {
        let mut sorted = extra;
        sorted.sort_unstable();
        if sorted != [2, 3, 4] {
            return Err(FractalError::InvalidPermutation(format!(
                "{extra:?} is not an ordering of [2, 3, 4]"
            )));
        }
        Ok(Self::with_extra(extra))
    }

    fn with_extra(extra: [u8; 3]) -> Self {
        Self { slots: [0, 1, extra[0], extra[1], extra[2], 5] }
    }

    /// The identity mapping.
    pub fn identity() -> Self {
        Self::with_extra([2, 3, 4])
    }

    /// Uniformly random ordering of `{2, 3, 4}`; not derived from context.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut extra = [2u8, 3, 4];
        extra.shuffle(rng);
        Self::with_extra(extra)
    }

    /// Logical index → palette slot. Panics when `logical >= 6`.
    pub fn decode(&self, logical: u8) -> u8 {
        assert!(logical < SYMBOL_COUNT, "logical index {logical} out of range");
        self.slots[usize::from(logical)]
    }

    /// Palette slot → logical index. Panics when `slot >= 6`.
    pub fn encode(&self, slot: u8) -> u8 {
        assert!(slot < SYMBOL_COUNT, "palette slot {slot} out of range");
        self.slots
            .iter()
            .position(|&s| s == slot)
            .map(|i| i as u8)
            .unwrap_or_else(|| unreachable!("permutation always covers every slot"))
    }

    pub fn color(&self, logical: u8) -> PaletteColor {
        PaletteColor::from_slot(self.decode(logical))
    }

    pub fn slots(&self) -> [u8; 6] {
        self.slots
    }

    /// Letters of each logical symbol's color, `.` for unset cells.
    pub fn render<I>(&self, symbols: I) -> String
    where
        I: IntoIterator<Item = Option<u8>>,
    {
        symbols
            .into_iter()
            .map(|s| s.map_or('.', |s| self.color(s).letter()))
            .collect()
    }
}

impl fmt::Display for ColorPermutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render((0..SYMBOL_COUNT).map(Some)))
    }
}

// ─────────────────────────────────────────────
// Context derivation
// ─────────────────────────────────────────────

/// Which context rule selected the session palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermutationRule {
    SerialDigitsDivisibleBySix,
    ManyPortPlates,
    ManyIndicators,
    ManyBatteriesOrModules,
    LateTimer,
    Fallback,
}

impl PermutationRule {
    /// Ordering of slots `{2, 3, 4}` this rule selects.
    pub fn extra(self) -> [u8; 3] {
        match self {
            Self::SerialDigitsDivisibleBySix => [2, 3, 4],
            Self::ManyPortPlates             => [4, 2, 3],
            Self::ManyIndicators             => [3, 4, 2],
            Self::ManyBatteriesOrModules     => [2, 4, 3],
            Self::LateTimer                  => [3, 2, 4],
            Self::Fallback                   => [4, 3, 2],
        }
    }

    /// First rule whose predicate holds for `ctx`.
    pub fn select(ctx: &PuzzleContext) -> Self {
        if ctx.serial_digit_sum % 6 == 0 {
            Self::SerialDigitsDivisibleBySix
        } else if ctx.port_plate_count > 2 {
            Self::ManyPortPlates
        } else if ctx.indicator_count > 2 {
            Self::ManyIndicators
        } else if ctx.battery_count >= 5 || ctx.module_count > 63 {
            Self::ManyBatteriesOrModules
        } else if ctx.elapsed_minutes() >= 35 {
            Self::LateTimer
        } else {
            Self::Fallback
        }
    }
}

/// Session palette for `ctx`, and the rule that produced it.
pub fn derive_permutation(ctx: &PuzzleContext) -> (ColorPermutation, PermutationRule) {
    let rule = PermutationRule::select(ctx);
    (ColorPermutation::with_extra(rule.extra()), rule)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ctx() -> PuzzleContext {
        // Matches no rule: digit sum 7, few plates/indicators/batteries, short timer.
        PuzzleContext {
            serial_digit_sum: 7,
            port_plate_count: 1,
            indicator_count:  1,
            battery_count:    2,
            module_count:     11,
            elapsed_secs:     600.0,
        }
    }

    #[test]
    fn decode_encode_round_trip() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let p = ColorPermutation::random(&mut rng);
            for x in 0..6 {
                assert_eq!(p.encode(p.decode(x)), x);
                assert_eq!(p.decode(p.encode(x)), x);
            }
        }
    }

    #[test]
    fn fixed_slots_never_move() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..20 {
            let p = ColorPermutation::random(&mut rng);
            assert_eq!(p.decode(0), 0);
            assert_eq!(p.decode(1), 1);
            assert_eq!(p.decode(5), 5);
        }
    }

    #[test]
    fn from_extra_validates() {
        assert!(ColorPermutation::from_extra([4, 3, 2]).is_ok());
        assert!(ColorPermutation::from_extra([2, 2, 4]).is_err());
        assert!(ColorPermutation::from_extra([1, 3, 4]).is_err());
    }

    #[test]
    fn fallback_when_no_rule_matches() {
        let (p, rule) = derive_permutation(&ctx());
        assert_eq!(rule, PermutationRule::Fallback);
        assert_eq!(p.slots(), [0, 1, 4, 3, 2, 5]);
        assert_eq!(p.to_string(), "RGBYM?");
    }

    #[test]
    fn each_rule_selects_its_ordering() {
        let cases = [
            (PuzzleContext { serial_digit_sum: 12, ..ctx() }, PermutationRule::SerialDigitsDivisibleBySix),
            (PuzzleContext { port_plate_count: 3, ..ctx() }, PermutationRule::ManyPortPlates),
            (PuzzleContext { indicator_count: 3, ..ctx() }, PermutationRule::ManyIndicators),
            (PuzzleContext { battery_count: 5, ..ctx() }, PermutationRule::ManyBatteriesOrModules),
            (PuzzleContext { module_count: 64, ..ctx() }, PermutationRule::ManyBatteriesOrModules),
            (PuzzleContext { elapsed_secs: 35.0 * 60.0, ..ctx() }, PermutationRule::LateTimer),
        ];
        for (c, expected) in cases {
            let (p, rule) = derive_permutation(&c);
            assert_eq!(rule, expected);
            assert_eq!(&p.slots()[2..5], &expected.extra());
        }
    }

    #[test]
    fn earlier_rule_wins_when_several_match() {
        let all = PuzzleContext {
            serial_digit_sum: 0,
            port_plate_count: 4,
            indicator_count:  4,
            battery_count:    6,
            module_count:     100,
            elapsed_secs:     3600.0,
        };
        assert_eq!(PermutationRule::select(&all), PermutationRule::SerialDigitsDivisibleBySix);
        let no_serial = PuzzleContext { serial_digit_sum: 1, ..all };
        assert_eq!(PermutationRule::select(&no_serial), PermutationRule::ManyPortPlates);
        let no_plates = PuzzleContext { port_plate_count: 0, ..no_serial };
        assert_eq!(PermutationRule::select(&no_plates), PermutationRule::ManyIndicators);
        let no_indicators = PuzzleContext { indicator_count: 0, ..no_plates };
        assert_eq!(PermutationRule::select(&no_indicators), PermutationRule::ManyBatteriesOrModules);
        let no_batteries = PuzzleContext { battery_count: 0, module_count: 5, ..no_indicators };
        assert_eq!(PermutationRule::select(&no_batteries), PermutationRule::LateTimer);
    }

    #[test]
    fn render_marks_unset_cells() {
        let p = ColorPermutation::identity();
        assert_eq!(p.render([Some(0), None, Some(5), Some(2)]), "R.?M");
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn decode_rejects_six() {
        ColorPermutation::identity().decode(6);
    }
}
