//! In-memory bomb: random edgework, a strike counter, and fake modules that
//! solve themselves on a schedule.

use rand::Rng;
use serde::{Deserialize, Serialize};

use forget_fractal::{PuzzleHost, MODULE_NAME};

/// Names the fake modules are drawn from. Two of them are on the default
/// ignore list, so their solves never advance the stages.
pub const MODULE_POOL: &[&str] = &[
    "Wires",
    "The Button",
    "Keypad",
    "Simon Says",
    "Who's on First",
    "Memory",
    "Morse Code",
    "Complicated Wires",
    "Wire Sequence",
    "Maze",
    "Password",
    "Souvenir",
    "Forget Me Not",
];

/// Seconds of bomb time per simulation step.
pub const SECS_PER_TICK: f64 = 15.0;

/// A fake module that reports solved from `solves_at` onwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FakeModule {
    pub name:      String,
    pub solves_at: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatedBomb {
    pub serial:         String,
    pub port_plates:    usize,
    pub indicators:     usize,
    pub batteries:      usize,
    pub max_strikes:    u32,
    pub strikes:        u32,
    pub ticks:          u64,
    pub modules:        Vec<FakeModule>,
    pub ignore:         Vec<String>,
    pub puzzle_solved:  bool,
}

impl SimulatedBomb {
    /// Random edgework and `module_count` fake modules, each solving at some
    /// tick in `1..=4 * module_count`.
    pub fn random<R: Rng + ?Sized>(module_count: usize, rng: &mut R) -> Self {
        const SERIAL_CHARS: &[u8] = b"ABCDEFGHIJKLMNPQRSTUVWXZ0123456789";
        let serial = (0..6)
            .map(|_| char::from(SERIAL_CHARS[rng.gen_range(0..SERIAL_CHARS.len())]))
            .collect();
        let horizon = (4 * module_count as u64).max(1);
        let modules = (0..module_count)
            .map(|_| FakeModule {
                name:      MODULE_POOL[rng.gen_range(0..MODULE_POOL.len())].to_string(),
                solves_at: rng.gen_range(1..=horizon),
            })
            .collect();

        Self {
            serial,
            port_plates:   rng.gen_range(0..=4),
            indicators:    rng.gen_range(0..=5),
            batteries:     rng.gen_range(0..=6),
            max_strikes:   3,
            strikes:       0,
            ticks:         0,
            modules,
            ignore:        Vec::new(),
            puzzle_solved: false,
        }
    }

    /// One step of bomb time.
    pub fn advance(&mut self) {
        self.ticks += 1;
    }

    /// Tick at which the last fake module solves.
    pub fn last_solve(&self) -> u64 {
        self.modules.iter().map(|m| m.solves_at).max().unwrap_or(0)
    }

    pub fn exploded(&self) -> bool {
        self.max_strikes > 0 && self.strikes >= self.max_strikes
    }
}

impl PuzzleHost for SimulatedBomb {
    fn serial_digit_sum(&self) -> u32 {
        forget_fractal::serial_digit_sum(&self.serial)
    }

    fn port_plate_count(&self) -> usize {
        self.port_plates
    }

    fn indicator_count(&self) -> usize {
        self.indicators
    }

    fn battery_count(&self) -> usize {
        self.batteries
    }

    fn module_count(&self) -> usize {
        self.modules.len() + 1
    }

    fn elapsed_secs(&self) -> f64 {
        self.ticks as f64 * SECS_PER_TICK
    }

    fn strike_count(&self) -> u32 {
        self.strikes
    }

    fn max_strikes(&self) -> u32 {
        self.max_strikes
    }

    fn solvable_modules(&self) -> Vec<String> {
        self.modules
            .iter()
            .map(|m| m.name.clone())
            .chain(std::iter::once(MODULE_NAME.to_string()))
            .collect()
    }

    fn solved_modules(&self) -> Vec<String> {
        self.modules
            .iter()
            .filter(|m| m.solves_at <= self.ticks)
            .map(|m| m.name.clone())
            .chain(self.puzzle_solved.then(|| MODULE_NAME.to_string()))
            .collect()
    }

    fn configured_ignore_list(&self) -> Vec<String> {
        self.ignore.clone()
    }

    fn register_strike(&mut self) {
        self.strikes += 1;
        tracing::warn!(strikes = self.strikes, max = self.max_strikes, "strike");
    }

    fn mark_solved(&mut self) {
        self.puzzle_solved = true;
    }
}
