//! Puzzle state machine: one session from preview to solve.
//!
//! ```text
//! NotActivated ──activate──▶ Reading ──progress hits last stage──▶ Ready
//!                                                                   │
//!                    ┌──────────── display pressed ◀────────────────┘
//!                    ▼
//!               Submitting ◀──cell pressed──┐
//!                 │   │  └──────────────────┘
//!   empty submit ─┘   │ judged
//!                     ├──▶ Recovery ──display pressed──▶ Submitting
//!                     └──▶ Solved (terminal)
//! ```
//!
//! Every event runs to completion synchronously. The projections
//! ([`PuzzleSession::display`], [`PuzzleSession::cells`]) are final as soon
//! as the call returns; [`PuzzleSession::take_redisplay`] tells the renderer
//! whether to animate towards them or paint them at once.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::codec;
use crate::config::PuzzleConfig;
use crate::disclosure::{self, Stage, StageLayout};
use crate::display::{self, CellColors, ScreenText, TextTone, IDLE_TEXT, SOLVED_TEXT};
use crate::error::FractalError;
use crate::host::{self, PuzzleContext, PuzzleHost};
use crate::journal::{Journal, JournalEntry};
use crate::judge::{self, Submission, Verdict};
use crate::palette::{self, ColorPermutation, PermutationRule};
use crate::pattern::{Pattern, PATTERN_LEN};

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PuzzleState {
    NotActivated,
    Reading,
    Ready,
    Submitting,
    Recovery,
    Solved,
}

/// How the renderer should bring the grid to the new [`CellColors`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redisplay {
    /// Start a fresh reveal animation, replacing any running one.
    Animate(CellColors),
    /// Stop any running animation and paint immediately.
    Immediate(CellColors),
}

impl Redisplay {
    pub fn cells(&self) -> &CellColors {
        match self {
            Self::Animate(cells) | Self::Immediate(cells) => cells,
        }
    }
}

/// Everything fixed at activation.
#[derive(Debug, Clone)]
struct Puzzle {
    palette: ColorPermutation,
    rule:    PermutationRule,
    target:  Pattern,
    budget:  usize,
    layout:  StageLayout,
    stages:  Vec<Stage>,
    ignored: HashSet<String>,
}

// ─────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────

/// A single puzzle session.
#[derive(Debug)]
pub struct PuzzleSession {
    id:              Uuid,
    config:          PuzzleConfig,
    rng:             StdRng,
    state:           PuzzleState,
    decoder:         ColorPermutation,
    preview:         Pattern,
    puzzle:          Option<Puzzle>,
    displayed_stage: usize,
    submission:      Submission,
    budget_revealed: bool,
    screen:          ScreenText,
    cells:           CellColors,
    redisplay:       Option<Redisplay>,
    journal:         Journal,
}

impl PuzzleSession {
    /// Build the pre-activation session: a random decoder and a valid
    /// preview fractal colored through it.
    pub fn new(config: PuzzleConfig) -> Result<Self, FractalError> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let id = Uuid::new_v4();
        let decoder = ColorPermutation::random(&mut rng);
        let preview = codec::generate(&mut rng);
        let cells = colorize_pattern(&preview, &decoder);

        info!(session = %id, decoder = %decoder, preview = %preview, "session created");

        Ok(Self {
            id,
            config,
            rng,
            state: PuzzleState::NotActivated,
            decoder,
            preview,
            puzzle: None,
            displayed_stage: 0,
            submission: Submission::new(),
            budget_revealed: false,
            screen: ScreenText::new(IDLE_TEXT, TextTone::White),
            cells,
            redisplay: Some(Redisplay::Animate(cells)),
            journal: Journal::new(id),
        })
    }

    // ── Events ──────────────────────────────────────────

    /// Fix the palette, target, budget and stages from the host's state and
    /// show the first stage.
    ///
    /// Panics when called twice.
    pub fn activate<H: PuzzleHost + ?Sized>(&mut self, host: &H) {
        assert_eq!(self.state, PuzzleState::NotActivated, "session already activated");

        let ctx = PuzzleContext::capture(host);
        let (palette, rule) = palette::derive_permutation(&ctx);
        self.journal.record(JournalEntry::Colors { palette: palette.to_string(), rule });

        let target = codec::perturb(&codec::generate(&mut self.rng), &mut self.rng);
        let budget = codec::edit_distance(target.as_slice());

        let ignored = host::ignore_set(
            self.config.ignored_modules.iter().cloned().chain(host.configured_ignore_list()),
        );
        let units = host::count_unignored(&host.solvable_modules(), &ignored);
        let layout = StageLayout::for_progress_units(units, self.config.min_cells_per_stage);
        let stages = disclosure::plan(&target, layout, &mut self.rng);

        for (i, stage) in stages.iter().enumerate() {
            self.journal.record(JournalEntry::Stage { index: i + 1, cells: palette.render(stage.grid()) });
        }
        self.journal.record(JournalEntry::Target { cells: palette.render(target.iter().map(Some)) });
        self.journal.record(JournalEntry::Budget { edits: budget });

        info!(
            session = %self.id,
            stages = layout.stage_count,
            cells_per_stage = layout.cells_per_stage,
            "activated"
        );

        self.puzzle = Some(Puzzle { palette, rule, target, budget, layout, stages, ignored });
        self.state = PuzzleState::Reading;
        self.displayed_stage = 0;
        self.render_stage();
    }

    /// Poll external progress. Redraws only when the stage changes.
    pub fn tick<H: PuzzleHost + ?Sized>(&mut self, host: &H) {
        if self.state != PuzzleState::Reading {
            return;
        }
        let Some(puzzle) = &self.puzzle else { return };
        let solved = host::count_unignored(&host.solved_modules(), &puzzle.ignored);
        let stage = solved.min(puzzle.layout.last_stage());
        if stage != self.displayed_stage {
            self.displayed_stage = stage;
            self.render_stage();
        }
    }

    /// The submit / display button.
    ///
    /// Returns the verdict when a submission was judged (including
    /// [`Verdict::NoOp`] for an empty one), `None` otherwise.
    pub fn press_display<H: PuzzleHost + ?Sized>(&mut self, host: &mut H) -> Option<Verdict> {
        match self.state {
            PuzzleState::Ready | PuzzleState::Recovery => {
                self.enter_submit();
                None
            }
            PuzzleState::Submitting => self.submit(host),
            PuzzleState::NotActivated | PuzzleState::Reading | PuzzleState::Solved => None,
        }
    }

    /// Cycle one cell of the submission. Ignored outside `Submitting`.
    ///
    /// Returns whether the press was accepted.
    pub fn press_cell(&mut self, position: usize) -> bool {
        assert!(position < PATTERN_LEN, "cell {position} outside the grid");
        if self.state != PuzzleState::Submitting {
            return false;
        }
        let Some(puzzle) = &self.puzzle else { return false };
        let cycle = self.submission.toggle(position);
        self.cells[position] = cycle.map(|c| puzzle.palette.color(self.decoder.decode(c)));
        self.redisplay = Some(Redisplay::Immediate(self.cells));
        self.screen = ScreenText::new(self.counter_text(), TextTone::Cyan);
        true
    }

    // ── Transitions ─────────────────────────────────────

    fn render_stage(&mut self) {
        let Some(puzzle) = &self.puzzle else { return };
        let stage = self.displayed_stage;
        let last = puzzle.layout.last_stage();
        self.cells = display::colorize(&puzzle.stages[stage].grid(), &puzzle.palette);
        self.redisplay = Some(Redisplay::Animate(self.cells));

        let text = display::stage_text(stage, puzzle.layout.stage_count);
        debug!(session = %self.id, stage = stage + 1, of = puzzle.layout.stage_count, "stage displayed");
        if stage == last {
            self.screen = ScreenText::new(text, TextTone::Green);
            self.state = PuzzleState::Ready;
        } else {
            self.screen = ScreenText::new(text, TextTone::White);
        }
    }

    fn enter_submit(&mut self) {
        self.state = PuzzleState::Submitting;
        self.submission.clear();
        self.cells = [None; PATTERN_LEN];
        self.redisplay = Some(Redisplay::Immediate(self.cells));
        self.screen = ScreenText::new(self.counter_text(), TextTone::Cyan);
        debug!(session = %self.id, "submission started");
    }

    fn submit<H: PuzzleHost + ?Sized>(&mut self, host: &mut H) -> Option<Verdict> {
        let puzzle = self.puzzle.as_ref()?;
        let verdict = judge::judge(&puzzle.target, &self.submission, &self.decoder, puzzle.budget);
        if verdict == Verdict::NoOp {
            return Some(verdict);
        }

        let palette = puzzle.palette;
        let composed = self.submission.compose(&puzzle.target, &self.decoder);
        self.journal.record(JournalEntry::Changes {
            cells: palette.render(self.submission.decoded(&self.decoder)),
        });
        self.journal.record(JournalEntry::Composed { cells: palette.render(composed.iter().map(Some)) });

        let remaining = i64::from(host.max_strikes()) - i64::from(host.strike_count());
        let strikes = verdict.penalty(remaining);
        self.journal.record(JournalEntry::Verdict { verdict, strikes });
        if strikes > 0 {
            warn!(session = %self.id, strikes, %verdict, "penalty issued");
            for _ in 0..strikes {
                host.register_strike();
            }
        }

        let composed_cells = colorize_pattern(&composed, &palette);
        match verdict {
            Verdict::RevealedOriginal => {
                let originals = self.submission.original_positions(&puzzle.target, &self.decoder);
                for (position, cell) in self.cells.iter_mut().enumerate() {
                    if !originals.contains(&position) {
                        *cell = None;
                    }
                }
                self.redisplay = Some(Redisplay::Immediate(self.cells));
                self.recover(TextTone::Blue);
            }
            Verdict::InvalidPattern(_) => {
                self.show(composed_cells);
                self.recover(TextTone::Red);
            }
            Verdict::OverBudget => {
                self.budget_revealed = true;
                let target_cells = colorize_pattern(&puzzle.target, &palette);
                self.show(target_cells);
                self.recover(TextTone::Magenta);
            }
            Verdict::Accept => {
                host.mark_solved();
                self.show(composed_cells);
                self.screen = ScreenText::new(SOLVED_TEXT, TextTone::Green);
                self.state = PuzzleState::Solved;
                info!(session = %self.id, edits = self.submission.edit_count(), "solved");
            }
            Verdict::NoOp => {}
        }
        Some(verdict)
    }

    fn show(&mut self, cells: CellColors) {
        self.cells = cells;
        self.redisplay = Some(Redisplay::Animate(cells));
    }

    fn recover(&mut self, tone: TextTone) {
        self.screen = ScreenText::new(self.counter_text(), tone);
        self.state = PuzzleState::Recovery;
    }

    fn counter_text(&self) -> String {
        let budget = self.puzzle.as_ref().filter(|_| self.budget_revealed).map(|p| p.budget);
        display::edit_counter_text(self.submission.edit_count(), budget)
    }

    // ── Queries ─────────────────────────────────────────

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    pub fn state(&self) -> PuzzleState {
        self.state
    }

    /// Current screen text and tone.
    pub fn display(&self) -> &ScreenText {
        &self.screen
    }

    /// Current (final) cell colors.
    pub fn cells(&self) -> &CellColors {
        &self.cells
    }

    /// The pending render request, if the grid changed since the last call.
    pub fn take_redisplay(&mut self) -> Option<Redisplay> {
        self.redisplay.take()
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// The undistorted fractal shown before activation.
    pub fn preview(&self) -> &Pattern {
        &self.preview
    }

    /// Player cycle index → logical symbol.
    pub fn decoder(&self) -> ColorPermutation {
        self.decoder
    }

    /// Logical symbol → displayed color. `None` before activation.
    pub fn palette(&self) -> Option<ColorPermutation> {
        self.puzzle.as_ref().map(|p| p.palette)
    }

    pub fn rule(&self) -> Option<PermutationRule> {
        self.puzzle.as_ref().map(|p| p.rule)
    }

    pub fn target(&self) -> Option<&Pattern> {
        self.puzzle.as_ref().map(|p| &p.target)
    }

    /// Edits a correct submission may use.
    pub fn budget(&self) -> Option<usize> {
        self.puzzle.as_ref().map(|p| p.budget)
    }

    pub fn budget_revealed(&self) -> bool {
        self.budget_revealed
    }

    pub fn layout(&self) -> Option<StageLayout> {
        self.puzzle.as_ref().map(|p| p.layout)
    }

    pub fn stages(&self) -> &[Stage] {
        self.puzzle.as_ref().map_or(&[][..], |p| p.stages.as_slice())
    }

    /// 0-based index of the stage on screen.
    pub fn displayed_stage(&self) -> usize {
        self.displayed_stage
    }

    pub fn submission(&self) -> &Submission {
        &self.submission
    }
}

fn colorize_pattern(pattern: &Pattern, palette: &ColorPermutation) -> CellColors {
    let mut grid = [None; PATTERN_LEN];
    for (cell, symbol) in grid.iter_mut().zip(pattern.iter()) {
        *cell = Some(symbol);
    }
    display::colorize(&grid, palette)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MODULE_NAME;
    use crate::palette::PaletteColor;

    #[derive(Debug, Default)]
    struct MockHost {
        serial_sum:  u32,
        strikes:     u32,
        max_strikes: u32,
        solvable:    Vec<String>,
        solved:      Vec<String>,
        solved_flag: bool,
    }

    impl MockHost {
        fn with_modules(names: &[&str]) -> Self {
            Self {
                serial_sum: 7,
                max_strikes: 3,
                solvable: names.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            }
        }

        fn solve(&mut self, name: &str) {
            self.solved.push(name.to_string());
        }
    }

    impl PuzzleHost for MockHost {
        fn serial_digit_sum(&self) -> u32 {
            self.serial_sum
        }

        fn port_plate_count(&self) -> usize {
            0
        }

        fn indicator_count(&self) -> usize {
            0
        }

        fn battery_count(&self) -> usize {
            0
        }

        fn module_count(&self) -> usize {
            self.solvable.len()
        }

        fn elapsed_secs(&self) -> f64 {
            0.0
        }

        fn strike_count(&self) -> u32 {
            self.strikes
        }

        fn max_strikes(&self) -> u32 {
            self.max_strikes
        }

        fn solvable_modules(&self) -> Vec<String> {
            self.solvable.clone()
        }

        fn solved_modules(&self) -> Vec<String> {
            self.solved.clone()
        }

        fn register_strike(&mut self) {
            self.strikes += 1;
        }

        fn mark_solved(&mut self) {
            self.solved_flag = true;
        }
    }

    fn session(seed: u64) -> PuzzleSession {
        PuzzleSession::new(PuzzleConfig::default().with_seed(seed)).unwrap()
    }

    /// A session sitting in `Submitting` with an empty submission.
    fn submitting(seed: u64, host: &mut MockHost) -> PuzzleSession {
        let mut s = session(seed);
        s.activate(host);
        host.solved = host.solvable.clone();
        s.tick(host);
        assert_eq!(s.state(), PuzzleState::Ready);
        assert_eq!(s.press_display(host), None);
        assert_eq!(s.state(), PuzzleState::Submitting);
        s
    }

    /// Press `position` until it decodes to `symbol`.
    fn write(s: &mut PuzzleSession, position: usize, symbol: u8) {
        let cycle = s.decoder().encode(symbol);
        for _ in 0..=cycle {
            assert!(s.press_cell(position));
        }
        assert_eq!(s.submission().get(position), Some(cycle));
    }

    fn write_pattern(s: &mut PuzzleSession, answer: &Pattern) {
        let target = *s.target().unwrap();
        for position in target.diff(answer) {
            write(s, position, answer[position]);
        }
    }

    #[test]
    fn new_session_shows_the_preview() {
        let mut s = session(1);
        assert_eq!(s.state(), PuzzleState::NotActivated);
        assert_eq!(s.display().text, "FRACTAL");
        assert!(codec::is_valid(s.preview().as_slice()));
        assert!(s.target().is_none());
        assert!(s.stages().is_empty());
        match s.take_redisplay() {
            Some(Redisplay::Animate(cells)) => assert!(cells.iter().all(Option::is_some)),
            other => panic!("expected preview animation, got {other:?}"),
        }
        assert_eq!(s.take_redisplay(), None);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = PuzzleConfig { min_cells_per_stage: 0, ..Default::default() };
        assert!(PuzzleSession::new(cfg).is_err());
    }

    #[test]
    fn activation_fixes_target_budget_and_stages() {
        let host = MockHost::with_modules(&["Wires", "Maze", "Password", MODULE_NAME]);
        let mut s = session(2);
        s.activate(&host);

        assert_eq!(s.state(), PuzzleState::Reading);
        let target = *s.target().unwrap();
        let budget = s.budget().unwrap();
        assert!(budget >= 1);
        assert_eq!(budget, codec::edit_distance(target.as_slice()));

        // Own module is ignored: 3 units → 4 stages of 8 cells.
        let layout = s.layout().unwrap();
        assert_eq!(layout, StageLayout { stage_count: 4, cells_per_stage: 8 });
        assert_eq!(s.stages().len(), 4);
        assert_eq!(s.display().text, "1/4");
        assert_eq!(s.display().tone, TextTone::White);

        let kinds: Vec<&str> = s
            .journal()
            .entries()
            .iter()
            .map(|e| match e {
                JournalEntry::Colors { .. } => "colors",
                JournalEntry::Stage { .. } => "stage",
                JournalEntry::Target { .. } => "target",
                JournalEntry::Budget { .. } => "budget",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, ["colors", "stage", "stage", "stage", "stage", "target", "budget"]);
    }

    #[test]
    #[should_panic(expected = "already activated")]
    fn activating_twice_panics() {
        let host = MockHost::with_modules(&["Wires"]);
        let mut s = session(3);
        s.activate(&host);
        s.activate(&host);
    }

    #[test]
    fn no_progress_units_means_ready_at_once() {
        let host = MockHost::with_modules(&[MODULE_NAME]);
        let mut s = session(4);
        s.activate(&host);
        assert_eq!(s.state(), PuzzleState::Ready);
        assert_eq!(s.display().text, "1/1");
        assert_eq!(s.display().tone, TextTone::Green);
    }

    #[test]
    fn tick_redraws_only_on_change() {
        let mut host = MockHost::with_modules(&["Wires", "Maze", "Password"]);
        let mut s = session(5);
        s.activate(&host);
        assert!(s.take_redisplay().is_some());

        s.tick(&host);
        assert_eq!(s.take_redisplay(), None);

        host.solve("Souvenir");
        s.tick(&host);
        assert_eq!(s.take_redisplay(), None, "ignored module advanced the stage");

        host.solve("Wires");
        s.tick(&host);
        assert_eq!(s.displayed_stage(), 1);
        assert_eq!(s.display().text, "2/4");
        let grid = s.stages()[1].grid();
        let palette = s.palette().unwrap();
        match s.take_redisplay() {
            Some(Redisplay::Animate(cells)) => assert_eq!(cells, display::colorize(&grid, &palette)),
            other => panic!("expected stage animation, got {other:?}"),
        }
    }

    #[test]
    fn progress_is_clamped_to_the_last_stage() {
        let mut host = MockHost::with_modules(&["Wires", "Maze"]);
        let mut s = session(6);
        s.activate(&host);
        for name in ["Wires", "Maze", "Keypad", "Morse Code"] {
            host.solve(name);
        }
        s.tick(&host);
        assert_eq!(s.displayed_stage(), 2);
        assert_eq!(s.state(), PuzzleState::Ready);
        assert_eq!(s.display(), &ScreenText::new("3/3", TextTone::Green));
    }

    #[test]
    fn input_is_ignored_while_reading() {
        let mut host = MockHost::with_modules(&["Wires", "Maze"]);
        let mut s = session(7);
        s.activate(&host);
        assert_eq!(s.press_display(&mut host), None);
        assert!(!s.press_cell(0));
        assert_eq!(s.state(), PuzzleState::Reading);
        assert!(s.submission().is_empty());
    }

    #[test]
    fn entering_submit_blanks_the_grid() {
        let mut host = MockHost::with_modules(&["Wires"]);
        let mut s = submitting(8, &mut host);
        assert_eq!(s.cells(), &[None; PATTERN_LEN]);
        assert_eq!(s.display(), &ScreenText::new(" 0/??", TextTone::Cyan));
        assert_eq!(s.take_redisplay(), Some(Redisplay::Immediate([None; PATTERN_LEN])));
    }

    #[test]
    fn empty_submit_changes_nothing() {
        let mut host = MockHost::with_modules(&["Wires"]);
        let mut s = submitting(9, &mut host);
        let before = s.journal().entries().len();
        assert_eq!(s.press_display(&mut host), Some(Verdict::NoOp));
        assert_eq!(s.state(), PuzzleState::Submitting);
        assert_eq!(host.strikes, 0);
        assert_eq!(s.journal().entries().len(), before);
    }

    #[test]
    fn cell_press_shows_the_decoded_color() {
        let mut host = MockHost::with_modules(&["Wires"]);
        let mut s = submitting(10, &mut host);
        assert!(s.press_cell(3));
        let expected = s.palette().unwrap().color(s.decoder().decode(0));
        assert_eq!(s.cells()[3], Some(expected));
        assert_eq!(s.display().text, " 1/??");
        for _ in 0..6 {
            s.press_cell(3);
        }
        assert_eq!(s.cells()[3], None);
        assert_eq!(s.display().text, " 0/??");
    }

    #[test]
    fn minimal_repair_is_accepted() {
        let mut host = MockHost::with_modules(&["Wires", "Maze"]);
        let mut s = submitting(11, &mut host);
        let answer = codec::nearest_valid(s.target().unwrap());
        write_pattern(&mut s, &answer);

        assert_eq!(s.press_display(&mut host), Some(Verdict::Accept));
        assert_eq!(s.state(), PuzzleState::Solved);
        assert!(host.solved_flag);
        assert_eq!(host.strikes, 0);
        assert_eq!(s.display(), &ScreenText::new("SOLVED", TextTone::Green));
        assert_eq!(s.cells(), &colorize_pattern(&answer, &s.palette().unwrap()));

        // Terminal.
        assert_eq!(s.press_display(&mut host), None);
        assert!(!s.press_cell(0));
    }

    #[test]
    fn restoring_an_original_blanks_the_rest() {
        let mut host = MockHost::with_modules(&["Wires"]);
        let mut s = submitting(12, &mut host);
        let target = *s.target().unwrap();
        write(&mut s, 0, target[0]);
        write(&mut s, 1, (target[1] + 1) % 6);

        assert_eq!(s.press_display(&mut host), Some(Verdict::RevealedOriginal));
        assert_eq!(host.strikes, 1);
        assert_eq!(s.state(), PuzzleState::Recovery);
        assert_eq!(s.display().tone, TextTone::Blue);
        assert!(s.cells()[0].is_some());
        assert!(s.cells()[1..].iter().all(Option::is_none));

        // Retry starts from scratch.
        assert_eq!(s.press_display(&mut host), None);
        assert_eq!(s.state(), PuzzleState::Submitting);
        assert!(s.submission().is_empty());
    }

    #[test]
    fn invalid_submission_is_capped_below_detonation() {
        let mut host = MockHost::with_modules(&["Wires"]);
        let mut s = submitting(13, &mut host);
        let target = *s.target().unwrap();

        // First single-cell change that neither restores an original nor
        // fixes the grid.
        let (position, symbol) = (0..PATTERN_LEN)
            .flat_map(|p| (0..6u8).map(move |v| (p, v)))
            .find(|&(p, v)| {
                let mut m = target;
                m.set(p, v);
                v != target[p] && !codec::is_valid(m.as_slice())
            })
            .unwrap();
        write(&mut s, position, symbol);
        let mut composed = target;
        composed.set(position, symbol);
        let n = codec::edit_distance(composed.as_slice());

        host.strikes = 1;
        assert_eq!(s.press_display(&mut host), Some(Verdict::InvalidPattern(n)));
        // Remaining is 2: never more than one strike here.
        assert_eq!(host.strikes, 2);
        assert_eq!(s.state(), PuzzleState::Recovery);
        assert_eq!(s.display().tone, TextTone::Red);
        assert_eq!(s.cells(), &colorize_pattern(&composed, &s.palette().unwrap()));
    }

    #[test]
    fn valid_but_wasteful_reveals_the_budget() {
        let mut host = MockHost::with_modules(&["Wires"]);
        let mut s = submitting(14, &mut host);
        let target = *s.target().unwrap();
        let budget = s.budget().unwrap();
        let farthest = codec::all_valid().max_by_key(|v| target.diff(v).len()).unwrap();
        assert!(target.diff(&farthest).len() > budget);
        write_pattern(&mut s, &farthest);

        assert_eq!(s.press_display(&mut host), Some(Verdict::OverBudget));
        assert_eq!(host.strikes, 1);
        assert!(s.budget_revealed());
        assert_eq!(s.display().tone, TextTone::Magenta);
        assert_eq!(s.display().text, display::edit_counter_text(target.diff(&farthest).len(), Some(budget)));
        assert_eq!(s.cells(), &colorize_pattern(&target, &s.palette().unwrap()));

        // The budget stays visible on later attempts.
        s.press_display(&mut host);
        assert_eq!(s.display().text, display::edit_counter_text(0, Some(budget)));
    }

    #[test]
    fn zero_strike_limit_still_caps_the_penalty_at_one() {
        let mut host = MockHost { max_strikes: 0, ..MockHost::with_modules(&["Wires"]) };
        let mut s = submitting(15, &mut host);
        let target = *s.target().unwrap();
        // Paint every cell with the deepest symbol.
        for position in 0..PATTERN_LEN {
            if target[position] != 5 {
                write(&mut s, position, 5);
            }
        }
        let composed = s.submission().compose(&target, &s.decoder());
        let n = codec::edit_distance(composed.as_slice());
        assert!(n > 1);
        assert_eq!(s.press_display(&mut host), Some(Verdict::InvalidPattern(n)));
        // 0 - 0 strikes left: the cap bottoms out at a single strike.
        assert_eq!(host.strikes, 1);
        let last = s.journal().entries().last().unwrap();
        assert_eq!(last, &JournalEntry::Verdict { verdict: Verdict::InvalidPattern(n), strikes: 1 });
    }

    #[test]
    fn palette_colors_match_the_journal() {
        let host = MockHost::with_modules(&["Wires"]);
        let mut s = session(16);
        s.activate(&host);
        let palette = s.palette().unwrap();
        let first = &s.journal().entries()[0];
        assert_eq!(first, &JournalEntry::Colors { palette: palette.to_string(), rule: s.rule().unwrap() });
        // Serial digit sum 7 with no other context falls through to the default.
        assert_eq!(s.rule(), Some(PermutationRule::Fallback));
        assert_eq!(palette.color(0), PaletteColor::Red);
    }
}
