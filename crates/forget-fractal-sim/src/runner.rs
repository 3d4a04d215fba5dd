//! Plays one full session against a [`SimulatedBomb`].
//!
//! 1. The bomb ticks until every counted module has solved, with the
//!    session polling progress after each tick.
//! 2. The solver transcribes the stages and submits an answer built with
//!    the configured strategy. Later attempts fall back to `optimal`.
//! 3. Every redisplay the session asks for is driven through a
//!    [`Revealer`]; the runner waits for the final animation to finish.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use forget_fractal::{
    FractalError, Journal, PuzzleConfig, PuzzleSession, PuzzleState, Redisplay, Reveal, Revealer,
    Verdict, PATTERN_LEN,
};

use crate::bomb::SimulatedBomb;
use crate::solver::{self, Strategy};

/// Settings for one simulated session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Seed for the bomb and the puzzle. `None` draws one at random.
    pub seed:         Option<u64>,
    /// Fake modules on the bomb besides the puzzle itself.
    pub modules:      usize,
    /// Strategy of the first attempt.
    pub strategy:     Strategy,
    pub max_attempts: usize,
    /// Real time between bomb ticks. Zero only yields to the runtime.
    pub tick:         Duration,
    pub puzzle:       PuzzleConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed:         None,
            modules:      6,
            strategy:     Strategy::Optimal,
            max_attempts: 3,
            tick:         Duration::ZERO,
            puzzle:       PuzzleConfig::default(),
        }
    }
}

/// Outcome of one simulated session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimReport {
    pub session:       Uuid,
    pub seed:          u64,
    pub strategy:      Strategy,
    pub stages:        usize,
    pub budget:        usize,
    pub ticks:         u64,
    pub redraws:       usize,
    pub verdicts:      Vec<Verdict>,
    pub strikes:       u32,
    pub solved:        bool,
    pub exploded:      bool,
    pub reveal_events: usize,
    pub journal:       Journal,
}

// ─────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────

/// Forwards session redisplays to the revealer.
struct Renderer {
    revealer:   Revealer,
    duration:   Duration,
    rng:        StdRng,
    last_epoch: Option<u64>,
    redraws:    usize,
}

impl Renderer {
    fn sync(&mut self, session: &mut PuzzleSession) {
        match session.take_redisplay() {
            Some(Redisplay::Animate(cells)) => {
                let reveal = Reveal::new(cells, self.duration, &mut self.rng);
                self.last_epoch = Some(self.revealer.restart(reveal));
                self.redraws += 1;
            }
            Some(Redisplay::Immediate(_)) => {
                self.revealer.cancel();
                self.last_epoch = None;
            }
            None => {}
        }
    }
}

async fn pause(tick: Duration) {
    if tick.is_zero() {
        tokio::task::yield_now().await;
    } else {
        tokio::time::sleep(tick).await;
    }
}

// ─────────────────────────────────────────────
// Run
// ─────────────────────────────────────────────

/// Play one session to the end. Must be called inside a tokio runtime.
pub async fn run(config: SimConfig) -> Result<SimReport, FractalError> {
    let seed = config.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut bomb = SimulatedBomb::random(config.modules, &mut rng);
    let mut session = PuzzleSession::new(config.puzzle.clone().with_seed(rng.gen()))?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut renderer = Renderer {
        revealer:   Revealer::new(tx),
        duration:   config.puzzle.reveal_duration(),
        rng:        StdRng::seed_from_u64(rng.gen()),
        last_epoch: None,
        redraws:    0,
    };

    info!(
        session = %session.id(),
        seed,
        modules = config.modules,
        strategy = %config.strategy,
        serial = %bomb.serial,
        "simulation started"
    );
    renderer.sync(&mut session);

    // ── Reading ─────────────────────────────────────────
    session.activate(&bomb);
    renderer.sync(&mut session);
    while session.state() == PuzzleState::Reading && bomb.ticks <= bomb.last_solve() {
        bomb.advance();
        session.tick(&bomb);
        renderer.sync(&mut session);
        pause(config.tick).await;
    }

    // ── Submitting ──────────────────────────────────────
    let target = solver::transcribe(session.stages());
    let mut verdicts = Vec::new();
    let mut strategy = config.strategy;
    for attempt in 1..=config.max_attempts {
        session.press_display(&mut bomb);
        renderer.sync(&mut session);
        if session.state() != PuzzleState::Submitting {
            warn!(session = %session.id(), state = ?session.state(), "cannot submit");
            break;
        }

        let edits = solver::answer(strategy, &target);
        solver::enter(&mut session, &edits);
        renderer.sync(&mut session);

        if let Some(verdict) = session.press_display(&mut bomb) {
            info!(session = %session.id(), attempt, %strategy, %verdict, "attempt judged");
            verdicts.push(verdict);
        }
        renderer.sync(&mut session);

        if session.state() == PuzzleState::Solved || bomb.exploded() {
            break;
        }
        strategy = Strategy::Optimal;
        pause(config.tick).await;
    }

    // ── Final animation ─────────────────────────────────
    let mut reveal_events = 0;
    if let Some(epoch) = renderer.last_epoch {
        let wait = renderer.duration + Duration::from_secs(1);
        let mut final_cells = 0;
        let finished = tokio::time::timeout(wait, async {
            while let Some(event) = rx.recv().await {
                reveal_events += 1;
                if event.epoch == epoch {
                    final_cells += 1;
                    if final_cells == PATTERN_LEN {
                        break;
                    }
                }
            }
        })
        .await;
        if finished.is_err() {
            warn!(session = %session.id(), "final reveal did not finish in time");
        }
    }
    renderer.revealer.cancel();
    while rx.try_recv().is_ok() {
        reveal_events += 1;
    }

    let report = SimReport {
        session: session.id(),
        seed,
        strategy: config.strategy,
        stages: session.stages().len(),
        budget: session.budget().unwrap_or(0),
        ticks: bomb.ticks,
        redraws: renderer.redraws,
        verdicts,
        strikes: bomb.strikes,
        solved: session.state() == PuzzleState::Solved,
        exploded: bomb.exploded(),
        reveal_events,
        journal: session.journal().clone(),
    };
    info!(
        session = %report.session,
        solved = report.solved,
        strikes = report.strikes,
        attempts = report.verdicts.len(),
        "simulation finished"
    );
    Ok(report)
}
