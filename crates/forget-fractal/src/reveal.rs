//! Reveal animation: cells of a redisplayed grid appear one by one.
//!
//! [`Reveal`] is the pacing model: a random order over the 32 positions and
//! a fixed duration. At elapsed time `t` the first
//! `min(32, floor(32 · t / duration))` positions of that order are due. It
//! only moves forward; asking again with an earlier `t` yields nothing.
//!
//! [`Revealer`] drives a [`Reveal`] on a tokio task and streams
//! [`RevealEvent`]s to the renderer. Every [`Revealer::restart`] aborts the
//! task in flight before spawning the next one, so at most one animation
//! runs at a time.
//!
//! Session state never waits on any of this: the grid is already final
//! when the animation starts.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::display::CellColors;
use crate::palette::PaletteColor;
use crate::pattern::PATTERN_LEN;

/// Polling interval of the animation task (one frame at 60 Hz).
pub const DEFAULT_FRAME: Duration = Duration::from_millis(16);

// ─────────────────────────────────────────────
// Pacing model
// ─────────────────────────────────────────────

/// A single, non-restartable pass over the grid in random order.
#[derive(Debug, Clone)]
pub struct Reveal {
    frame:    CellColors,
    order:    [usize; PATTERN_LEN],
    revealed: usize,
    duration: Duration,
}

impl Reveal {
    pub fn new<R: Rng + ?Sized>(frame: CellColors, duration: Duration, rng: &mut R) -> Self {
        let mut order: [usize; PATTERN_LEN] = std::array::from_fn(|i| i);
        order.shuffle(rng);
        Self { frame, order, revealed: 0, duration }
    }

    /// Positions due at `elapsed`.
    pub fn due(&self, elapsed: Duration) -> usize {
        if self.duration.is_zero() {
            return PATTERN_LEN;
        }
        let ratio = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        ((PATTERN_LEN as f64 * ratio).floor() as usize).min(PATTERN_LEN)
    }

    /// Cells that became due since the previous call.
    pub fn advance(&mut self, elapsed: Duration) -> impl Iterator<Item = (usize, Option<PaletteColor>)> + '_ {
        let start = self.revealed;
        let end = self.due(elapsed).max(start);
        self.revealed = end;
        let frame = &self.frame;
        self.order[start..end].iter().map(move |&p| (p, frame[p]))
    }

    pub fn is_done(&self) -> bool {
        self.revealed >= PATTERN_LEN
    }

    pub fn order(&self) -> &[usize; PATTERN_LEN] {
        &self.order
    }
}

// ─────────────────────────────────────────────
// Async driver
// ─────────────────────────────────────────────

/// One cell of an animation becoming visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealEvent {
    /// Which animation this belongs to; increases with every restart.
    pub epoch:    u64,
    pub position: usize,
    pub color:    Option<PaletteColor>,
}

/// Owns the in-flight animation task.
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct Revealer {
    tx:    mpsc::UnboundedSender<RevealEvent>,
    task:  Option<JoinHandle<()>>,
    epoch: u64,
    frame: Duration,
}

impl Revealer {
    pub fn new(tx: mpsc::UnboundedSender<RevealEvent>) -> Self {
        Self::with_frame(tx, DEFAULT_FRAME)
    }

    pub fn with_frame(tx: mpsc::UnboundedSender<RevealEvent>, frame: Duration) -> Self {
        Self { tx, task: None, epoch: 0, frame }
    }

    /// Abort the running animation (if any) and start `reveal`.
    ///
    /// Returns the epoch stamped on the new animation's events.
    pub fn restart(&mut self, reveal: Reveal) -> u64 {
        self.cancel();
        self.epoch += 1;
        tracing::debug!(epoch = self.epoch, "reveal restarted");
        self.task = Some(tokio::spawn(drive(reveal, self.epoch, self.tx.clone(), self.frame)));
        self.epoch
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// `true` while an animation task has not yet finished.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for Revealer {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn drive(
    mut reveal: Reveal,
    epoch:      u64,
    tx:         mpsc::UnboundedSender<RevealEvent>,
    frame:      Duration,
) {
    let start = tokio::time::Instant::now();
    while !reveal.is_done() {
        tokio::time::sleep(frame).await;
        for (position, color) in reveal.advance(start.elapsed()) {
            if tx.send(RevealEvent { epoch, position, color }).is_err() {
                return; // renderer gone
            }
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
