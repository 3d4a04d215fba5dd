//! Session journal: the human-readable record of a puzzle session.
//!
//! Purely observational: nothing in the core reads it back. Each entry is
//! also emitted as a `tracing` event tagged with the session id.
//!
//! Grids are written as palette letters (`RGMYB?`), `.` for a blank cell.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FractalError;
use crate::judge::Verdict;
use crate::palette::PermutationRule;

/// One line of the journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JournalEntry {
    /// Palette chosen at activation.
    Colors { palette: String, rule: PermutationRule },
    /// Contents of one disclosure stage (1-based index).
    Stage { index: usize, cells: String },
    /// The full target pattern.
    Target { cells: String },
    /// Minimum number of edits that make the target valid.
    Budget { edits: usize },
    /// Cells the player touched, as decoded colors.
    Changes { cells: String },
    /// Target with the player's changes applied.
    Composed { cells: String },
    /// Outcome of a judged submission.
    Verdict { verdict: Verdict, strikes: u32 },
}

impl fmt::Display for JournalEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Colors { palette, rule } => write!(f, "Colors: {palette} ({rule:?})"),
            Self::Stage { index, cells } => write!(f, "{index}: <{cells}>"),
            Self::Target { cells } => write!(f, "Stages sum: <{cells}>"),
            Self::Budget { edits } => write!(f, "Required edits: {edits}"),
            Self::Changes { cells } => write!(f, "Changes: <{cells}>"),
            Self::Composed { cells } => write!(f, "Submission: <{cells}>"),
            Self::Verdict { verdict, strikes: 0 } => write!(f, "Verdict: {verdict}"),
            Self::Verdict { verdict, strikes } => write!(f, "Verdict: {verdict}. STRIKE x{strikes}!"),
        }
    }
}

/// Append-only list of [`JournalEntry`]s for one session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Journal {
    pub session: Uuid,
    entries: Vec<JournalEntry>,
}

impl Journal {
    pub fn new(session: Uuid) -> Self {
        Self { session, entries: Vec::new() }
    }

    pub fn record(&mut self, entry: JournalEntry) {
        tracing::info!(session = %self.session, "{entry}");
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn verdicts(&self) -> impl Iterator<Item = Verdict> + '_ {
        self.entries.iter().filter_map(|e| match e {
            JournalEntry::Verdict { verdict, .. } => Some(*verdict),
            _ => None,
        })
    }

    pub fn to_json(&self) -> Result<String, FractalError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for Journal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}
