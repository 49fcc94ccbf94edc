//! Best-N/worst-N score persistence as a TOML file.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use maze_race_core::ScoreRecord;
use serde::{Deserialize, Serialize};

/// Entries kept in each of the best and worst tables.
const MAX_ENTRIES: usize = 10;

/// Persisted leaderboard: best runs first by ascending score, worst runs
/// by descending score. Lower scores are better.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub(crate) struct Leaderboard {
    #[serde(default)]
    best: Vec<ScoreRecord>,
    #[serde(default)]
    worst: Vec<ScoreRecord>,
}

impl Leaderboard {
    /// Folds one winning record into both tables.
    pub(crate) fn record(&mut self, record: ScoreRecord) {
        insert_sorted(&mut self.best, record.clone(), |a, b| a.score <= b.score);
        insert_sorted(&mut self.worst, record, |a, b| a.score >= b.score);
    }

    /// Best runs, ascending score.
    pub(crate) fn best(&self) -> &[ScoreRecord] {
        &self.best
    }

    /// Worst runs, descending score.
    pub(crate) fn worst(&self) -> &[ScoreRecord] {
        &self.worst
    }

    /// Writes the leaderboard to `path`.
    pub(crate) fn save(&self, path: &Path) -> Result<()> {
        let serialized = toml::to_string_pretty(self).context("serializing the leaderboard")?;
        fs::write(path, serialized).context("writing the leaderboard file")
    }
}

/// Loads the leaderboard from `path`; a missing file is an empty board.
pub(crate) fn load(path: &Path) -> Result<Leaderboard> {
    match fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).context("parsing the leaderboard file"),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Leaderboard::default()),
        Err(error) => Err(error).context("reading the leaderboard file"),
    }
}

fn insert_sorted<F>(table: &mut Vec<ScoreRecord>, record: ScoreRecord, comes_before: F)
where
    F: Fn(&ScoreRecord, &ScoreRecord) -> bool,
{
    let position = table
        .iter()
        .position(|existing| comes_before(&record, existing))
        .unwrap_or(table.len());
    if position < MAX_ENTRIES {
        table.insert(position, record);
        table.truncate(MAX_ENTRIES);
    }
}
