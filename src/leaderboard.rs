use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::RoundSummary;

const APP_DIR_NAME: &str = "grid-snake";
const LEADERBOARD_FILE_NAME: &str = "leaderboard.json";

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("leaderboard file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("leaderboard file is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Best score recorded for one player.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player_name: String,
    pub best_score: u32,
}

/// One entry per player name, best score first.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `score` for `player_name`, keeping only the player's best.
    /// Returns true when the stored best changed.
    pub fn record(&mut self, player_name: &str, score: u32) -> bool {
        let changed = match self
            .entries
            .iter_mut()
            .find(|entry| entry.player_name == player_name)
        {
            Some(entry) if score > entry.best_score => {
                entry.best_score = score;
                true
            }
            Some(_) => false,
            None => {
                self.entries.push(LeaderboardEntry {
                    player_name: player_name.to_owned(),
                    best_score: score,
                });
                true
            }
        };

        self.sort();
        changed
    }

    /// Records the outcome of a finished round.
    pub fn record_round(&mut self, summary: &RoundSummary) -> bool {
        self.record(&summary.player_name, summary.final_score)
    }

    #[must_use]
    pub fn best_for(&self, player_name: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|entry| entry.player_name == player_name)
            .map(|entry| entry.best_score)
    }

    #[must_use]
    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn sort(&mut self) {
        self.entries.sort_by(|a, b| {
            b.best_score
                .cmp(&a.best_score)
                .then_with(|| a.player_name.cmp(&b.player_name))
        });
    }

    /// Loads the leaderboard; a missing file yields an empty board.
    pub fn load(path: &Path) -> Result<Self, LeaderboardError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(e.into()),
        };

        let mut board: Self = serde_json::from_str(&raw)?;
        board.sort();
        Ok(board)
    }

    /// Saves to `path`, creating parent directories when needed.
    pub fn save(&self, path: &Path) -> Result<(), LeaderboardError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Returns the platform-correct leaderboard path.
#[must_use]
pub fn leaderboard_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(LEADERBOARD_FILE_NAME);
    base
}
