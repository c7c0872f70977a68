//! Local run persistence
//!
//! Two small stores, both JSON files: a top-10 high-score table and the best
//! run's full record (position trace included) for ghost replays. The sim
//! core never reads these during a tick; saving is fire-and-forget and load
//! failures fall back to empty defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::RunRecord;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u32,
    /// Run length in seconds
    pub duration: f64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score qualifies for the table
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Rank a score would achieve (1-indexed), or None if it doesn't qualify
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert a score, keeping the table sorted and trimmed.
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify.
    pub fn add_score(&mut self, score: u32, duration: f64, timestamp: f64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            duration,
            timestamp,
        };
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Load the table from disk, falling back to empty on any failure
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<HighScores>(&json) {
                Ok(scores) => {
                    log::info!("loaded {} high scores", scores.entries.len());
                    scores
                }
                Err(e) => {
                    log::warn!("high score file unreadable ({e}), starting fresh");
                    Self::new()
                }
            },
            Err(_) => Self::new(),
        }
    }

    /// Save the table; failures are logged, never surfaced to gameplay
    pub fn save(&self, path: &Path) {
        match serde_json::to_string(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    log::warn!("failed to save high scores: {e}");
                } else {
                    log::info!("high scores saved ({} entries)", self.entries.len());
                }
            }
            Err(e) => log::warn!("failed to serialize high scores: {e}"),
        }
    }
}

/// Best run storage for ghost replays
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BestRun {
    pub record: Option<RunRecord>,
}

impl BestRun {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only the player's best: replace the stored run if the new one
    /// scored higher. Returns true if the record was kept.
    pub fn offer(&mut self, record: RunRecord) -> bool {
        let better = self
            .record
            .as_ref()
            .map(|best| record.final_score > best.final_score)
            .unwrap_or(true);
        if better {
            log::info!(
                "new best run: {} points over {:.1}s",
                record.final_score,
                record.duration_seconds
            );
            self.record = Some(record);
        }
        better
    }

    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("best run file unreadable ({e}), starting fresh");
                Self::new()
            }),
            Err(_) => Self::new(),
        }
    }

    pub fn save(&self, path: &Path) {
        match serde_json::to_string(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    log::warn!("failed to save best run: {e}");
                }
            }
            Err(e) => log::warn!("failed to serialize best run: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{ReplayTrace, RunOutcome};

    fn record(score: u32) -> RunRecord {
        RunRecord {
            final_score: score,
            duration_seconds: score as f64,
            outcome: RunOutcome::Defeated,
            trace: ReplayTrace::new(),
        }
    }

    #[test]
    fn zero_scores_never_qualify() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert!(scores.qualifies(1));
    }

    #[test]
    fn table_stays_sorted_and_trimmed() {
        let mut scores = HighScores::new();
        for s in [50, 10, 90, 30, 70, 20, 60, 40, 80, 100, 5, 95] {
            scores.add_score(s, 0.0, 0.0);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(100));
        for pair in scores.entries.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        // 5 fell off the bottom
        assert!(scores.entries.iter().all(|e| e.score != 5));
    }

    #[test]
    fn rank_is_one_indexed() {
        let mut scores = HighScores::new();
        scores.add_score(100, 0.0, 0.0);
        scores.add_score(50, 0.0, 0.0);
        assert_eq!(scores.potential_rank(75), Some(2));
        assert_eq!(scores.add_score(75, 0.0, 0.0), Some(2));
    }

    #[test]
    fn best_run_keeps_highest_score_only() {
        let mut best = BestRun::new();
        assert!(best.offer(record(10)));
        assert!(!best.offer(record(5)));
        assert!(best.offer(record(20)));
        assert_eq!(best.record.as_ref().unwrap().final_score, 20);
    }

    #[test]
    fn load_missing_file_is_empty() {
        let scores = HighScores::load(Path::new("/nonexistent/highscores.json"));
        assert!(scores.is_empty());
        let best = BestRun::load(Path::new("/nonexistent/bestrun.json"));
        assert!(best.record.is_none());
    }
}
