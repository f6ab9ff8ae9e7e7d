//! High score leaderboard
//!
//! In-memory only; score state does not outlive the process. The shell seeds
//! a new game's highscore flag from `top_score`.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Difficulty tier reached
    pub level: u32,
    /// Wave within that level
    pub wave: u32,
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify
    pub fn add_score(&mut self, score: u64, level: u32, wave: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry { score, level, wave };
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

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_never_qualifies() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert!(scores.qualifies(10));
    }

    #[test]
    fn test_scores_stay_sorted_and_ranked() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(100, 1, 2), Some(1));
        assert_eq!(scores.add_score(300, 2, 1), Some(1));
        assert_eq!(scores.add_score(200, 1, 4), Some(2));
        assert_eq!(scores.top_score(), Some(300));
        let ordered: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(ordered, vec![300, 200, 100]);
    }

    #[test]
    fn test_board_truncates_at_capacity() {
        let mut scores = HighScores::new();
        for i in 1..=12 {
            scores.add_score(i * 10, 1, 1);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        // The two weakest entries fell off
        assert!(scores.entries.iter().all(|e| e.score > 20));
        assert!(!scores.qualifies(20));
        assert!(scores.qualifies(1000));
    }
}
