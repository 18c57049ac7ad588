use chrono::Local;

use crate::scores::{HighScoreEntry, HighScoreStore, HighScores};

/// Level reached at a given score: `floor(score / points_per_level) + 1`
pub fn level_for_score(score: u32, points_per_level: u32) -> u32 {
    score / points_per_level.max(1) + 1
}

/// Score, level and lives for one game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBoard {
    score: u32,
    level: u32,
    lives: u32,
    points_per_level: u32,
}

impl ScoreBoard {
    pub fn new(lives: u32, points_per_level: u32) -> Self {
        Self {
            score: 0,
            level: 1,
            lives,
            points_per_level,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Add points and return whether the level went up
    pub fn add_score(&mut self, points: u32) -> bool {
        self.score = self.score.saturating_add(points);
        self.check_level_up()
    }

    /// Bring the level in line with the score. Returns true only on the
    /// call that raises it, so calling it again is harmless.
    pub fn check_level_up(&mut self) -> bool {
        let level = level_for_score(self.score, self.points_per_level);
        if level > self.level {
            self.level = level;
            true
        } else {
            false
        }
    }

    /// Take away one life and return how many are left
    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    /// Build the final entry for this game, merge it into the table and persist it
    pub fn record_game_over(
        &self,
        name: &str,
        table: &mut HighScores,
        store: &mut dyn HighScoreStore,
    ) -> HighScoreEntry {
        let entry = HighScoreEntry::new(
            name,
            self.score,
            self.level,
            Local::now().format("%Y-%m-%d").to_string(),
        );
        if !table.qualifies(entry.score) {
            tracing::debug!(score = entry.score, "score did not make the high score table");
            return entry;
        }
        table.insert(entry.clone());

        if let Err(err) = store.save(table.entries()) {
            tracing::warn!(error = %err, "failed to persist high scores");
        }

        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scores::MemoryStore;

    #[test]
    fn test_level_formula() {
        assert_eq!(level_for_score(0, 100), 1);
        assert_eq!(level_for_score(99, 100), 1);
        assert_eq!(level_for_score(100, 100), 2);
        assert_eq!(level_for_score(255, 100), 3);
    }

    #[test]
    fn test_add_score_levels_up() {
        let mut board = ScoreBoard::new(3, 100);
        for _ in 0..9 {
            assert!(!board.add_score(10));
        }
        assert_eq!(board.level(), 1);
        assert!(board.add_score(10));
        assert_eq!(board.score(), 100);
        assert_eq!(board.level(), 2);
    }

    #[test]
    fn test_level_up_is_idempotent() {
        let mut board = ScoreBoard::new(3, 100);
        board.add_score(125);
        assert_eq!(board.level(), 2);
        assert!(!board.check_level_up());
        assert!(!board.check_level_up());
        assert_eq!(board.level(), 2);
    }

    #[test]
    fn test_level_invariant_after_each_mutation() {
        let mut board = ScoreBoard::new(3, 100);
        for points in [10, 25, 10, 10, 25, 10, 25, 25, 10, 10, 25] {
            board.add_score(points);
            assert_eq!(board.level(), board.score() / 100 + 1);
        }
    }

    #[test]
    fn test_lose_life() {
        let mut board = ScoreBoard::new(2, 100);
        assert_eq!(board.lose_life(), 1);
        assert_eq!(board.lose_life(), 0);
        assert_eq!(board.lose_life(), 0);
    }

    #[test]
    fn test_record_game_over_persists() {
        let mut board = ScoreBoard::new(3, 100);
        board.add_score(130);
        let mut table = HighScores::default();
        let mut store = MemoryStore::default();

        let entry = board.record_game_over("ada", &mut table, &mut store);

        assert_eq!(entry.name, "ada");
        assert_eq!(entry.score, 130);
        assert_eq!(entry.level, 2);
        assert_eq!(table.entries().len(), 1);
        assert_eq!(store.load(), table.entries().to_vec());
    }

    #[test]
    fn test_low_score_leaves_full_table_untouched() {
        let entries = (1..=10)
            .map(|n| HighScoreEntry::new("pro", n * 100, 5, "2026-01-01".to_string()))
            .collect();
        let mut table = HighScores::from_entries(entries);
        let mut store = MemoryStore::default();
        let mut board = ScoreBoard::new(3, 100);
        board.add_score(50);

        let entry = board.record_game_over("newbie", &mut table, &mut store);

        assert_eq!(entry.score, 50);
        assert_eq!(table.len(), 10);
        assert_eq!(table.best().map(|best| best.score), Some(1000));
        assert!(store.load().is_empty());
    }
}
