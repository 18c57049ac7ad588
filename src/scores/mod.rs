//! High-score table and its persistence
//!
//! The table keeps at most [`MAX_ENTRIES`] entries, sorted by score from
//! highest to lowest. Entries with equal scores keep their insertion order.

pub mod persistence;

pub use persistence::{HighScoreStore, JsonFileStore, MemoryStore};

use serde::{Deserialize, Serialize};

/// Number of entries kept in the table
pub const MAX_ENTRIES: usize = 10;

/// One finished game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u32,
    pub level: u32,
    pub date: String,
}

impl HighScoreEntry {
    pub fn new(name: &str, score: u32, level: u32, date: String) -> Self {
        let name = name.trim();
        Self {
            name: if name.is_empty() {
                "Anonymous".to_string()
            } else {
                name.to_string()
            },
            score,
            level,
            date,
        }
    }
}

/// Top scores, best first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighScores {
    entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Build a table from stored entries, restoring order and the size cap
    pub fn from_entries(entries: Vec<HighScoreEntry>) -> Self {
        let mut table = Self { entries };
        table.normalize();
        table
    }

    /// Merge an entry; returns its rank (0-based) if it made the table
    pub fn insert(&mut self, entry: HighScoreEntry) -> Option<usize> {
        // Goes after every entry with an equal or better score
        let rank = self
            .entries
            .iter()
            .take_while(|existing| existing.score >= entry.score)
            .count();
        self.entries.insert(rank, entry);
        self.entries.truncate(MAX_ENTRIES);
        (rank < MAX_ENTRIES).then_some(rank)
    }

    /// Would this score earn a place in the table?
    pub fn qualifies(&self, score: u32) -> bool {
        self.entries.len() < MAX_ENTRIES
            || self.entries.last().map_or(true, |last| score > last.score)
    }

    pub fn best(&self) -> Option<&HighScoreEntry> {
        self.entries.first()
    }

    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_ENTRIES);
    }
}
