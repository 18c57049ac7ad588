//! High-score persistence
//!
//! Scores are stored as a pretty-printed JSON array of
//! `{name, score, level, date}` objects. Loading never fails: a missing,
//! unreadable or corrupt file yields an empty table.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

use super::HighScoreEntry;

/// Where high scores are loaded from and saved to
pub trait HighScoreStore {
    /// Stored entries, or an empty list if they cannot be read
    fn load(&self) -> Vec<HighScoreEntry>;

    /// Overwrite the stored table
    fn save(&mut self, scores: &[HighScoreEntry]) -> Result<()>;
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `high_scores.json` in the platform data directory, if one exists
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "snake_arcade")
            .map(|dirs| dirs.data_dir().join("high_scores.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Vec<HighScoreEntry>> {
        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read high scores from {:?}", self.path))?;
        let scores: Vec<HighScoreEntry> =
            serde_json::from_str(&json).context("Failed to deserialize high scores")?;
        Ok(scores)
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&self) -> Vec<HighScoreEntry> {
        if !self.path.exists() {
            return Vec::new();
        }

        match self.read() {
            Ok(scores) => scores,
            Err(err) => {
                tracing::warn!(
                    path = ?self.path,
                    error = %format!("{err:#}"),
                    "ignoring unreadable high scores"
                );
                Vec::new()
            }
        }
    }

    fn save(&mut self, scores: &[HighScoreEntry]) -> Result<()> {
        // Create parent directories if needed
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let json =
            serde_json::to_string_pretty(scores).context("Failed to serialize high scores")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write high scores to {:?}", self.path))?;

        Ok(())
    }
}

/// Keeps scores in memory; used when no file should be touched
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    scores: Vec<HighScoreEntry>,
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Vec<HighScoreEntry> {
        self.scores.clone()
    }

    fn save(&mut self, scores: &[HighScoreEntry]) -> Result<()> {
        self.scores = scores.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Vec<HighScoreEntry> {
        vec![
            HighScoreEntry::new("ada", 240, 3, "2026-10-01".to_string()),
            HighScoreEntry::new("bob", 90, 1, "2026-10-02".to_string()),
        ]
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(temp_dir.path().join("scores").join("high.json"));

        store.save(&sample()).unwrap();

        assert_eq!(store.load(), sample());
    }

    #[test]
    fn test_file_format() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("high.json");
        let mut store = JsonFileStore::new(&path);
        store.save(&sample()[..1]).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value[0]["name"], "ada");
        assert_eq!(value[0]["score"], 240);
        assert_eq!(value[0]["level"], 3);
        assert_eq!(value[0]["date"], "2026-10-01");
    }

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("absent.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("high.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::default();
        assert!(store.load().is_empty());
        store.save(&sample()).unwrap();
        assert_eq!(store.load().len(), 2);
    }
}
