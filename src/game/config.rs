use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::board::ViewportHints;

/// Device profile; decides the grid layout and the speed table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Desktop,
    Mobile,
}

/// Difficulty setting, mapped to a base tick interval per platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Base tick interval in milliseconds at level 1
    pub fn base_interval_ms(&self, platform: Platform) -> u64 {
        match (self, platform) {
            (Difficulty::Easy, Platform::Desktop) => 200,
            (Difficulty::Medium, Platform::Desktop) => 150,
            (Difficulty::Hard, Platform::Desktop) => 100,
            (Difficulty::Easy, Platform::Mobile) => 250,
            (Difficulty::Medium, Platform::Mobile) => 200,
            (Difficulty::Hard, Platform::Mobile) => 150,
        }
    }
}

/// Configuration for the game
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub platform: Platform,
    pub difficulty: Difficulty,
    /// Available viewport width in pixels
    pub viewport_width_px: f64,
    /// Available viewport height in pixels
    pub viewport_height_px: f64,

    /// Initial length of the snake
    pub initial_snake_length: usize,
    pub initial_lives: u32,

    /// Points for regular food
    pub food_points: u32,
    /// Points for bonus food
    pub bonus_points: u32,
    /// Score needed per level
    pub points_per_level: u32,

    /// Interval reduction per level gained
    pub level_step_ms: u64,
    /// Fastest allowed tick interval
    pub min_interval_ms: u64,

    /// Chance of spawning bonus food whenever food is regenerated
    pub bonus_chance: f64,
    /// How long uncollected bonus food stays on the board
    pub bonus_lifetime_ms: u64,

    /// Minimum swipe travel before a touch counts as a direction change
    pub swipe_threshold_px: f64,
    /// Random samples tried before food placement falls back to a scan
    pub max_placement_attempts: usize,

    pub sound_enabled: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            platform: Platform::Desktop,
            difficulty: Difficulty::Medium,
            viewport_width_px: 1280.0,
            viewport_height_px: 800.0,
            initial_snake_length: 3,
            initial_lives: 3,
            food_points: 10,
            bonus_points: 25,
            points_per_level: 100,
            level_step_ms: 10,
            min_interval_ms: 50,
            bonus_chance: 0.2,
            bonus_lifetime_ms: 5000,
            swipe_threshold_px: 30.0,
            max_placement_attempts: 1000,
            sound_enabled: true,
        }
    }
}

impl GameConfig {
    /// Create a configuration for the given device profile
    pub fn new(platform: Platform, difficulty: Difficulty) -> Self {
        Self {
            platform,
            difficulty,
            ..Default::default()
        }
    }

    /// Mobile profile with a phone-sized viewport
    pub fn mobile() -> Self {
        Self {
            platform: Platform::Mobile,
            viewport_width_px: 390.0,
            viewport_height_px: 844.0,
            ..Default::default()
        }
    }

    pub fn viewport(&self) -> ViewportHints {
        ViewportHints {
            width_px: self.viewport_width_px,
            height_px: self.viewport_height_px,
            platform: self.platform,
        }
    }

    pub fn base_interval_ms(&self) -> u64 {
        self.difficulty.base_interval_ms(self.platform)
    }

    /// Tick interval for a level: `max(min, base - (level - 1) * step)`
    pub fn interval_for_level(&self, level: u32) -> Duration {
        let reduction = u64::from(level.saturating_sub(1)).saturating_mul(self.level_step_ms);
        let ms = self
            .base_interval_ms()
            .saturating_sub(reduction)
            .max(self.min_interval_ms);
        Duration::from_millis(ms)
    }

    pub fn bonus_lifetime(&self) -> Duration {
        Duration::from_millis(self.bonus_lifetime_ms)
    }

    /// Validate configuration parameters
    ///
    /// # Returns
    ///
    /// `Ok(())` if all parameters are valid, `Err(String)` with an error message otherwise.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.viewport_width_px > 0.0 && self.viewport_height_px > 0.0) {
            return Err(format!(
                "viewport must be positive, got {}x{}",
                self.viewport_width_px, self.viewport_height_px
            ));
        }

        if self.initial_snake_length == 0 {
            return Err("initial_snake_length must be at least 1".to_string());
        }

        if self.initial_lives == 0 {
            return Err("initial_lives must be at least 1".to_string());
        }

        if self.points_per_level == 0 {
            return Err("points_per_level must be at least 1".to_string());
        }

        if self.min_interval_ms == 0 {
            return Err("min_interval_ms must be at least 1".to_string());
        }

        if !(0.0..=1.0).contains(&self.bonus_chance) {
            return Err(format!(
                "bonus_chance must be in [0, 1], got {}",
                self.bonus_chance
            ));
        }

        if self.swipe_threshold_px < 0.0 {
            return Err(format!(
                "swipe_threshold_px must be non-negative, got {}",
                self.swipe_threshold_px
            ));
        }

        Ok(())
    }

    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig =
            serde_json::from_str(&json).context("Failed to deserialize config")?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, json).with_context(|| format!("Failed to write config to {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.platform, Platform::Desktop);
        assert_eq!(config.difficulty, Difficulty::Medium);
        assert_eq!(config.initial_snake_length, 3);
        assert_eq!(config.initial_lives, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_speed_tables() {
        assert_eq!(Difficulty::Easy.base_interval_ms(Platform::Desktop), 200);
        assert_eq!(Difficulty::Medium.base_interval_ms(Platform::Desktop), 150);
        assert_eq!(Difficulty::Hard.base_interval_ms(Platform::Desktop), 100);
        assert_eq!(Difficulty::Easy.base_interval_ms(Platform::Mobile), 250);
        assert_eq!(Difficulty::Medium.base_interval_ms(Platform::Mobile), 200);
        assert_eq!(Difficulty::Hard.base_interval_ms(Platform::Mobile), 150);
    }

    #[test]
    fn test_interval_for_level() {
        let config = GameConfig::default();
        assert_eq!(config.interval_for_level(1), Duration::from_millis(150));
        assert_eq!(config.interval_for_level(2), Duration::from_millis(140));
        assert_eq!(config.interval_for_level(11), Duration::from_millis(50));
        assert_eq!(config.interval_for_level(40), Duration::from_millis(50));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = GameConfig::default();
        config.bonus_chance = 1.5;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.initial_lives = 0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.viewport_width_px = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");

        let mut config = GameConfig::mobile();
        config.difficulty = Difficulty::Hard;
        config.save(&path).unwrap();

        let loaded = GameConfig::load(&path).unwrap();
        assert_eq!(loaded.platform, Platform::Mobile);
        assert_eq!(loaded.difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"difficulty": "easy"}"#).unwrap();
        assert_eq!(config.difficulty, Difficulty::Easy);
        assert_eq!(config.food_points, 10);
    }
}
