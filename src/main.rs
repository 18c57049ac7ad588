use anyhow::{Context, Result};
use clap::Parser;
use snake_arcade::game::{Difficulty, GameConfig, Platform};
use snake_arcade::modes::{PlayMode, PlayOptions};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snake_arcade")]
#[command(version, about = "Arcade Snake with levels, lives and high scores")]
struct Cli {
    /// Load game settings from a JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Device profile used for grid layout and speed
    #[arg(long, value_enum)]
    platform: Option<Platform>,

    #[arg(long, value_enum)]
    difficulty: Option<Difficulty>,

    /// Viewport width in pixels
    #[arg(long)]
    viewport_width: Option<f64>,

    /// Viewport height in pixels
    #[arg(long)]
    viewport_height: Option<f64>,

    /// Name recorded with high scores
    #[arg(long, default_value = "Anonymous")]
    name: String,

    /// High score file (defaults to the platform data directory)
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Log file; the terminal is taken by the game
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Disable sound cues
    #[arg(long)]
    mute: bool,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None if self.platform == Some(Platform::Mobile) => GameConfig::mobile(),
            None => GameConfig::default(),
        };

        if let Some(platform) = self.platform {
            config.platform = platform;
        }
        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
        if let Some(width) = self.viewport_width {
            config.viewport_width_px = width;
        }
        if let Some(height) = self.viewport_height {
            config.viewport_height_px = height;
        }
        if self.mute {
            config.sound_enabled = false;
        }

        Ok(config)
    }
}

fn init_logging(path: PathBuf) -> Result<()> {
    let file = File::create(&path)
        .with_context(|| format!("Failed to create log file {:?}", path))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("snake_arcade.log"));
    init_logging(log_path)?;

    let config = cli.game_config()?;
    let options = PlayOptions {
        player_name: cli.name,
        scores_path: cli.scores,
        seed: cli.seed,
    };

    let mut play_mode = PlayMode::new(config, options)?;
    play_mode.run().await?;

    Ok(())
}
