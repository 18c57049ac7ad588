use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode, size,
    },
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::stderr;
use std::path::PathBuf;
use tokio::time::{Instant, sleep_until};

use super::ticker::TickSource;
use crate::game::{
    Board, Collaborators, GameConfig, GameEngine, GameStatus, GridDimensions, LogSound,
};
use crate::input::{InputHandler, InputRouter, Intent, KeyAction};
use crate::render::TerminalRenderer;
use crate::scores::JsonFileStore;

/// Rows used by the header, the footer and the grid border
const CHROME_ROWS: u16 = 8;
/// Columns used by the grid border
const CHROME_COLS: u16 = 2;

/// Settings for an interactive session that are not part of the game rules
#[derive(Debug, Clone)]
pub struct PlayOptions {
    pub player_name: String,
    /// High-score file; the platform data directory when unset
    pub scores_path: Option<PathBuf>,
    pub seed: Option<u64>,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            player_name: "Anonymous".to_string(),
            scores_path: None,
            seed: None,
        }
    }
}

/// Interactive terminal session driving a `GameEngine`
pub struct PlayMode {
    engine: GameEngine,
    input_handler: InputHandler,
    router: InputRouter,
    should_quit: bool,
}

impl PlayMode {
    /// Build an engine that draws to stderr and keeps scores on disk
    pub fn new(config: GameConfig, options: PlayOptions) -> Result<Self> {
        let terminal =
            Terminal::new(CrosstermBackend::new(stderr())).context("Failed to create terminal")?;
        let scores_path = options
            .scores_path
            .or_else(JsonFileStore::default_path)
            .unwrap_or_else(|| PathBuf::from("high_scores.json"));
        let store = JsonFileStore::new(scores_path);
        tracing::info!(path = ?store.path(), "using high score file");

        let collaborators = Collaborators::new(TerminalRenderer::new(terminal), store, LogSound);
        let mut engine = match options.seed {
            Some(seed) => {
                let dimensions = Board::dimensions(&config.viewport());
                GameEngine::with_seed(config, dimensions, collaborators, seed)
            }
            None => GameEngine::new(config, collaborators),
        }
        .context("Failed to create game engine")?;
        engine.set_player_name(options.player_name);

        let mut mode = Self::from_engine(engine);
        let (cols, rows) = size().context("Failed to read terminal size")?;
        mode.fit_terminal(cols, rows);
        Ok(mode)
    }

    pub fn from_engine(engine: GameEngine) -> Self {
        let router = InputRouter::from_config(engine.config());
        Self {
            engine,
            input_handler: InputHandler::new(),
            router,
            should_quit: false,
        }
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        execute!(stderr(), EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;

        // Run game loop with cleanup
        let result = self.run_game_loop().await;

        // Cleanup terminal
        cleanup_terminal()?;

        result
    }

    async fn run_game_loop(&mut self) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut ticker = TickSource::new();

        self.engine.render();

        loop {
            let bonus_deadline = self.engine.bonus_deadline();
            let bonus_expiry = sleep_until(bonus_deadline.unwrap_or_else(Instant::now));

            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event)?,
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = ticker.tick(), if ticker.is_running() => {
                    self.engine.tick();
                }

                // Bonus food runs out
                _ = bonus_expiry, if bonus_deadline.is_some() => {
                    if self.engine.expire_bonus(Instant::now()) {
                        self.engine.render();
                    }
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if let Some(schedule) = self.engine.take_schedule() {
                ticker.apply(schedule);
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            // Only process key press events, not release
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let action = self.input_handler.handle_key_event(key);
                self.apply(action)?;
            }
            Event::Mouse(mouse) => {
                let direction = self
                    .input_handler
                    .handle_mouse_event(mouse)
                    .and_then(|swipe| self.router.swipe_direction(swipe));
                if let Some(direction) = direction {
                    self.engine.submit_direction(direction);
                }
            }
            Event::Resize(cols, rows) => self.fit_terminal(cols, rows),
            _ => {}
        }

        Ok(())
    }

    /// Shrink the grid so every cell is on screen; never beyond the configured size
    fn fit_terminal(&mut self, cols: u16, rows: u16) {
        let base = Board::dimensions(&self.engine.config().viewport());
        let dimensions = grid_for_terminal(base, cols, rows);

        if dimensions == self.engine.board().grid() {
            self.engine.render();
        } else if let Err(err) = self.engine.resize(dimensions) {
            tracing::warn!(error = %err, cols, rows, "grid does not fit the terminal");
        }
    }

    fn apply(&mut self, action: KeyAction) -> Result<()> {
        match action {
            KeyAction::Intent(Intent::Move(direction)) => {
                self.engine.submit_direction(direction);
            }
            KeyAction::Intent(Intent::TogglePause) => {
                self.engine.toggle_pause();
            }
            KeyAction::Intent(Intent::Confirm) => match self.engine.status() {
                GameStatus::Idle => {
                    self.engine.start().context("Failed to start game")?;
                }
                GameStatus::GameOver => {
                    self.engine.restart().context("Failed to restart game")?;
                }
                GameStatus::Playing | GameStatus::Paused => {}
            },
            KeyAction::Intent(Intent::Menu) => self.engine.reset(),
            KeyAction::Restart => {
                self.engine.restart().context("Failed to restart game")?;
            }
            KeyAction::SetDifficulty(difficulty) => self.engine.set_difficulty(difficulty),
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }

        Ok(())
    }
}

/// Each cell is drawn two columns wide
pub fn grid_for_terminal(base: GridDimensions, cols: u16, rows: u16) -> GridDimensions {
    let width = usize::from(cols.saturating_sub(CHROME_COLS) / 2);
    let height = usize::from(rows.saturating_sub(CHROME_ROWS));
    GridDimensions::new(
        base.width.min(width),
        base.height.min(height),
        base.cell_size_px,
    )
}

fn cleanup_terminal() -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(stderr(), DisableMouseCapture, LeaveAlternateScreen, Show)
        .context("Failed to leave alternate screen")?;
    Ok(())
}
