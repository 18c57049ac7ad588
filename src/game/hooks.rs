//! Collaborators the engine calls out to: rendering, sound and high-score storage.

use super::state::{GameStatus, Position};
use crate::scores::{HighScoreEntry, HighScoreStore, MemoryStore};

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, Copy)]
pub struct RenderFrame<'a> {
    pub snake: &'a [Position],
    pub food: Position,
    pub bonus: Option<Position>,
    pub grid_width: usize,
    pub grid_height: usize,
    pub status: GameStatus,
    pub score: u32,
    pub level: u32,
    pub lives: u32,
    pub high_scores: &'a [HighScoreEntry],
}

/// Draws the game; called after every tick and state change
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame<'_>);
}

/// Renderer that draws nothing
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _frame: &RenderFrame<'_>) {}
}

/// Sound hook points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    Eat,
    Bonus,
    LevelUp,
    LifeLost,
    GameOver,
    Pause,
    Resume,
}

pub trait SoundHook {
    fn play(&mut self, sound: Sound);
}

/// Logs sound cues instead of playing audio
#[derive(Debug, Default)]
pub struct LogSound;

impl SoundHook for LogSound {
    fn play(&mut self, sound: Sound) {
        tracing::debug!(?sound, "play sound");
    }
}

/// The engine's external collaborators
pub struct Collaborators {
    pub renderer: Box<dyn Renderer>,
    pub store: Box<dyn HighScoreStore>,
    pub sound: Box<dyn SoundHook>,
}

impl Collaborators {
    pub fn new(
        renderer: impl Renderer + 'static,
        store: impl HighScoreStore + 'static,
        sound: impl SoundHook + 'static,
    ) -> Self {
        Self {
            renderer: Box::new(renderer),
            store: Box::new(store),
            sound: Box::new(sound),
        }
    }

    /// No drawing, in-memory scores, logged sound cues
    pub fn headless() -> Self {
        Self::new(NullRenderer, MemoryStore::default(), LogSound)
    }
}
