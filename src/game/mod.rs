//! Core game logic module for Snake
//!
//! This module contains the simulation without any terminal I/O. Rendering,
//! sound and high-score storage are reached through the traits in [`hooks`].

pub mod action;
pub mod board;
pub mod config;
pub mod engine;
pub mod hooks;
pub mod score;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use board::{Board, GridDimensions, ViewportHints};
pub use config::{Difficulty, GameConfig, Platform};
pub use engine::{GameEngine, TickOutcome, TickSchedule};
pub use hooks::{Collaborators, LogSound, NullRenderer, RenderFrame, Renderer, Sound, SoundHook};
pub use score::{ScoreBoard, level_for_score};
pub use state::{BonusFood, CollisionType, GameSession, GameStatus, Position, Snake};
