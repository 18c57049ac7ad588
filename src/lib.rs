//! Snake Arcade - classic Snake with levels, lives, bonus food and high scores
//!
//! This library provides:
//! - Core game logic and the engine state machine (game module)
//! - High-score table and persistence (scores module)
//! - Keyboard, button and swipe routing (input module)
//! - TUI rendering (render module)
//! - The interactive terminal session (modes module)

pub mod error;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod scores;

pub use error::{BoardFullError, GameError};
