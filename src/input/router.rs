//! Turns keyboard tokens, on-screen buttons and swipes into intents.
//!
//! Every source goes through the same no-reverse rule: asking to go back
//! the way the snake came is silently dropped.

use crate::game::{Direction, GameConfig};

/// What the player asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Move(Direction),
    TogglePause,
    /// Leave the current game for the menu
    Menu,
    /// Start a game from the menu
    Confirm,
}

/// A touch start/end pair, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swipe {
    pub start: (f64, f64),
    pub end: (f64, f64),
}

impl Swipe {
    pub fn new(start: (f64, f64), end: (f64, f64)) -> Self {
        Self { start, end }
    }
}

/// Raw input from any source
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawInput<'a> {
    /// Browser-style key name, e.g. `ArrowUp` or `w`
    Key(&'a str),
    /// On-screen control button
    Button(&'a str),
    Swipe(Swipe),
}

#[derive(Debug, Clone)]
pub struct InputRouter {
    swipe_threshold_px: f64,
}

impl InputRouter {
    pub fn new(swipe_threshold_px: f64) -> Self {
        Self { swipe_threshold_px }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.swipe_threshold_px)
    }

    /// Resolve any input against the current heading
    pub fn route(&self, input: RawInput<'_>, current: Direction) -> Option<Intent> {
        let intent = match input {
            RawInput::Key(token) => self.key_intent(token)?,
            RawInput::Button(token) => self.button_intent(token)?,
            RawInput::Swipe(swipe) => Intent::Move(self.swipe_direction(swipe)?),
        };

        match intent {
            Intent::Move(requested) => Self::accept(requested, current).map(Intent::Move),
            other => Some(other),
        }
    }

    pub fn key_intent(&self, token: &str) -> Option<Intent> {
        let intent = match token {
            "ArrowUp" | "w" | "W" => Intent::Move(Direction::Up),
            "ArrowDown" | "s" | "S" => Intent::Move(Direction::Down),
            "ArrowLeft" | "a" | "A" => Intent::Move(Direction::Left),
            "ArrowRight" | "d" | "D" => Intent::Move(Direction::Right),
            " " | "p" | "P" => Intent::TogglePause,
            "Escape" => Intent::Menu,
            "Enter" => Intent::Confirm,
            _ => return None,
        };
        Some(intent)
    }

    pub fn button_intent(&self, token: &str) -> Option<Intent> {
        if token == "pause" {
            return Some(Intent::TogglePause);
        }
        token.parse::<Direction>().ok().map(Intent::Move)
    }

    /// The dominant axis of the swipe decides; an exact tie counts as
    /// vertical. Travel at or under the threshold is a tap, not a swipe.
    pub fn swipe_direction(&self, swipe: Swipe) -> Option<Direction> {
        let dx = swipe.end.0 - swipe.start.0;
        let dy = swipe.end.1 - swipe.start.1;

        if dx.abs() > dy.abs() {
            if dx.abs() <= self.swipe_threshold_px {
                return None;
            }
            Some(if dx > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            })
        } else {
            if dy.abs() <= self.swipe_threshold_px {
                return None;
            }
            Some(if dy > 0.0 {
                Direction::Down
            } else {
                Direction::Up
            })
        }
    }

    /// Drop a request that would reverse the snake
    pub fn accept(requested: Direction, current: Direction) -> Option<Direction> {
        (!current.is_opposite(requested)).then_some(requested)
    }
}

impl Default for InputRouter {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}
