use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use super::action::Direction;
use super::score::ScoreBoard;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// True if the position lies inside a `width` x `height` grid
    pub fn is_within(&self, width: usize, height: usize) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as usize) < width && (self.y as usize) < height
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    body: Vec<Position>,
    /// Current direction of movement
    direction: Direction,
}

impl Snake {
    /// Create a new snake with given starting position and direction
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let mut body = vec![head];

        // Add initial body segments behind the head
        let (dx, dy) = direction.delta();
        for i in 1..length.max(1) {
            let prev = body[i - 1];
            body.push(prev.moved_by(-dx, -dy));
        }

        Self { body, direction }
    }

    /// Build a snake from explicit segments, head first
    pub fn from_segments(body: Vec<Position>, direction: Direction) -> Self {
        debug_assert!(!body.is_empty(), "a snake needs at least a head");
        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// All segments, head first
    pub fn segments(&self) -> &[Position] {
        &self.body
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Prepend a new head one step in `direction` and adopt that heading.
    /// The tail is left in place until [`Snake::grow_or_shrink`].
    pub fn move_head(&mut self, direction: Direction) -> Position {
        self.direction = direction;
        let new_head = self.head().moved_in_direction(direction);
        self.body.insert(0, new_head);
        new_head
    }

    /// Keep the tail when food was eaten this tick, otherwise drop it
    pub fn grow_or_shrink(&mut self, ate_food: bool) {
        if !ate_food && self.body.len() > 1 {
            self.body.pop();
        }
    }

    pub fn check_wall_collision(&self, width: usize, height: usize) -> bool {
        !self.head().is_within(width, height)
    }

    /// Head overlaps any other segment
    pub fn check_self_collision(&self) -> bool {
        let head = self.head();
        self.body_segments().contains(&head)
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Lifecycle of the engine, observed by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Idle,
    Playing,
    Paused,
    GameOver,
}

impl GameStatus {
    /// A game is in progress, running or paused
    pub fn is_live(&self) -> bool {
        matches!(self, GameStatus::Playing | GameStatus::Paused)
    }
}

/// Time-limited bonus food
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BonusFood {
    pub position: Position,
    pub expires_at: Instant,
}

impl BonusFood {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Everything that belongs to one game, from start to game over
#[derive(Debug, Clone)]
pub struct GameSession {
    pub snake: Snake,
    pub food: Position,
    pub bonus: Option<BonusFood>,
    pub score: ScoreBoard,
    /// Latest accepted direction intent, consumed by the next tick
    pub pending_direction: Option<Direction>,
    pub ticks: u64,
}

impl GameSession {
    pub fn new(snake: Snake, food: Position, score: ScoreBoard) -> Self {
        Self {
            snake,
            food,
            bonus: None,
            score,
            pending_direction: None,
            ticks: 0,
        }
    }

    pub fn bonus_position(&self) -> Option<Position> {
        self.bonus.map(|bonus| bonus.position)
    }
}
