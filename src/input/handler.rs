use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use super::router::{Intent, Swipe};
use crate::game::{Difficulty, Direction};

/// Approximate pixel size of a terminal cell, used to scale mouse drags
const CELL_WIDTH_PX: f64 = 8.0;
const CELL_HEIGHT_PX: f64 = 16.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Intent(Intent),
    Restart,
    SetDifficulty(Difficulty),
    Quit,
    None,
}

/// Maps terminal key and mouse events to game input
#[derive(Debug, Default)]
pub struct InputHandler {
    drag_start: Option<(f64, f64)>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        let movement = |direction| KeyAction::Intent(Intent::Move(direction));

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => movement(Direction::Up),
            KeyCode::Down => movement(Direction::Down),
            KeyCode::Left => movement(Direction::Left),
            KeyCode::Right => movement(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => movement(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => movement(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => movement(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => movement(Direction::Right),

            // Controls
            KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => {
                KeyAction::Intent(Intent::TogglePause)
            }
            KeyCode::Enter => KeyAction::Intent(Intent::Confirm),
            KeyCode::Esc => KeyAction::Intent(Intent::Menu),
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,
            KeyCode::Char('1') => KeyAction::SetDifficulty(Difficulty::Easy),
            KeyCode::Char('2') => KeyAction::SetDifficulty(Difficulty::Medium),
            KeyCode::Char('3') => KeyAction::SetDifficulty(Difficulty::Hard),
            KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }

    /// Track a left-button drag; releasing it yields a swipe in pixels
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Option<Swipe> {
        let point = (
            f64::from(mouse.column) * CELL_WIDTH_PX,
            f64::from(mouse.row) * CELL_HEIGHT_PX,
        );

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.drag_start = Some(point);
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.drag_start.take().map(|start| Swipe::new(start, point))
            }
            _ => None,
        }
    }
}
