use thiserror::Error;

/// No free cell is left for food placement
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("board {width}x{height} has no free cell left")]
pub struct BoardFullError {
    pub width: usize,
    pub height: usize,
}

#[derive(Error, Debug)]
pub enum GameError {
    #[error(transparent)]
    BoardFull(#[from] BoardFullError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
