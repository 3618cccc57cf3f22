use thiserror::Error;

use crate::{CellCount, Coord};

/// Invalid board parameters, fatal to the construction attempt.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Board size must be at least 1")]
    EmptyBoard,
    #[error("Board size {0} is larger than the supported maximum of {max}", max = Coord::MAX)]
    BoardTooLarge(usize),
    #[error("Board must be square, got {rows}x{cols}")]
    NonSquareBoard { rows: usize, cols: usize },
    #[error("At least one mine is required")]
    NoMines,
    #[error("Too many mines, requested {requested} but only {available} cells can hold one")]
    TooManyMines {
        requested: CellCount,
        available: CellCount,
    },
}

/// Operation called in a state that breaks the lifecycle contract.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error("Cell index {index} is outside of a board with {total} cells")]
    CellOutOfRange { index: usize, total: CellCount },
    #[error("Mines were already placed for this board")]
    AlreadyInitialized,
    #[error("Game already ended, no new moves are accepted")]
    GameFinished,
    #[error("Game is still in progress, the mine layout is hidden")]
    GameInProgress,
    #[error("Environment must be reset before stepping")]
    NotReset,
    #[error("Episode has terminated, reset before stepping again")]
    EpisodeTerminated,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Usage(#[from] UsageError),
}

pub type Result<T> = core::result::Result<T, GameError>;
