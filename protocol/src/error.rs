use minegym_core::GameError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("No game stored under id {0:?}")]
    UnknownGame(String),
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("Could not encode or decode game state")]
    Codec(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, ProtocolError>;
