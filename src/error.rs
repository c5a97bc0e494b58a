use thiserror::Error;

/// Every failure a caller of the engine can recover from.
/// Search itself has no fallible paths
#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid move: {0}")]
    InvalidMove(String),
    #[error("the game is already finished")]
    GameAlreadyFinished,
    #[error("player is not a participant of this game")]
    NotAParticipant,
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("bad notation: {0}")]
    BadNotation(String),
}

pub type GameResultOf<T> = Result<T, GameError>;
