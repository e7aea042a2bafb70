use thiserror::Error;

/// Failures of the engine's plumbing (persistence, serialization).
///
/// Ordinary gameplay rejections — insufficient funds, unknown id,
/// already-purchased — are NOT errors; transactions report them as a
/// `bool` result with no state mutation.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type GameResult<T> = Result<T, GameError>;
