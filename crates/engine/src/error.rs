use thiserror::Error;

use mind_pairs_core::DeckError;

/// Errors raised while building a [`GameEngine`](crate::GameEngine)
///
/// Gameplay itself never fails; these only come out of construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid symbol pool: {0}")]
    Deck(#[from] DeckError),
    #[error("game engine must be created inside a tokio runtime")]
    NoRuntime,
}

pub type Result<T> = std::result::Result<T, EngineError>;
