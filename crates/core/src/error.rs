use thiserror::Error;

/// Deck configuration errors
///
/// These are programmer errors in the symbol pool and are reported when the
/// pool is built, never while a game is being played.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeckError {
    #[error("symbol pool holds {available} symbols but {required} pairs are needed")]
    PoolTooSmall { required: u32, available: u32 },
    #[error("symbol pool lists {0:?} more than once")]
    DuplicateSymbol(String),
}

pub type Result<T> = std::result::Result<T, DeckError>;
