use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrefsError {
    #[error("preferences I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("preferences document is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("preferences store unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, PrefsError>;
