use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Track index out of range: {0}")]
    TrackOutOfRange(usize),

    #[error("Item index out of range: {index} (track {track})")]
    ItemOutOfRange { track: usize, index: usize },

    #[error("Item not found: {0}")]
    ItemNotFound(uuid::Uuid),

    #[error("Overlap detected")]
    Overlap,

    #[error("Invalid duration: {0} frames")]
    InvalidDuration(i64),

    #[error("Selection no longer resolves to an item")]
    StaleSelection,

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,
}

pub type Result<T> = std::result::Result<T, CoreError>;
