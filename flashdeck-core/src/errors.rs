use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("deck not found: {0}")]
    DeckNotFound(String),
    #[error("deck already exists: {0}")]
    DuplicateName(String),
    #[error("card not found: {0}")]
    CardNotFound(String),
    #[error("no deck is loaded")]
    NoActiveDeck,
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("invalid input: {0}")]
    Invalid(&'static str),
    #[error("storage error: {0}")]
    Storage(&'static str),
}
