use thiserror::Error;

use crate::ElementId;

pub type Result<T> = std::result::Result<T, DeckError>;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("Failed to read the deck")]
    Io(#[from] std::io::Error),
    #[error("Malformed deck")]
    Json(#[from] serde_json::Error),
    #[error("Element id `{id}` is used on slide {first} and again on slide {second}")]
    DuplicateElementId {
        id: ElementId,
        first: usize,
        second: usize,
    },
}
