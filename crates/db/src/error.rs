use thiserror::Error;

use crate::model::BookId;

/// Failures reported by a [`crate::BookStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Network or service failure; the operation may or may not have run.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("book '{0}' not found")]
    NotFound(BookId),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}
