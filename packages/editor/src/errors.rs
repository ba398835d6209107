//! Error types for the editor

use crate::generation::GenerationError;
use crate::store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("No project is open")]
    NoProject,

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("No section generator configured")]
    NoGenerator,

    /// A different project was opened while the request was in flight.
    #[error("Session moved on before the request completed")]
    Superseded,

    /// The task running the request stopped before reporting back.
    #[error("Editor task stopped: {0}")]
    Interrupted(String),
}

impl EditorError {
    /// Whether repeating the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            EditorError::Store(err) => err.is_retryable(),
            EditorError::Generation(err) => err.is_retryable(),
            EditorError::Superseded | EditorError::Interrupted(_) => true,
            EditorError::NoProject | EditorError::NoGenerator => false,
        }
    }
}
