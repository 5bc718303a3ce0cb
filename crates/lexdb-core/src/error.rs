use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Vector dimension mismatch: expected {expected}, got {got}")]
    Dimension { expected: usize, got: usize },

    /// The semantic index returned a chunk id that was never upserted.
    /// This is an external-collaborator bug, not a recoverable condition.
    #[error("Index integrity violation: {0}")]
    Integrity(String),
}

pub type Result<T> = std::result::Result<T, Error>;
