//! Error handling for the practice engine.

use practice_core::InputError;
use thiserror::Error;

use crate::db::DbError;

/// Engine error types.
///
/// Storage failures are surfaced without retry; retry policy belongs to the
/// caller or the storage layer.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<DbError> for EngineError {
    fn from(e: DbError) -> Self {
        Self::StorageUnavailable(e.to_string())
    }
}

impl From<InputError> for EngineError {
    fn from(e: InputError) -> Self {
        Self::InvalidInput(e.to_string())
    }
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
