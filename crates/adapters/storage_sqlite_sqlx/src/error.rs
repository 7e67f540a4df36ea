//! Storage-specific error type wrapping sqlx errors.

use ergo_domain::error::ErgoError;

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),
}

impl From<StorageError> for ErgoError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
