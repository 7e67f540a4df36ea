//! Errors raised by the in-process store.

use ergo_domain::error::ErgoError;

/// Errors originating from the in-memory storage layer.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// A previous holder of the lock panicked mid-write.
    #[error("in-memory store lock poisoned")]
    Poisoned,

    /// The store handed out every identifier an `i64` can hold.
    #[error("identifier space exhausted")]
    IdsExhausted,
}

impl From<MemoryError> for ErgoError {
    fn from(err: MemoryError) -> Self {
        Self::Storage(Box::new(err))
    }
}
