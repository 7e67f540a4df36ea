//! Common error types used across the workspace.
//!
//! Each layer surfaces failures as an [`ErgoError`]. Adapters define their own
//! typed errors and convert them into [`ErgoError::Storage`]; the HTTP adapter
//! is the single place where an [`ErgoError`] becomes a status code.

use std::error::Error as StdError;

/// Top-level error shared by the domain, application, and adapter layers.
#[derive(Debug, thiserror::Error)]
pub enum ErgoError {
    /// Client input failed validation.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The referenced record does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// Any failure coming from the persistence layer.
    #[error("storage error")]
    Storage(#[source] Box<dyn StdError + Send + Sync>),
}

impl ErgoError {
    /// Returns `true` when this is a [`ErgoError::NotFound`].
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Reasons client input can be rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("title cannot be empty")]
    EmptyTitle,

    #[error("invalid url param")]
    InvalidId,

    #[error("invalid request body")]
    InvalidBody,
}

/// A lookup by identifier matched nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    /// Kind of record that was looked up (e.g. `"Todo"`).
    pub entity: &'static str,
    /// Identifier that was looked up, as text.
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_validation_error_with_from() {
        let err: ErgoError = ValidationError::EmptyTitle.into();
        assert!(matches!(
            err,
            ErgoError::Validation(ValidationError::EmptyTitle)
        ));
    }

    #[test]
    fn should_report_not_found() {
        let err: ErgoError = NotFoundError {
            entity: "Todo",
            id: "7".to_string(),
        }
        .into();
        assert!(err.is_not_found());
        assert_eq!(
            std::error::Error::source(&err).map(ToString::to_string),
            Some("Todo not found: 7".to_string())
        );
    }

    #[test]
    fn should_keep_storage_source() {
        let io = std::io::Error::other("disk on fire");
        let err = ErgoError::Storage(Box::new(io));
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "storage error");
        assert_eq!(
            std::error::Error::source(&err).map(ToString::to_string),
            Some("disk on fire".to_string())
        );
    }
}
